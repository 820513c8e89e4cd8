use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::answers::{ItemScores, RawAnswers};
use super::scoring::{InterpretationProfile, ScreeningEngine, ScreeningOutcome};
use super::summary::Summary;

const SCORE_TOLERANCE: f64 = 1e-6;

/// Opaque identifier handed back when a submission is stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionId(pub String);

impl SubmissionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Every part of a finished questionnaire, named explicitly. Unknown or
/// missing fields are rejected when decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SubmissionDraft {
    pub raw_answers: RawAnswers,
    pub scored: ItemScores,
    pub total_score: f64,
    pub interpretation: InterpretationProfile,
    pub summary: Summary,
}

impl SubmissionDraft {
    pub fn from_outcome(raw_answers: RawAnswers, outcome: ScreeningOutcome) -> Self {
        Self {
            raw_answers,
            scored: outcome.scored.scored,
            total_score: outcome.scored.total,
            interpretation: outcome.interpretation,
            summary: outcome.summary,
        }
    }

    /// Check the draft against the rubric: every number must be finite and
    /// the scores, total, interpretation and summary must be exactly what
    /// `engine` derives from the raw answers.
    pub fn validate(&self, engine: &ScreeningEngine) -> Result<(), SubmissionError> {
        if !self.total_score.is_finite() {
            return Err(SubmissionError::NonFiniteTotal);
        }

        if let Some((id, _)) = self
            .scored
            .iter()
            .find(|(_, score)| score.is_some_and(|value| !value.is_finite()))
        {
            return Err(SubmissionError::NonFiniteScore { id: id.clone() });
        }

        let expected = engine.evaluate(&self.raw_answers);

        if let Some(id) = self
            .scored
            .keys()
            .find(|id| !expected.scored.scored.contains_key(id.as_str()))
        {
            return Err(SubmissionError::UnknownScoreItem { id: id.clone() });
        }

        for (id, score) in &expected.scored.scored {
            match self.scored.get(id) {
                None => return Err(SubmissionError::MissingScoreItem { id: id.clone() }),
                Some(actual) if !same_score(*actual, *score) => {
                    return Err(SubmissionError::ScoreMismatch { id: id.clone() })
                }
                Some(_) => {}
            }
        }

        if (expected.scored.total - self.total_score).abs() > SCORE_TOLERANCE {
            return Err(SubmissionError::TotalMismatch {
                expected: expected.scored.total,
                actual: self.total_score,
            });
        }

        if self.interpretation != expected.interpretation {
            return Err(SubmissionError::InterpretationMismatch);
        }

        if self.summary != expected.summary {
            return Err(SubmissionError::SummaryMismatch);
        }

        Ok(())
    }
}

fn same_score(actual: Option<f64>, expected: Option<f64>) -> bool {
    match (actual, expected) {
        (None, None) => true,
        (Some(actual), Some(expected)) => (actual - expected).abs() <= SCORE_TOLERANCE,
        _ => false,
    }
}

/// Stored, immutable result of one completed questionnaire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub id: SubmissionId,
    pub created_at: DateTime<Utc>,
    pub raw_answers: RawAnswers,
    pub scored: ItemScores,
    pub total_score: f64,
    pub interpretation: InterpretationProfile,
    pub summary: Summary,
}

impl SubmissionRecord {
    pub fn from_draft(draft: SubmissionDraft) -> Self {
        Self {
            id: SubmissionId::generate(),
            created_at: Utc::now(),
            raw_answers: draft.raw_answers,
            scored: draft.scored,
            total_score: draft.total_score,
            interpretation: draft.interpretation,
            summary: draft.summary,
        }
    }
}

/// Append/list/clear collection of finished submissions, newest first.
pub trait SubmissionRepository: Send + Sync {
    fn append(&self, record: SubmissionRecord) -> Result<SubmissionId, RepositoryError>;
    fn list(&self) -> Result<Vec<SubmissionRecord>, RepositoryError>;
    fn clear(&self) -> Result<(), RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("submission already exists")]
    Conflict,
    #[error("submission store unavailable: {0}")]
    Unavailable(String),
}

/// Rejection of an explicitly posted submission draft.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SubmissionError {
    #[error("totalScore must be a finite number")]
    NonFiniteTotal,
    #[error("score for {id} must be a finite number or null")]
    NonFiniteScore { id: String },
    #[error("{id} is not a scored question")]
    UnknownScoreItem { id: String },
    #[error("score for {id} is missing")]
    MissingScoreItem { id: String },
    #[error("score for {id} does not match the answer given")]
    ScoreMismatch { id: String },
    #[error("totalScore {actual} does not match the answers ({expected})")]
    TotalMismatch { expected: f64, actual: f64 },
    #[error("interpretation does not match the scores")]
    InterpretationMismatch,
    #[error("summary does not match the answers")]
    SummaryMismatch,
}
