use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::answers::{comment_key, AnswerValue, RawAnswers};
use super::catalog::{QuestionCatalog, QuestionDescriptor, QuestionKind};
use super::generation::{TextGenerationGateway, TextSource};
use super::repository::{SubmissionDraft, SubmissionId, SubmissionRecord, SubmissionRepository};
use super::scoring::ScreeningEngine;

const GREETING: &str = "Hei 👋 Jeg skal stille noen korte spørsmål, så lager jeg en oppsummering.";
const CLOSING: &str = "Tusen takk — da er vi ferdig. Oppsummeringen ligger på veileder-siden.";
const COMMENT_PREFIX: &str = "Ekstra: ";

/// Observable position of a conversation. The advance between two answers
/// happens inside [`DialogueController::submit_answer`] and is committed as
/// a whole, so it never shows up here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "index", rename_all = "snake_case")]
pub enum DialoguePhase {
    AwaitingFirstPrompt,
    AwaitingAnswer(usize),
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Bot,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptEntry {
    pub speaker: Speaker,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<TextSource>,
}

impl TranscriptEntry {
    fn bot(text: impl Into<String>, source: TextSource) -> Self {
        Self {
            speaker: Speaker::Bot,
            text: text.into(),
            source: Some(source),
        }
    }

    fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
            source: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueState {
    pub step_index: usize,
    pub answers: RawAnswers,
    pub transcript: Vec<TranscriptEntry>,
}

/// One answer for the question currently awaiting input.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnswerSubmission {
    pub value: AnswerValue,
    #[serde(default)]
    pub comment: Option<String>,
}

impl AnswerSubmission {
    pub fn new(value: impl Into<AnswerValue>) -> Self {
        Self {
            value: value.into(),
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Why an answer did not fit the question it was given for.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnswerRejection {
    #[error("answer must not be empty")]
    EmptyText,
    #[error("'{value}' is not one of the listed options")]
    UnknownOption { value: String },
    #[error("answer must be a number between {min} and {max}")]
    NotANumber { min: i64, max: i64 },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DialogueError {
    #[error("conversation has not been started")]
    NotStarted,
    #[error("conversation has already been started")]
    AlreadyStarted,
    #[error("conversation is already completed")]
    Completed,
    #[error("question catalog is empty")]
    EmptyCatalog,
    #[error(transparent)]
    Rejected(#[from] AnswerRejection),
}

/// Whether the finished record reached the submission store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionReceipt {
    Stored { id: SubmissionId },
    NotPersisted { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// Acknowledgment followed by the next question.
    Advanced {
        step_index: usize,
        emitted: Vec<TranscriptEntry>,
    },
    Completed {
        emitted: Vec<TranscriptEntry>,
        record: Box<SubmissionRecord>,
        receipt: SubmissionReceipt,
    },
}

impl TurnOutcome {
    pub fn emitted(&self) -> &[TranscriptEntry] {
        match self {
            TurnOutcome::Advanced { emitted, .. } | TurnOutcome::Completed { emitted, .. } => {
                emitted
            }
        }
    }
}

/// Drives one conversation through the catalog, one question at a time.
pub struct DialogueController<R> {
    catalog: Arc<QuestionCatalog>,
    gateway: Arc<TextGenerationGateway>,
    repository: Arc<R>,
    engine: ScreeningEngine,
    phase: DialoguePhase,
    state: DialogueState,
}

impl<R> DialogueController<R>
where
    R: SubmissionRepository + 'static,
{
    pub fn new(
        catalog: Arc<QuestionCatalog>,
        gateway: Arc<TextGenerationGateway>,
        repository: Arc<R>,
    ) -> Self {
        Self {
            engine: ScreeningEngine::new(Arc::clone(&catalog)),
            catalog,
            gateway,
            repository,
            phase: DialoguePhase::AwaitingFirstPrompt,
            state: DialogueState::default(),
        }
    }

    pub fn phase(&self) -> DialoguePhase {
        self.phase
    }

    pub fn state(&self) -> &DialogueState {
        &self.state
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.state.transcript
    }

    pub fn current_question(&self) -> Option<&QuestionDescriptor> {
        match self.phase {
            DialoguePhase::AwaitingAnswer(index) => self.catalog.get(index),
            _ => None,
        }
    }

    /// Greet and present the first question.
    pub async fn start(&mut self) -> Result<Vec<TranscriptEntry>, DialogueError> {
        match self.phase {
            DialoguePhase::AwaitingFirstPrompt => {}
            DialoguePhase::AwaitingAnswer(_) => return Err(DialogueError::AlreadyStarted),
            DialoguePhase::Completed => return Err(DialogueError::Completed),
        }

        let first = self.catalog.get(0).ok_or(DialogueError::EmptyCatalog)?;
        let question = self.gateway.rephrase(first).await;

        let emitted = vec![
            TranscriptEntry::bot(GREETING, TextSource::Fixed),
            TranscriptEntry::bot(question.text, question.source),
        ];

        self.state.transcript.extend(emitted.iter().cloned());
        self.state.step_index = 0;
        self.phase = DialoguePhase::AwaitingAnswer(0);
        debug!(question = first.id, source = ?question.source, "conversation started");

        Ok(emitted)
    }

    /// Validate and record one answer, then either advance or complete.
    ///
    /// Nothing is written to the state until the whole step has been
    /// computed; a rejected answer or a dropped future leaves the
    /// conversation exactly where it was.
    pub async fn submit_answer(
        &mut self,
        submission: AnswerSubmission,
    ) -> Result<TurnOutcome, DialogueError> {
        let index = match self.phase {
            DialoguePhase::AwaitingAnswer(index) => index,
            DialoguePhase::AwaitingFirstPrompt => return Err(DialogueError::NotStarted),
            DialoguePhase::Completed => return Err(DialogueError::Completed),
        };
        let catalog = Arc::clone(&self.catalog);
        let question = catalog.get(index).ok_or(DialogueError::Completed)?;

        let value = accept(question, submission.value)?;
        let comment = submission
            .comment
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());

        let answer_text = value.to_string();
        let mut user_entries = vec![TranscriptEntry::user(answer_text.clone())];
        let mut answers = self.state.answers.clone();
        answers.insert(question.id.to_string(), value);
        if let Some(comment) = comment {
            user_entries.push(TranscriptEntry::user(format!("{COMMENT_PREFIX}{comment}")));
            answers.insert(comment_key(question.id), AnswerValue::Text(comment));
        }

        match catalog.get(index + 1) {
            Some(next) => {
                let (ack, prompt) = tokio::join!(
                    self.gateway.acknowledge(&answer_text, next.label),
                    self.gateway.rephrase(next),
                );
                debug!(
                    step = index + 1,
                    ack_source = ?ack.source,
                    question_source = ?prompt.source,
                    "advancing conversation"
                );

                let emitted = vec![
                    TranscriptEntry::bot(ack.text, ack.source),
                    TranscriptEntry::bot(prompt.text, prompt.source),
                ];
                self.commit(answers, user_entries, &emitted, index + 1);
                self.phase = DialoguePhase::AwaitingAnswer(index + 1);

                Ok(TurnOutcome::Advanced {
                    step_index: index + 1,
                    emitted,
                })
            }
            None => {
                let outcome = self.engine.evaluate(&answers);
                let record = SubmissionRecord::from_draft(SubmissionDraft::from_outcome(
                    answers.clone(),
                    outcome,
                ));
                let receipt = match self.repository.append(record.clone()) {
                    Ok(id) => {
                        info!(submission_id = %id, total = record.total_score, "screening completed");
                        SubmissionReceipt::Stored { id }
                    }
                    Err(error) => {
                        warn!(%error, total = record.total_score, "screening completed but was not stored");
                        SubmissionReceipt::NotPersisted {
                            reason: error.to_string(),
                        }
                    }
                };

                let emitted = vec![TranscriptEntry::bot(CLOSING, TextSource::Fixed)];
                self.commit(answers, user_entries, &emitted, catalog.len());
                self.phase = DialoguePhase::Completed;

                Ok(TurnOutcome::Completed {
                    emitted,
                    record: Box::new(record),
                    receipt,
                })
            }
        }
    }

    fn commit(
        &mut self,
        answers: RawAnswers,
        user_entries: Vec<TranscriptEntry>,
        emitted: &[TranscriptEntry],
        step_index: usize,
    ) {
        self.state.answers = answers;
        self.state.transcript.extend(user_entries);
        self.state.transcript.extend(emitted.iter().cloned());
        self.state.step_index = step_index;
    }
}

/// Check an answer against its question and normalise it for storage.
/// Scale values are truncated to whole numbers and clamped into range.
pub(crate) fn accept(
    question: &QuestionDescriptor,
    value: AnswerValue,
) -> Result<AnswerValue, AnswerRejection> {
    match &question.kind {
        QuestionKind::FreeText => {
            let text = value.to_string().trim().to_string();
            if text.is_empty() {
                Err(AnswerRejection::EmptyText)
            } else {
                Ok(AnswerValue::Text(text))
            }
        }
        QuestionKind::ScoredChoice { .. } => {
            let selected = value.as_text().and_then(|text| question.option(text));
            match selected {
                Some(option) => Ok(AnswerValue::text(option.label)),
                None => Err(AnswerRejection::UnknownOption {
                    value: value.to_string(),
                }),
            }
        }
        QuestionKind::NumericScale { min, max, .. } => {
            let number = value.as_number().ok_or(AnswerRejection::NotANumber {
                min: *min,
                max: *max,
            })?;
            Ok(AnswerValue::Integer((number.trunc() as i64).clamp(*min, *max)))
        }
    }
}
