use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::answers::{AnswerLookup, RawAnswers, COMMENT_SUFFIX};
use super::catalog::{ids, QuestionCatalog};
use super::scoring::{InterpretationProfile, ScoredPack};

const MAX_TOP_DRIVERS: usize = 3;
const MAX_FOCUS_HINTS: usize = 3;

const CHIEF_COMPLAINT_PLACEHOLDER: &str = "(ikke oppgitt)";
const DURATION_PLACEHOLDER: &str = "(ikke valgt)";

const FOCUS_PSYCHOSOCIAL: &str = "Psykososialt/stress: se stress, søvn, belastning og støtte.";
const FOCUS_FEAR_AVOIDANCE: &str = "Unngåelse: utforsk trygg aktivitet og gradvis økning (demo).";
const FOCUS_FUNCTION: &str = "Funksjon/søvn: se søvn og tilrettelegging/aktivitetsdose (demo).";
const FOCUS_PAIN: &str = "Smerte: se smerteintensitet og triggere/lindring (demo).";
const FOCUS_NONE: &str = "Ingen tydelige 'høye' flagg i demo-terskler – se helheten.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverEntry {
    pub id: String,
    pub label: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentEntry {
    pub id: String,
    pub text: String,
}

/// Clinician-facing digest of a completed questionnaire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub chief_complaint: String,
    pub duration: String,
    pub top_drivers: Vec<DriverEntry>,
    pub focus_hints: Vec<String>,
    pub extra_comments: Vec<CommentEntry>,
}

pub fn build_summary(
    raw: &RawAnswers,
    scored: &ScoredPack,
    interpretation: &InterpretationProfile,
    catalog: &QuestionCatalog,
) -> Summary {
    Summary {
        chief_complaint: raw
            .trimmed(ids::INTRO)
            .unwrap_or_else(|| CHIEF_COMPLAINT_PLACEHOLDER.to_string()),
        duration: raw
            .trimmed(ids::DURATION)
            .unwrap_or_else(|| DURATION_PLACEHOLDER.to_string()),
        top_drivers: top_drivers(scored, catalog),
        focus_hints: focus_hints(interpretation),
        extra_comments: extra_comments(raw),
    }
}

/// Highest scoring items, duration excluded. `sort_by` is stable, so equal
/// scores keep the order they were scored in (catalog order).
fn top_drivers(scored: &ScoredPack, catalog: &QuestionCatalog) -> Vec<DriverEntry> {
    let mut entries: Vec<DriverEntry> = scored
        .scored
        .iter()
        .filter(|(id, _)| *id != ids::DURATION)
        .filter_map(|(id, score)| {
            let score = score.filter(|value| value.is_finite())?;
            Some(DriverEntry {
                id: id.to_string(),
                label: catalog
                    .label(id)
                    .map(str::to_string)
                    .unwrap_or_else(|| id.to_string()),
                score,
            })
        })
        .collect();

    entries.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    entries.truncate(MAX_TOP_DRIVERS);
    entries
}

fn focus_hints(interpretation: &InterpretationProfile) -> Vec<String> {
    let flags = &interpretation.flags;
    let mut hints: Vec<String> = [
        (flags.psychosocial_high, FOCUS_PSYCHOSOCIAL),
        (flags.fear_avoidance_high, FOCUS_FEAR_AVOIDANCE),
        (flags.function_high, FOCUS_FUNCTION),
        (flags.pain_high, FOCUS_PAIN),
    ]
    .into_iter()
    .filter(|(raised, _)| *raised)
    .map(|(_, hint)| hint.to_string())
    .take(MAX_FOCUS_HINTS)
    .collect();

    if hints.is_empty() {
        hints.push(FOCUS_NONE.to_string());
    }
    hints
}

fn extra_comments(raw: &RawAnswers) -> Vec<CommentEntry> {
    raw.iter()
        .filter_map(|(key, value)| {
            let id = key.strip_suffix(COMMENT_SUFFIX)?;
            let text = value.to_string().trim().to_string();
            (!text.is_empty()).then(|| CommentEntry {
                id: id.to_string(),
                text,
            })
        })
        .collect()
}
