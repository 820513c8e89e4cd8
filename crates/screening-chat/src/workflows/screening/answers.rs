use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Key suffix under which an optional free-text comment is stored next to an answer.
pub const COMMENT_SUFFIX: &str = "_comment";

/// A single raw answer: a selected/typed string or a scale value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Integer(i64),
    Decimal(f64),
    Text(String),
}

impl AnswerValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AnswerValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Numeric reading of the answer; `None` when missing, blank or not finite.
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            AnswerValue::Integer(value) => *value as f64,
            AnswerValue::Decimal(value) => *value,
            AnswerValue::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return None;
                }
                trimmed.parse::<f64>().ok()?
            }
        };
        value.is_finite().then_some(value)
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Integer(value) => write!(f, "{value}"),
            AnswerValue::Decimal(value) => write!(f, "{value}"),
            AnswerValue::Text(text) => f.write_str(text),
        }
    }
}

impl From<i64> for AnswerValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Answers keyed by question id, plus `{id}_comment` entries.
///
/// Comment discovery and driver tie-breaking both depend on the order in
/// which entries were recorded, so the map keeps insertion order.
pub type RawAnswers = IndexMap<String, AnswerValue>;

/// Per-item scores keyed by question id; `None` marks a missing or unscoreable answer.
pub type ItemScores = IndexMap<String, Option<f64>>;

/// Key under which the comment for `question_id` is stored.
pub fn comment_key(question_id: &str) -> String {
    format!("{question_id}{COMMENT_SUFFIX}")
}

/// Typed reads over [`RawAnswers`].
pub trait AnswerLookup {
    fn number(&self, key: &str) -> Option<f64>;

    /// Trimmed string form of an answer, whatever its variant.
    fn trimmed(&self, key: &str) -> Option<String>;
}

impl AnswerLookup for RawAnswers {
    fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(AnswerValue::as_number)
    }

    fn trimmed(&self, key: &str) -> Option<String> {
        self.get(key)
            .map(|value| value.to_string().trim().to_string())
            .filter(|value| !value.is_empty())
    }
}

pub trait ScoreLookup {
    /// Score of an item, with missing and unscoreable both reported as `None`.
    fn score(&self, key: &str) -> Option<f64>;
}

impl ScoreLookup for ItemScores {
    fn score(&self, key: &str) -> Option<f64> {
        self.get(key).copied().flatten()
    }
}
