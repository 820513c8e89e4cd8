mod interpretation;
mod rubric;
mod rules;

pub use interpretation::{
    interpret_profile, InterpretationProfile, ProfileFlags, ProfileHint, RiskBand,
};
pub use rubric::{FLAG_THRESHOLD, HIGH_RISK_TOTAL_THRESHOLD};
pub use rules::score_answers;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::answers::{ItemScores, RawAnswers};
use super::catalog::QuestionCatalog;
use super::summary::{build_summary, Summary};

/// Itemized scores plus the additive total over the scoring items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPack {
    pub scored: ItemScores,
    pub total: f64,
}

/// Stateless evaluator running scoring, interpretation and summary in order.
pub struct ScreeningEngine {
    catalog: Arc<QuestionCatalog>,
}

impl ScreeningEngine {
    pub fn new(catalog: Arc<QuestionCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    pub fn evaluate(&self, raw: &RawAnswers) -> ScreeningOutcome {
        let scored = score_answers(raw, &self.catalog);
        let interpretation = interpret_profile(raw, &scored);
        let summary = build_summary(raw, &scored, &interpretation, &self.catalog);

        ScreeningOutcome {
            scored,
            interpretation,
            summary,
        }
    }
}

/// Output of one pass through the rubric.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreeningOutcome {
    pub scored: ScoredPack,
    pub interpretation: InterpretationProfile,
    pub summary: Summary,
}
