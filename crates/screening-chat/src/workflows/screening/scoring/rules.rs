use super::super::answers::{AnswerValue, ItemScores, RawAnswers};
use super::super::catalog::{QuestionCatalog, QuestionDescriptor, QuestionKind};
use super::ScoredPack;

/// Score a single item. Free-text questions yield `None` (not part of the
/// map); scored questions yield `Some(None)` when the answer is missing or
/// does not map onto the item.
pub(crate) fn score_item(
    descriptor: &QuestionDescriptor,
    raw: Option<&AnswerValue>,
) -> Option<Option<f64>> {
    match &descriptor.kind {
        QuestionKind::FreeText => None,
        QuestionKind::ScoredChoice { options } => Some(raw.and_then(|value| {
            let selected = value.as_text()?;
            options
                .iter()
                .find(|option| option.label == selected)
                .map(|option| f64::from(option.score))
        })),
        QuestionKind::NumericScale { max, reverse, .. } => {
            Some(raw.and_then(AnswerValue::as_number).map(|value| {
                if *reverse {
                    *max as f64 - value
                } else {
                    value
                }
            }))
        }
    }
}

/// Convert raw answers into the itemized score map and the additive total.
///
/// Unscoreable items stay `null` in the map but count as 0 in the total.
pub fn score_answers(raw: &RawAnswers, catalog: &QuestionCatalog) -> ScoredPack {
    let mut scored = ItemScores::new();
    let mut total = 0.0;

    for descriptor in catalog.questions() {
        if let Some(score) = score_item(descriptor, raw.get(descriptor.id)) {
            total += score.unwrap_or(0.0);
            scored.insert(descriptor.id.to_string(), score);
        }
    }

    ScoredPack { scored, total }
}
