use super::common::*;
use crate::workflows::screening::catalog::ids;
use crate::workflows::screening::{
    interpret_profile, score_answers, AnswerValue, ProfileFlags, ProfileHint, RawAnswers,
    RiskBand, ScoredPack, FLAG_THRESHOLD, HIGH_RISK_TOTAL_THRESHOLD,
};

fn ratings(values: &[(&str, i64)]) -> RawAnswers {
    values
        .iter()
        .map(|(id, value)| (id.to_string(), AnswerValue::Integer(*value)))
        .collect()
}

fn profile_for(raw: &RawAnswers) -> (ProfileFlags, String) {
    let pack = score_answers(raw, &catalog());
    let profile = interpret_profile(raw, &pack);
    (profile.flags, profile.hint)
}

#[test]
fn scenario_a_is_musculoskeletal_and_lower_risk() {
    let raw = scenario_a();
    let pack = score_answers(&raw, &catalog());
    let profile = interpret_profile(&raw, &pack);

    assert!(profile.flags.pain_high);
    assert!(profile.flags.function_high);
    assert!(!profile.flags.psychosocial_high);
    assert!(!profile.flags.fear_avoidance_high);
    assert!(!profile.flags.work_concern_high);
    assert_eq!(profile.hint, ProfileHint::MusculoskeletalDominant.text());
    assert_eq!(profile.risk_text, RiskBand::Lower.text());
}

#[test]
fn risk_flips_between_fifty_and_fifty_one() {
    let pack = |total: f64| ScoredPack {
        scored: Default::default(),
        total,
    };
    let raw = RawAnswers::new();

    assert_eq!(
        interpret_profile(&raw, &pack(50.0)).risk_text,
        RiskBand::Lower.text()
    );
    assert_eq!(
        interpret_profile(&raw, &pack(51.0)).risk_text,
        RiskBand::Higher.text()
    );
    assert_eq!(
        interpret_profile(&raw, &pack(50.5)).risk_text,
        RiskBand::Higher.text()
    );
    assert_eq!(HIGH_RISK_TOTAL_THRESHOLD, 50.0);
}

#[test]
fn every_flag_fires_at_seven_not_six() {
    assert_eq!(FLAG_THRESHOLD, 7.0);

    let (flags, _) = profile_for(&ratings(&[(ids::PAIN, 6)]));
    assert!(!flags.pain_high);
    let (flags, _) = profile_for(&ratings(&[(ids::PAIN, 7)]));
    assert!(flags.pain_high);

    // light work raw 3 -> scored 7
    let (flags, _) = profile_for(&ratings(&[(ids::LIGHT_WORK, 4)]));
    assert!(!flags.function_high);
    let (flags, _) = profile_for(&ratings(&[(ids::LIGHT_WORK, 3)]));
    assert!(flags.function_high);

    let (flags, _) = profile_for(&ratings(&[(ids::MOOD, 7)]));
    assert!(flags.psychosocial_high);

    let (flags, _) = profile_for(&ratings(&[(ids::AVOID_NORMAL, 7)]));
    assert!(flags.fear_avoidance_high);

    let (flags, _) = profile_for(&ratings(&[(ids::WORK_IN_THREE_MONTHS, 3)]));
    assert!(flags.work_concern_high);
    let (flags, _) = profile_for(&ratings(&[(ids::WORK_IN_THREE_MONTHS, 4)]));
    assert!(!flags.work_concern_high);
}

#[test]
fn missing_reverse_items_do_not_raise_function_flag() {
    let (flags, hint) = profile_for(&RawAnswers::new());
    assert_eq!(flags, ProfileFlags::default());
    assert_eq!(hint, ProfileHint::Mixed.text());
}

#[test]
fn raising_an_input_never_clears_its_flag() {
    let base = ratings(&[
        (ids::PAIN, 3),
        (ids::STRESS, 3),
        (ids::STOP_SIGNAL, 3),
        (ids::LIGHT_WORK, 8),
    ]);
    let (before, _) = profile_for(&base);

    for id in [ids::PAIN, ids::STRESS, ids::STOP_SIGNAL] {
        let mut raised = base.clone();
        raised.insert(id.to_string(), AnswerValue::Integer(9));
        let (after, _) = profile_for(&raised);
        assert!(after.pain_high >= before.pain_high);
        assert!(after.psychosocial_high >= before.psychosocial_high);
        assert!(after.fear_avoidance_high >= before.fear_avoidance_high);
        assert!(after.function_high >= before.function_high);
    }
}

#[test]
fn hint_priority_chain() {
    let (_, hint) = profile_for(&ratings(&[(ids::STRESS, 8)]));
    assert_eq!(hint, ProfileHint::PsychosocialDominant.text());

    let (_, hint) = profile_for(&ratings(&[(ids::PAIN, 9), (ids::STRESS, 2)]));
    assert_eq!(hint, ProfileHint::MusculoskeletalDominant.text());

    let (_, hint) = profile_for(&ratings(&[(ids::PAIN, 9), (ids::STRESS, 9)]));
    assert_eq!(hint, ProfileHint::Combined.text());

    let (_, hint) = profile_for(&ratings(&[(ids::STOP_SIGNAL, 9)]));
    assert_eq!(hint, ProfileHint::Mixed.text());
}

#[test]
fn combined_rule_is_shadowed_for_psychosocial_with_fear_avoidance() {
    let flags = ProfileFlags {
        psychosocial_high: true,
        fear_avoidance_high: true,
        ..ProfileFlags::default()
    };
    assert_eq!(ProfileHint::select(&flags), ProfileHint::PsychosocialDominant);
}
