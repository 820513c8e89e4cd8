use serde::{Deserialize, Serialize};

use super::super::answers::{AnswerLookup, RawAnswers, ScoreLookup};
use super::super::catalog::ids;
use super::rubric::{FLAG_THRESHOLD, HIGH_RISK_TOTAL_THRESHOLD};
use super::ScoredPack;

/// Independent indicators, each crossing [`FLAG_THRESHOLD`] on some input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileFlags {
    pub pain_high: bool,
    pub function_high: bool,
    pub psychosocial_high: bool,
    pub fear_avoidance_high: bool,
    pub work_concern_high: bool,
}

impl ProfileFlags {
    /// Display lines for the clinician view, in presentation order.
    pub fn labelled(&self) -> [(&'static str, bool); 5] {
        [
            ("Høy smerte (Q2 ≥ 7)", self.pain_high),
            (
                "Funksjon/søvn-problem (Q3/Q4 reverse ≥ 7)",
                self.function_high,
            ),
            ("Psykososialt (stress/mood ≥ 7)", self.psychosocial_high),
            (
                "Unngåelse/fare-signal (Q9/Q10 ≥ 7)",
                self.fear_avoidance_high,
            ),
            ("Arbeid-bekymring (Q8 reverse ≥ 7)", self.work_concern_high),
        ]
    }
}

/// Narrative pointer chosen from the flag combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileHint {
    PsychosocialDominant,
    MusculoskeletalDominant,
    Combined,
    Mixed,
}

impl ProfileHint {
    /// First matching rule wins; `Mixed` when none match.
    pub fn select(flags: &ProfileFlags) -> Self {
        let somatic = flags.pain_high || flags.function_high;
        if flags.psychosocial_high && !somatic {
            Self::PsychosocialDominant
        } else if somatic && !flags.psychosocial_high {
            Self::MusculoskeletalDominant
        } else if flags.psychosocial_high && (somatic || flags.fear_avoidance_high) {
            Self::Combined
        } else {
            Self::Mixed
        }
    }

    pub const fn text(self) -> &'static str {
        match self {
            Self::PsychosocialDominant => {
                "Pekepinne: stress/psykososial belastning ser ut til å dominere."
            }
            Self::MusculoskeletalDominant => {
                "Pekepinne: mer muskel-/skjelett (muskuloskeletal) / belastningsrelatert profil."
            }
            Self::Combined => "Pekepinne: muskel-/skjelett + stress/yellow flags samtidig.",
            Self::Mixed => "Blandet profil (flere faktorer samtidig).",
        }
    }
}

/// Binary risk reading of the total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskBand {
    Lower,
    Higher,
}

impl RiskBand {
    pub fn from_total(total: f64) -> Self {
        if total > HIGH_RISK_TOTAL_THRESHOLD {
            Self::Higher
        } else {
            Self::Lower
        }
    }

    pub const fn text(self) -> &'static str {
        match self {
            Self::Higher => "Score > 50: høyere estimert risiko (screening).",
            Self::Lower => "Score ≤ 50: lavere estimert risiko (screening).",
        }
    }
}

/// Flags, narrative hint and risk text for one completed questionnaire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterpretationProfile {
    pub flags: ProfileFlags,
    pub hint: String,
    pub risk_text: String,
}

fn raw_rating(raw: &RawAnswers, id: &str) -> f64 {
    raw.number(id).unwrap_or(0.0)
}

fn scored_rating(pack: &ScoredPack, id: &str) -> f64 {
    pack.scored.score(id).unwrap_or(0.0)
}

/// Derive flags from raw ratings (pain, stress, mood, stop/avoid signals) and
/// from reversed scores (light work, sleep, work outlook). Missing inputs
/// read as 0 and therefore never raise a flag.
pub fn interpret_profile(raw: &RawAnswers, pack: &ScoredPack) -> InterpretationProfile {
    let high = |value: f64| value >= FLAG_THRESHOLD;

    let flags = ProfileFlags {
        pain_high: high(raw_rating(raw, ids::PAIN)),
        function_high: high(scored_rating(pack, ids::LIGHT_WORK))
            || high(scored_rating(pack, ids::SLEEP)),
        psychosocial_high: high(raw_rating(raw, ids::STRESS)) || high(raw_rating(raw, ids::MOOD)),
        fear_avoidance_high: high(raw_rating(raw, ids::STOP_SIGNAL))
            || high(raw_rating(raw, ids::AVOID_NORMAL)),
        work_concern_high: high(scored_rating(pack, ids::WORK_IN_THREE_MONTHS)),
    };

    InterpretationProfile {
        flags,
        hint: ProfileHint::select(&flags).text().to_string(),
        risk_text: RiskBand::from_total(pack.total).text().to_string(),
    }
}
