use serde::Serialize;

/// Stable identifiers the rubric refers to by name.
pub mod ids {
    pub const INTRO: &str = "open_intro";
    pub const DURATION: &str = "q1_duration";
    pub const PAIN: &str = "q2_pain";
    pub const LIGHT_WORK: &str = "q3_lightWork";
    pub const SLEEP: &str = "q4_sleep";
    pub const STRESS: &str = "q5_stress";
    pub const MOOD: &str = "q6_mood";
    pub const CHRONICITY_RISK: &str = "q7_risk";
    pub const WORK_IN_THREE_MONTHS: &str = "q8_work3mo";
    pub const STOP_SIGNAL: &str = "q9_stopSignal";
    pub const AVOID_NORMAL: &str = "q10_avoidNormal";
}

/// One selectable answer of a scored choice question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoiceOption {
    pub label: &'static str,
    pub score: u8,
}

/// Answer shape and kind-specific parameters of a question.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum QuestionKind {
    #[serde(rename = "text")]
    FreeText,
    #[serde(rename = "select_scored")]
    ScoredChoice { options: Vec<ChoiceOption> },
    #[serde(rename = "scale")]
    NumericScale { min: i64, max: i64, reverse: bool },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionDescriptor {
    pub id: &'static str,
    pub label: &'static str,
    #[serde(flatten)]
    pub kind: QuestionKind,
}

impl QuestionDescriptor {
    /// Free-text questions are recorded but never contribute to the total.
    pub fn is_scored(&self) -> bool {
        !matches!(self.kind, QuestionKind::FreeText)
    }

    pub fn option(&self, label: &str) -> Option<&ChoiceOption> {
        match &self.kind {
            QuestionKind::ScoredChoice { options } => {
                options.iter().find(|option| option.label == label)
            }
            _ => None,
        }
    }

    /// `(min–max)` hint for numeric scales, used when asking for a rephrase.
    pub fn range_hint(&self) -> Option<String> {
        match self.kind {
            QuestionKind::NumericScale { min, max, .. } => Some(format!("({min}–{max})")),
            _ => None,
        }
    }
}

/// Ordered, immutable list of questions presented in a conversation.
#[derive(Debug, Clone)]
pub struct QuestionCatalog {
    questions: Vec<QuestionDescriptor>,
}

impl QuestionCatalog {
    pub fn new(questions: Vec<QuestionDescriptor>) -> Self {
        Self { questions }
    }

    pub fn standard() -> Self {
        Self::new(standard_questions())
    }

    pub fn questions(&self) -> &[QuestionDescriptor] {
        &self.questions
    }

    pub fn get(&self, index: usize) -> Option<&QuestionDescriptor> {
        self.questions.get(index)
    }

    pub fn find(&self, id: &str) -> Option<&QuestionDescriptor> {
        self.questions.iter().find(|question| question.id == id)
    }

    /// Question whose label matches, ignoring surrounding whitespace.
    pub fn find_by_label(&self, label: &str) -> Option<&QuestionDescriptor> {
        let label = label.trim();
        self.questions.iter().find(|question| question.label == label)
    }

    pub fn label(&self, id: &str) -> Option<&'static str> {
        self.find(id).map(|question| question.label)
    }

    pub fn scoring_items(&self) -> impl Iterator<Item = &QuestionDescriptor> {
        self.questions.iter().filter(|question| question.is_scored())
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

fn scale(id: &'static str, label: &'static str, reverse: bool) -> QuestionDescriptor {
    QuestionDescriptor {
        id,
        label,
        kind: QuestionKind::NumericScale {
            min: 0,
            max: 10,
            reverse,
        },
    }
}

fn standard_questions() -> Vec<QuestionDescriptor> {
    let duration_options = [
        ("0–1 uker", 1),
        ("1–2 uker", 2),
        ("3–4 uker", 3),
        ("4–5 uker", 4),
        ("6–8 uker", 5),
        ("9–11 uker", 6),
        ("3–6 måneder", 7),
        ("6–9 måneder", 8),
        ("9–12 måneder", 9),
        ("Over ett år", 10),
    ]
    .into_iter()
    .map(|(label, score)| ChoiceOption { label, score })
    .collect();

    vec![
        QuestionDescriptor {
            id: ids::INTRO,
            label: "Før vi starter: hva er det viktigste du ønsker at vi skal forstå om plagene dine?",
            kind: QuestionKind::FreeText,
        },
        QuestionDescriptor {
            id: ids::DURATION,
            label: "For å få litt kontekst: hvor lenge har du hatt disse plagene?",
            kind: QuestionKind::ScoredChoice {
                options: duration_options,
            },
        },
        scale(
            ids::PAIN,
            "Når du ser tilbake på siste uke: hvor sterke smerter har du hatt? (0–10)",
            false,
        ),
        scale(
            ids::LIGHT_WORK,
            "I hvor stor grad opplever du at du kan gjøre lettere arbeid under en time? (0–10)",
            true,
        ),
        scale(ids::SLEEP, "Hvordan har nattesøvnen fungert? (0–10)", true),
        scale(
            ids::STRESS,
            "Hvor anspent eller stresset har du kjent deg den siste uken? (0–10)",
            false,
        ),
        scale(
            ids::MOOD,
            "I hvilken grad har du kjent deg nedstemt den siste uken? (0–10)",
            false,
        ),
        scale(
            ids::CHRONICITY_RISK,
            "Hva tenker du om risikoen for at plagene kan bli langvarige? (0–10)",
            false,
        ),
        scale(
            ids::WORK_IN_THREE_MONTHS,
            "Hvor stor tror du sjansen er for at du er i arbeid om tre måneder? (0–10)",
            true,
        ),
        scale(
            ids::STOP_SIGNAL,
            "Hvis plagene øker, føler du at du bør stoppe det du gjør til det roer seg? (0–10)",
            false,
        ),
        scale(
            ids::AVOID_NORMAL,
            "Opplever du at du bør unngå normale aktiviteter/arbeid med smerten du har nå? (0–10)",
            false,
        ),
    ]
}
