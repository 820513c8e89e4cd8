use std::collections::HashMap;

use super::super::catalog::ids;

/// Canned phrasing used whenever live generation is unavailable.
#[derive(Debug, Clone, Default)]
pub struct FallbackPhrases {
    question_variants: HashMap<&'static str, Vec<&'static str>>,
    acknowledgments: Vec<&'static str>,
}

impl FallbackPhrases {
    pub fn new(
        question_variants: HashMap<&'static str, Vec<&'static str>>,
        acknowledgments: Vec<&'static str>,
    ) -> Self {
        Self {
            question_variants,
            acknowledgments,
        }
    }

    pub fn standard() -> Self {
        Self::new(standard_variants(), STANDARD_ACKNOWLEDGMENTS.to_vec())
    }

    pub fn variants_for(&self, question_id: &str) -> &[&'static str] {
        self.question_variants
            .get(question_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn acknowledgments(&self) -> &[&'static str] {
        &self.acknowledgments
    }
}

/// Used only if a custom pool was configured empty.
pub(crate) const LAST_RESORT_ACKNOWLEDGMENT: &str = "Skjønner. Takk for at du deler.";
pub(crate) const LAST_RESORT_QUESTION: &str = "OK, neste spørsmål.";

const STANDARD_ACKNOWLEDGMENTS: [&str; 5] = [
    "Takk for at du sier fra — det høres skikkelig ubehagelig ut.",
    "Skjønner. Takk for at du deler.",
    "Det gir mening. Vi tar ett steg om gangen.",
    "Jeg hører deg. La oss gå videre.",
    "Takk, det er nyttig å vite.",
];

fn standard_variants() -> HashMap<&'static str, Vec<&'static str>> {
    HashMap::from([
        (
            ids::INTRO,
            vec![
                "Før vi starter: hva er det viktigste du ønsker at vi skal forstå om plagene dine?",
                "Hva er det viktigste du vil at vi skal få med oss om plagene dine?",
                "Hvis du skulle oppsummere: hva håper du vi forstår om plagene dine?",
            ],
        ),
        (
            ids::DURATION,
            vec![
                "For å få litt kontekst: hvor lenge har du hatt disse plagene?",
                "Omtrent hvor lenge har dette vart?",
                "Når startet dette omtrent?",
            ],
        ),
        (
            ids::PAIN,
            vec![
                "Når du ser tilbake på siste uke: hvor sterke smerter har du hatt? (0–10)",
                "Hvis du må sette et tall (0–10): hvor vondt har det vært siste uka?",
                "På en skala fra 0 til 10 – hvor sterke smerter siste uke?",
            ],
        ),
        (
            ids::LIGHT_WORK,
            vec![
                "I hvor stor grad opplever du at du kan gjøre lettere arbeid under en time? (0–10)",
                "Hvis du må velge et tall (0–10): hvor mulig er lett arbeid under en time?",
                "0–10: hvor lett er det å gjøre lett arbeid under en time nå?",
            ],
        ),
        (
            ids::SLEEP,
            vec![
                "Hvordan har nattesøvnen fungert? (0–10)",
                "0–10: hvordan har søvnen vært i det siste?",
                "Hvis du må velge: hvor greit har du sovet? (0–10)",
            ],
        ),
        (
            ids::STRESS,
            vec![
                "Hvor anspent eller stresset har du kjent deg den siste uken? (0–10)",
                "0–10: hvor stresset/anspent har du kjent deg?",
                "Hvis du setter et tall: hvor stresset siste uke? (0–10)",
            ],
        ),
        (
            ids::MOOD,
            vec![
                "I hvilken grad har du kjent deg nedstemt den siste uken? (0–10)",
                "0–10: hvor nedstemt har du vært siste uke?",
                "Hvis du må velge et tall: hvor nedstemt har du kjent deg? (0–10)",
            ],
        ),
        (
            ids::CHRONICITY_RISK,
            vec![
                "Hva tenker du om risikoen for at plagene kan bli langvarige? (0–10)",
                "0–10: hvor stor risiko føler du det er for at dette blir langvarig?",
                "Hvis du må velge: hvor bekymret er du for at dette varer lenge? (0–10)",
            ],
        ),
        (
            ids::WORK_IN_THREE_MONTHS,
            vec![
                "Hvor stor tror du sjansen er for at du er i arbeid om tre måneder? (0–10)",
                "0–10: hvor sannsynlig er det at du er i jobb om 3 måneder?",
                "Hvis du må velge: sjansen for arbeid om tre måneder (0–10)?",
            ],
        ),
        (
            ids::STOP_SIGNAL,
            vec![
                "Hvis plagene øker, føler du at du bør stoppe det du gjør til det roer seg? (0–10)",
                "0–10: hvis det blir verre, føler du at du må stoppe helt til det roer seg?",
                "Hvis du må velge: hvor mye må du stoppe når det øker? (0–10)",
            ],
        ),
        (
            ids::AVOID_NORMAL,
            vec![
                "Opplever du at du bør unngå normale aktiviteter/arbeid med smerten du har nå? (0–10)",
                "0–10: hvor mye føler du at du bør unngå normale aktiviteter nå?",
                "Hvis du må velge: hvor mye unngår du normale ting pga smerten? (0–10)",
            ],
        ),
    ])
}
