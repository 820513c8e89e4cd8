use super::{CompletionRequest, GenerationKind};

const SYSTEM_INSTRUCTION: &str = "Du er en varm, kort og nøytral samtaleassistent i en demo. \
     Svar på norsk. Ikke gi medisinske råd, ikke diagnostiser. \
     Hold det kort og menneskelig.";

pub(crate) fn rephrase(label: &str, range_hint: Option<&str>) -> CompletionRequest {
    let mut user = format!(
        "Lag en mer naturlig, mindre rigid formulering av dette spørsmålet, med samme mening: \"{label}\". \
         Maks 1 setning."
    );
    if let Some(range) = range_hint {
        user.push_str(&format!(
            " Spørsmålet besvares på en skala, inkluder \"{range}\" i setningen."
        ));
    }

    CompletionRequest {
        kind: GenerationKind::Rephrase,
        system: SYSTEM_INSTRUCTION.to_string(),
        user,
    }
}

pub(crate) fn acknowledge(user_answer: &str, next_label: &str) -> CompletionRequest {
    CompletionRequest {
        kind: GenerationKind::Acknowledge,
        system: SYSTEM_INSTRUCTION.to_string(),
        user: format!(
            "Bruker svarte: \"{user_answer}\". \
             Skriv en empatisk respons (maks 1 setning) som viser til svaret og leder naturlig \
             inn i neste spørsmål: \"{next_label}\". \
             Ikke still noe spørsmål selv. IKKE si 'Notert'."
        ),
    }
}
