use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::GenerationConfig;

use super::super::catalog::QuestionDescriptor;
use super::fallback::{FallbackPhrases, LAST_RESORT_ACKNOWLEDGMENT, LAST_RESORT_QUESTION};
use super::{prompts, CompletionProvider, CompletionRequest, GenerationError, OpenAiCompatibleClient};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Where a piece of conversational text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextSource {
    Generated,
    CannedVariant,
    Label,
    AcknowledgmentPool,
    Fixed,
}

impl TextSource {
    pub fn is_fallback(self) -> bool {
        !matches!(self, TextSource::Generated)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedText {
    pub text: String,
    pub source: TextSource,
}

impl GeneratedText {
    fn new(text: impl Into<String>, source: TextSource) -> Self {
        Self {
            text: text.into(),
            source,
        }
    }
}

/// Produces question phrasings and acknowledgments. Never fails: every
/// provider problem resolves to a deterministic fallback tier.
pub struct TextGenerationGateway {
    provider: Option<Arc<dyn CompletionProvider>>,
    phrases: FallbackPhrases,
    rng: Mutex<StdRng>,
    timeout: Duration,
}

impl TextGenerationGateway {
    pub fn new(
        provider: Option<Arc<dyn CompletionProvider>>,
        phrases: FallbackPhrases,
        rng: StdRng,
        timeout: Duration,
    ) -> Self {
        Self {
            provider,
            phrases,
            rng: Mutex::new(rng),
            timeout,
        }
    }

    /// Gateway without a provider; everything comes from the fallback pools.
    pub fn offline() -> Self {
        Self::new(
            None,
            FallbackPhrases::standard(),
            StdRng::from_entropy(),
            DEFAULT_TIMEOUT,
        )
    }

    pub fn with_provider(provider: Arc<dyn CompletionProvider>) -> Self {
        Self::new(
            Some(provider),
            FallbackPhrases::standard(),
            StdRng::from_entropy(),
            DEFAULT_TIMEOUT,
        )
    }

    pub fn from_config(config: &GenerationConfig) -> Result<Self, GenerationError> {
        let provider = OpenAiCompatibleClient::from_config(config)?
            .map(|client| Arc::new(client) as Arc<dyn CompletionProvider>);

        Ok(Self::new(
            provider,
            FallbackPhrases::standard(),
            StdRng::from_entropy(),
            config.timeout,
        ))
    }

    /// Replace the random source with a seeded one so fallback picks repeat.
    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            ..self
        }
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        Self { timeout, ..self }
    }

    pub fn is_online(&self) -> bool {
        self.provider.is_some()
    }

    pub fn phrases(&self) -> &FallbackPhrases {
        &self.phrases
    }

    pub async fn rephrase(&self, question: &QuestionDescriptor) -> GeneratedText {
        let range = question.range_hint();
        self.rephrase_question(Some(question.id), question.label, range.as_deref())
            .await
    }

    /// Fallback order: generated, canned variant for the id, the label itself,
    /// then a fixed "next question" line.
    pub async fn rephrase_question(
        &self,
        question_id: Option<&str>,
        label: &str,
        range_hint: Option<&str>,
    ) -> GeneratedText {
        if let Some(text) = self.generate(prompts::rephrase(label, range_hint)).await {
            return GeneratedText::new(text, TextSource::Generated);
        }

        if let Some(variant) = question_id.and_then(|id| self.pick(self.phrases.variants_for(id))) {
            return GeneratedText::new(variant, TextSource::CannedVariant);
        }

        let label = label.trim();
        if label.is_empty() {
            GeneratedText::new(LAST_RESORT_QUESTION, TextSource::Fixed)
        } else {
            GeneratedText::new(label, TextSource::Label)
        }
    }

    /// Generated text is cut before any question it contains and falls back
    /// to the generic pool when nothing usable remains.
    pub async fn acknowledge(&self, user_answer: &str, next_label: &str) -> GeneratedText {
        if let Some(text) = self
            .generate(prompts::acknowledge(user_answer, next_label))
            .await
        {
            match sanitize_acknowledgment(&text) {
                Some(clean) => return GeneratedText::new(clean, TextSource::Generated),
                None => debug!("generated acknowledgment was empty once cut at the question mark"),
            }
        }

        match self.pick(self.phrases.acknowledgments()) {
            Some(ack) => GeneratedText::new(ack, TextSource::AcknowledgmentPool),
            None => GeneratedText::new(LAST_RESORT_ACKNOWLEDGMENT, TextSource::Fixed),
        }
    }

    async fn generate(&self, request: CompletionRequest) -> Option<String> {
        let provider = self.provider.as_ref()?;
        let kind = request.kind;
        match bounded(self.timeout, provider.complete(request)).await {
            Ok(text) => Some(text),
            Err(error) => {
                warn!(?kind, %error, "text generation failed, using fallback");
                None
            }
        }
    }

    fn pick(&self, pool: &[&'static str]) -> Option<&'static str> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        pool.choose(&mut *rng).copied()
    }
}

async fn bounded<F>(limit: Duration, call: F) -> Result<String, GenerationError>
where
    F: Future<Output = Result<String, GenerationError>>,
{
    tokio::time::timeout(limit, call)
        .await
        .map_err(|_| GenerationError::TimedOut(limit))?
}

/// Completions without a `?` pass through trimmed. Otherwise only the text
/// before the first `?` is kept, trailing periods, exclamation marks and
/// whitespace are dropped, and a single period closes the sentence.
pub fn sanitize_acknowledgment(text: &str) -> Option<String> {
    let text = text.trim();
    let clean = match text.split_once('?') {
        None => text.to_string(),
        Some((head, _)) => {
            let head = head
                .trim_end_matches(|c: char| c == '.' || c == '!' || c.is_whitespace())
                .trim_start();
            if head.is_empty() {
                String::new()
            } else {
                format!("{head}.")
            }
        }
    };
    (!clean.is_empty()).then_some(clean)
}
