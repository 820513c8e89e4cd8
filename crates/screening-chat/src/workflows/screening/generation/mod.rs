mod client;
mod fallback;
mod gateway;
mod prompts;

pub use client::OpenAiCompatibleClient;
pub use fallback::FallbackPhrases;
pub use gateway::{sanitize_acknowledgment, GeneratedText, TextGenerationGateway, TextSource};

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

/// What a completion is being asked for; lets providers and logs tell the two apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationKind {
    Rephrase,
    Acknowledge,
}

/// A single prompt exchange: one system instruction and one user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub kind: GenerationKind,
    pub system: String,
    pub user: String,
}

/// External text-completion service.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Return non-empty completion text, or an error for any kind of failure.
    async fn complete(&self, request: CompletionRequest) -> Result<String, GenerationError>;
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("no completion provider configured")]
    NotConfigured,
    #[error("completion request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("completion provider answered with status {status}")]
    Status { status: u16 },
    #[error("completion payload could not be decoded: {0}")]
    Malformed(#[source] reqwest::Error),
    #[error("completion payload carried no text")]
    EmptyCompletion,
    #[error("completion request timed out after {0:?}")]
    TimedOut(Duration),
    #[error("http client could not be built: {0}")]
    Client(#[source] reqwest::Error),
}
