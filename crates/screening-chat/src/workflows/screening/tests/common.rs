use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::response::Response;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::Value;

use crate::workflows::screening::catalog::ids;
use crate::workflows::screening::{
    AnswerSubmission, AnswerValue, CompletionProvider, CompletionRequest, FallbackPhrases, GenerationError,
    GenerationKind, QuestionCatalog, RawAnswers, RepositoryError, ScreeningService,
    SubmissionId, SubmissionRecord, SubmissionRepository, TextGenerationGateway,
};

pub(super) fn catalog() -> Arc<QuestionCatalog> {
    Arc::new(QuestionCatalog::standard())
}

pub(super) fn offline_gateway() -> Arc<TextGenerationGateway> {
    Arc::new(TextGenerationGateway::offline().with_seed(7))
}

pub(super) fn gateway_with(provider: Arc<dyn CompletionProvider>) -> TextGenerationGateway {
    TextGenerationGateway::new(
        Some(provider),
        FallbackPhrases::standard(),
        StdRng::seed_from_u64(7),
        Duration::from_millis(200),
    )
}

/// Pain 8, light work 2, sleep 9, work outlook 8, duration "6–8 uker",
/// stress/mood/stop/avoid at 2, chronicity left out.
pub(super) fn scenario_a() -> RawAnswers {
    [
        (ids::INTRO, AnswerValue::text("Vondt i korsryggen etter løft")),
        (ids::DURATION, AnswerValue::text("6–8 uker")),
        (ids::PAIN, AnswerValue::Integer(8)),
        (ids::LIGHT_WORK, AnswerValue::Integer(2)),
        (ids::SLEEP, AnswerValue::Integer(9)),
        (ids::STRESS, AnswerValue::Integer(2)),
        (ids::MOOD, AnswerValue::Integer(2)),
        (ids::WORK_IN_THREE_MONTHS, AnswerValue::Integer(8)),
        (ids::STOP_SIGNAL, AnswerValue::Integer(2)),
        (ids::AVOID_NORMAL, AnswerValue::Integer(2)),
    ]
    .into_iter()
    .map(|(id, value)| (id.to_string(), value))
    .collect()
}

/// Scenario A answered turn by turn, with chronicity set to 0.
pub(super) fn scenario_a_turns() -> Vec<AnswerSubmission> {
    vec![
        AnswerSubmission::new("Vondt i korsryggen etter løft"),
        AnswerSubmission::new("6–8 uker"),
        scale(8).with_comment("Verst om morgenen"),
        scale(2),
        scale(9),
        scale(2),
        scale(2),
        scale(0),
        scale(8),
        scale(2),
        scale(2),
    ]
}

pub(super) fn scale(value: i64) -> AnswerSubmission {
    AnswerSubmission::new(AnswerValue::Integer(value))
}

pub(super) fn build_service() -> (Arc<ScreeningService<MemoryRepository>>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = ScreeningService::new(catalog(), offline_gateway(), repository.clone());
    (Arc::new(service), repository)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<VecDeque<SubmissionRecord>>>,
}

impl MemoryRepository {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }
}

impl SubmissionRepository for MemoryRepository {
    fn append(&self, record: SubmissionRecord) -> Result<SubmissionId, RepositoryError> {
        let id = record.id.clone();
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .push_front(record);
        Ok(id)
    }

    fn list(&self) -> Result<Vec<SubmissionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.iter().cloned().collect())
    }

    fn clear(&self) -> Result<(), RepositoryError> {
        self.records.lock().expect("repository mutex poisoned").clear();
        Ok(())
    }
}

pub(super) struct UnavailableRepository;

impl SubmissionRepository for UnavailableRepository {
    fn append(&self, _record: SubmissionRecord) -> Result<SubmissionId, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn list(&self) -> Result<Vec<SubmissionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn clear(&self) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }
}

/// Provider answering every request of a kind with a fixed reply.
pub(super) struct ScriptedProvider {
    rephrase: Result<String, u16>,
    acknowledge: Result<String, u16>,
    pub(super) calls: AtomicUsize,
}

impl ScriptedProvider {
    pub(super) fn new(rephrase: Result<&str, u16>, acknowledge: Result<&str, u16>) -> Self {
        Self {
            rephrase: rephrase.map(str::to_string),
            acknowledge: acknowledge.map(str::to_string),
            calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn failing() -> Self {
        Self::new(Err(503), Err(503))
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = match request.kind {
            GenerationKind::Rephrase => &self.rephrase,
            GenerationKind::Acknowledge => &self.acknowledge,
        };
        reply
            .clone()
            .map_err(|status| GenerationError::Status { status })
    }
}

/// Provider that records every user prompt and echoes a fixed reply.
#[derive(Default)]
pub(super) struct RecordingProvider {
    pub(super) prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl CompletionProvider for RecordingProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<String, GenerationError> {
        self.prompts
            .lock()
            .expect("prompt log poisoned")
            .push(request.user);
        Ok("Hvordan har du sovet i det siste?".to_string())
    }
}

/// Provider that never answers within the gateway timeout.
pub(super) struct StalledProvider;

#[async_trait]
impl CompletionProvider for StalledProvider {
    async fn complete(&self, _request: CompletionRequest) -> Result<String, GenerationError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok("too late".to_string())
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
