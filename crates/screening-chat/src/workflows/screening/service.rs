use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use super::answers::RawAnswers;
use super::catalog::QuestionCatalog;
use super::dialogue::{
    AnswerSubmission, DialogueController, DialogueError, DialoguePhase, TranscriptEntry,
    TurnOutcome,
};
use super::generation::{GeneratedText, TextGenerationGateway};
use super::repository::{
    RepositoryError, SubmissionDraft, SubmissionError, SubmissionId, SubmissionRecord,
    SubmissionRepository,
};
use super::scoring::ScreeningEngine;
use super::views::ClinicianView;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(pub String);

impl ConversationId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartedConversation {
    pub conversation_id: ConversationId,
    pub messages: Vec<TranscriptEntry>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationView {
    pub conversation_id: ConversationId,
    pub phase: DialoguePhase,
    pub step_index: usize,
    pub transcript: Vec<TranscriptEntry>,
}

/// Acknowledgment plus the phrasing of the question that follows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnTexts {
    pub ack: GeneratedText,
    pub question: GeneratedText,
}

/// Conversations without activity for this long are dropped.
pub const DEFAULT_SESSION_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

type Session<R> = Arc<tokio::sync::Mutex<DialogueController<R>>>;

struct SessionSlot<R> {
    controller: Session<R>,
    last_active: Instant,
}

/// Service composing the catalog, generation gateway, scoring engine and
/// submission store behind the HTTP surface.
pub struct ScreeningService<R> {
    catalog: Arc<QuestionCatalog>,
    gateway: Arc<TextGenerationGateway>,
    repository: Arc<R>,
    engine: ScreeningEngine,
    sessions: Mutex<HashMap<ConversationId, SessionSlot<R>>>,
    idle_timeout: Duration,
}

impl<R> ScreeningService<R>
where
    R: SubmissionRepository + 'static,
{
    pub fn new(
        catalog: Arc<QuestionCatalog>,
        gateway: Arc<TextGenerationGateway>,
        repository: Arc<R>,
    ) -> Self {
        Self {
            engine: ScreeningEngine::new(Arc::clone(&catalog)),
            catalog,
            gateway,
            repository,
            sessions: Mutex::new(HashMap::new()),
            idle_timeout: DEFAULT_SESSION_IDLE_TIMEOUT,
        }
    }

    pub fn with_session_idle_timeout(self, idle_timeout: Duration) -> Self {
        Self {
            idle_timeout,
            ..self
        }
    }

    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    /// Rephrase a label. A question found by id, or failing that by label,
    /// also supplies canned variants and the scale range.
    pub async fn rephrase_question(&self, question_id: Option<&str>, label: &str) -> GeneratedText {
        let question = question_id
            .and_then(|id| self.catalog.find(id))
            .or_else(|| self.catalog.find_by_label(label));
        let range = question.and_then(|question| question.range_hint());
        let id = question.map(|question| question.id).or(question_id);
        self.gateway
            .rephrase_question(id, label, range.as_deref())
            .await
    }

    pub async fn acknowledge(&self, user_answer: &str, next_label: &str) -> GeneratedText {
        self.gateway.acknowledge(user_answer, next_label).await
    }

    pub async fn turn(
        &self,
        user_answer: &str,
        next_question_id: Option<&str>,
        next_label: &str,
    ) -> TurnTexts {
        let (ack, question) = tokio::join!(
            self.acknowledge(user_answer, next_label),
            self.rephrase_question(next_question_id, next_label),
        );
        TurnTexts { ack, question }
    }

    pub async fn start_conversation(&self) -> Result<StartedConversation, ScreeningServiceError> {
        let mut controller = DialogueController::new(
            Arc::clone(&self.catalog),
            Arc::clone(&self.gateway),
            Arc::clone(&self.repository),
        );
        let messages = controller.start().await?;

        let conversation_id = self.register(controller);
        info!(conversation_id = %conversation_id, "conversation started");

        Ok(StartedConversation {
            conversation_id,
            messages,
        })
    }

    /// Submit one answer. A second answer arriving while the first is still
    /// being processed is refused instead of queued.
    pub async fn answer(
        &self,
        conversation_id: &ConversationId,
        submission: AnswerSubmission,
    ) -> Result<TurnOutcome, ScreeningServiceError> {
        let session = self.session(conversation_id)?;
        let mut controller = session
            .try_lock()
            .map_err(|_| ScreeningServiceError::TurnInProgress)?;

        let outcome = controller.submit_answer(submission).await?;
        if matches!(outcome, TurnOutcome::Completed { .. }) {
            self.sessions().remove(conversation_id);
        }
        Ok(outcome)
    }

    pub async fn conversation(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<ConversationView, ScreeningServiceError> {
        let session = self.session(conversation_id)?;
        let controller = session.lock().await;
        Ok(ConversationView {
            conversation_id: conversation_id.clone(),
            phase: controller.phase(),
            step_index: controller.state().step_index,
            transcript: controller.transcript().to_vec(),
        })
    }

    /// Store an explicitly assembled submission after validating it.
    pub fn submit(&self, draft: SubmissionDraft) -> Result<SubmissionId, ScreeningServiceError> {
        draft.validate(&self.engine)?;
        let record = SubmissionRecord::from_draft(draft);
        let total = record.total_score;
        let id = self.repository.append(record)?;
        info!(submission_id = %id, total, "submission stored");
        Ok(id)
    }

    /// Score raw answers without storing anything.
    pub fn preview(&self, raw_answers: RawAnswers) -> SubmissionDraft {
        let outcome = self.engine.evaluate(&raw_answers);
        SubmissionDraft::from_outcome(raw_answers, outcome)
    }

    pub fn list(&self) -> Result<Vec<SubmissionRecord>, ScreeningServiceError> {
        Ok(self.repository.list()?)
    }

    pub fn clinician_views(&self) -> Result<Vec<ClinicianView>, ScreeningServiceError> {
        Ok(self
            .repository
            .list()?
            .iter()
            .map(|record| ClinicianView::from_record(record, &self.catalog))
            .collect())
    }

    pub fn clear(&self) -> Result<(), ScreeningServiceError> {
        self.repository.clear()?;
        info!("submissions cleared");
        Ok(())
    }

    pub fn active_conversations(&self) -> usize {
        self.sessions().len()
    }

    /// Store a started controller, dropping conversations idle past the timeout.
    fn register(&self, controller: DialogueController<R>) -> ConversationId {
        let conversation_id = ConversationId::generate();
        let now = Instant::now();
        let mut sessions = self.sessions();

        let before = sessions.len();
        sessions.retain(|_, slot| now.saturating_duration_since(slot.last_active) < self.idle_timeout);
        let evicted = before - sessions.len();
        if evicted > 0 {
            debug!(evicted, "dropped idle conversations");
        }

        sessions.insert(
            conversation_id.clone(),
            SessionSlot {
                controller: Arc::new(tokio::sync::Mutex::new(controller)),
                last_active: now,
            },
        );
        conversation_id
    }

    /// Look up a live conversation and mark it active.
    fn session(&self, conversation_id: &ConversationId) -> Result<Session<R>, ScreeningServiceError> {
        let mut sessions = self.sessions();
        let slot = sessions
            .get_mut(conversation_id)
            .ok_or_else(|| ScreeningServiceError::UnknownConversation(conversation_id.clone()))?;
        slot.last_active = Instant::now();
        Ok(Arc::clone(&slot.controller))
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<ConversationId, SessionSlot<R>>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ScreeningServiceError {
    #[error("conversation {0} not found")]
    UnknownConversation(ConversationId),
    #[error("a turn is already being processed for this conversation")]
    TurnInProgress,
    #[error(transparent)]
    Dialogue(#[from] DialogueError),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
