use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::answers::RawAnswers;
use super::dialogue::{AnswerSubmission, DialogueError, SubmissionReceipt, TurnOutcome};
use super::repository::{SubmissionDraft, SubmissionRepository};
use super::service::{ConversationId, ScreeningService, ScreeningServiceError};

/// Router builder exposing the questionnaire, conversation and submission endpoints.
pub fn screening_router<R>(service: Arc<ScreeningService<R>>) -> Router
where
    R: SubmissionRepository + 'static,
{
    Router::new()
        .route("/api/questions", get(questions_handler::<R>))
        .route("/api/question", post(question_handler::<R>))
        .route("/api/turn", post(turn_handler::<R>))
        .route("/api/ack", post(ack_handler::<R>))
        .route("/api/conversations", post(start_handler::<R>))
        .route(
            "/api/conversations/:conversation_id",
            get(conversation_handler::<R>),
        )
        .route(
            "/api/conversations/:conversation_id/answers",
            post(answer_handler::<R>),
        )
        .route("/api/submit", post(submit_handler::<R>))
        .route("/api/score", post(score_handler::<R>))
        .route("/api/list", get(list_handler::<R>))
        .route("/api/clinician", get(clinician_handler::<R>))
        .route("/api/clear", post(clear_handler::<R>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QuestionRequest {
    #[serde(default)]
    question_id: Option<String>,
    #[serde(default)]
    label: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TurnRequest {
    #[serde(default)]
    user_answer: String,
    #[serde(default)]
    next_question_id: Option<String>,
    #[serde(default)]
    next_question_label: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ScoreRequest {
    raw_answers: RawAnswers,
}

pub(crate) async fn questions_handler<R>(
    State(service): State<Arc<ScreeningService<R>>>,
) -> Response
where
    R: SubmissionRepository + 'static,
{
    (StatusCode::OK, axum::Json(service.catalog().questions())).into_response()
}

pub(crate) async fn question_handler<R>(
    State(service): State<Arc<ScreeningService<R>>>,
    axum::Json(request): axum::Json<QuestionRequest>,
) -> Response
where
    R: SubmissionRepository + 'static,
{
    let text = service
        .rephrase_question(request.question_id.as_deref(), &request.label)
        .await;
    (StatusCode::OK, axum::Json(json!({ "text": text.text }))).into_response()
}

pub(crate) async fn turn_handler<R>(
    State(service): State<Arc<ScreeningService<R>>>,
    axum::Json(request): axum::Json<TurnRequest>,
) -> Response
where
    R: SubmissionRepository + 'static,
{
    let texts = service
        .turn(
            &request.user_answer,
            request.next_question_id.as_deref(),
            &request.next_question_label,
        )
        .await;
    let payload = json!({
        "ack": texts.ack.text,
        "question": texts.question.text,
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn ack_handler<R>(
    State(service): State<Arc<ScreeningService<R>>>,
    axum::Json(request): axum::Json<TurnRequest>,
) -> Response
where
    R: SubmissionRepository + 'static,
{
    let ack = service
        .acknowledge(&request.user_answer, &request.next_question_label)
        .await;
    (StatusCode::OK, axum::Json(json!({ "text": ack.text }))).into_response()
}

pub(crate) async fn start_handler<R>(State(service): State<Arc<ScreeningService<R>>>) -> Response
where
    R: SubmissionRepository + 'static,
{
    match service.start_conversation().await {
        Ok(started) => (StatusCode::CREATED, axum::Json(started)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn conversation_handler<R>(
    State(service): State<Arc<ScreeningService<R>>>,
    Path(conversation_id): Path<String>,
) -> Response
where
    R: SubmissionRepository + 'static,
{
    let id = ConversationId(conversation_id);
    match service.conversation(&id).await {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn answer_handler<R>(
    State(service): State<Arc<ScreeningService<R>>>,
    Path(conversation_id): Path<String>,
    axum::Json(submission): axum::Json<AnswerSubmission>,
) -> Response
where
    R: SubmissionRepository + 'static,
{
    let id = ConversationId(conversation_id);
    match service.answer(&id, submission).await {
        Ok(TurnOutcome::Advanced {
            step_index,
            emitted,
        }) => {
            let payload = json!({
                "conversationId": id,
                "completed": false,
                "stepIndex": step_index,
                "messages": emitted,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Ok(TurnOutcome::Completed {
            emitted,
            record,
            receipt,
        }) => {
            let status = match receipt {
                SubmissionReceipt::Stored { .. } => StatusCode::OK,
                SubmissionReceipt::NotPersisted { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            };
            let payload = json!({
                "conversationId": id,
                "completed": true,
                "messages": emitted,
                "submission": receipt,
                "totalScore": record.total_score,
            });
            (status, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<ScreeningService<R>>>,
    axum::Json(draft): axum::Json<SubmissionDraft>,
) -> Response
where
    R: SubmissionRepository + 'static,
{
    match service.submit(draft) {
        Ok(id) => (StatusCode::OK, axum::Json(json!({ "ok": true, "id": id }))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn score_handler<R>(
    State(service): State<Arc<ScreeningService<R>>>,
    axum::Json(request): axum::Json<ScoreRequest>,
) -> Response
where
    R: SubmissionRepository + 'static,
{
    let draft = service.preview(request.raw_answers);
    (StatusCode::OK, axum::Json(draft)).into_response()
}

pub(crate) async fn list_handler<R>(State(service): State<Arc<ScreeningService<R>>>) -> Response
where
    R: SubmissionRepository + 'static,
{
    match service.list() {
        Ok(records) => (StatusCode::OK, axum::Json(records)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn clinician_handler<R>(
    State(service): State<Arc<ScreeningService<R>>>,
) -> Response
where
    R: SubmissionRepository + 'static,
{
    match service.clinician_views() {
        Ok(views) => (StatusCode::OK, axum::Json(views)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn clear_handler<R>(State(service): State<Arc<ScreeningService<R>>>) -> Response
where
    R: SubmissionRepository + 'static,
{
    match service.clear() {
        Ok(()) => (StatusCode::OK, axum::Json(json!({ "ok": true }))).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: ScreeningServiceError) -> Response {
    let status = match &error {
        ScreeningServiceError::UnknownConversation(_) => StatusCode::NOT_FOUND,
        ScreeningServiceError::TurnInProgress => StatusCode::CONFLICT,
        ScreeningServiceError::Dialogue(DialogueError::Rejected(_)) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ScreeningServiceError::Dialogue(
            DialogueError::NotStarted | DialogueError::AlreadyStarted | DialogueError::Completed,
        ) => StatusCode::CONFLICT,
        ScreeningServiceError::Submission(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ScreeningServiceError::Dialogue(DialogueError::EmptyCatalog)
        | ScreeningServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
