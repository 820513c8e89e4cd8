//! Turn-based screening questionnaire.
//!
//! A [`DialogueController`] walks the [`QuestionCatalog`] one question at a
//! time, asking the [`TextGenerationGateway`] for friendlier phrasing and
//! short acknowledgments. Generation is best effort: every gateway call
//! resolves to canned text when the provider is missing or failing, so a
//! conversation always reaches completion. The final answer runs the
//! deterministic rubric (scoring, interpretation, summary) and the composed
//! [`SubmissionRecord`] is handed to a [`SubmissionRepository`].

pub mod answers;
pub mod catalog;
pub mod dialogue;
pub mod generation;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod summary;
pub mod views;

#[cfg(test)]
mod tests;

pub use answers::{
    comment_key, AnswerLookup, AnswerValue, ItemScores, RawAnswers, ScoreLookup, COMMENT_SUFFIX,
};
pub use catalog::{ChoiceOption, QuestionCatalog, QuestionDescriptor, QuestionKind};
pub use dialogue::{
    AnswerRejection, AnswerSubmission, DialogueController, DialogueError, DialoguePhase,
    DialogueState, Speaker, SubmissionReceipt, TranscriptEntry, TurnOutcome,
};
pub use generation::{
    sanitize_acknowledgment, CompletionProvider, CompletionRequest, FallbackPhrases,
    GeneratedText, GenerationError, GenerationKind, OpenAiCompatibleClient, TextGenerationGateway,
    TextSource,
};
pub use repository::{
    RepositoryError, SubmissionDraft, SubmissionError, SubmissionId, SubmissionRecord,
    SubmissionRepository,
};
pub use router::screening_router;
pub use scoring::{
    interpret_profile, score_answers, InterpretationProfile, ProfileFlags, ProfileHint, RiskBand,
    ScoredPack, ScreeningEngine, ScreeningOutcome, FLAG_THRESHOLD, HIGH_RISK_TOTAL_THRESHOLD,
};
pub use service::{
    ConversationId, ConversationView, ScreeningService, ScreeningServiceError,
    StartedConversation, TurnTexts, DEFAULT_SESSION_IDLE_TIMEOUT,
};
pub use summary::{build_summary, CommentEntry, DriverEntry, Summary};
pub use views::{ClinicianView, FlagLine, LabelledRow};
