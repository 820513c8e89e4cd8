//! Conversational health-screening questionnaire.
//!
//! The [`workflows::screening`] module carries the dialogue controller, the
//! text-generation gateway and the deterministic scoring rubric. Configuration,
//! telemetry and the top-level error type live alongside it so the API service
//! can wire everything together.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
