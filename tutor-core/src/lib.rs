//! # tutor-core
//!
//! Core types shared by every crate in the Socratica workspace:
//! conversation messages, the stuck/understanding state that rides along
//! with each chat turn, the error taxonomy, retry with backoff, and
//! tracing initialization. Nothing in here knows about HTTP or SQL.

pub mod error;
pub mod logger;
pub mod retry;
pub mod types;

pub use error::{Result, TutorError};
pub use logger::init_tracing;
pub use retry::{retry_with_backoff, RetryClass, RetryPolicy};
pub use types::{
    CompletionStatus, CorrectnessLevel, Message, MessageRole, QuestionComplexity, StuckState,
    UnderstandingLevel, UnderstandingState,
};
