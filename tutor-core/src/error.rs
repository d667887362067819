//! Error taxonomy for the tutoring service.
//!
//! Every failure that can cross a crate boundary is folded into
//! [`TutorError`] so the HTTP layer can map each variant to a status
//! code and the retry layer can decide whether another attempt is
//! worthwhile.

use thiserror::Error;

use crate::retry::RetryClass;

/// Workspace-wide error type.
#[derive(Error, Debug)]
pub enum TutorError {
    /// A malformed request was refused, either the caller's to us or
    /// ours to the provider.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Provider rejected our credentials.
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Provider asked us to slow down.
    #[error("Rate limit error: {0}")]
    RateLimit(String),

    /// Provider account is out of quota. Looks like a rate limit on the
    /// wire but retrying will never help.
    #[error("Quota error: {0}")]
    Quota(String),

    /// Conversation no longer fits the provider context window.
    #[error("Context overflow: {0}")]
    ContextOverflow(String),

    /// Provider returned a server-side failure.
    #[error("Provider error: {0}")]
    Provider(String),

    /// Request to the provider timed out.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Anything we could not classify.
    #[error("Unexpected error: {0}")]
    Unknown(String),
}

impl TutorError {
    /// How the retry loop should treat this error.
    pub fn retry_class(&self) -> RetryClass {
        match self {
            TutorError::RateLimit(_) => RetryClass::RetryRateLimited,
            TutorError::Provider(_) | TutorError::Timeout(_) | TutorError::Unknown(_) => {
                RetryClass::Retry
            }
            TutorError::Validation(_)
            | TutorError::Authentication(_)
            | TutorError::Quota(_)
            | TutorError::ContextOverflow(_) => RetryClass::Fatal,
        }
    }
}

pub type Result<T> = std::result::Result<T, TutorError>;
