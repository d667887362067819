//! # prompt
//!
//! Prompt text and provider-facing message types. Everything the
//! tutoring service ever says to the model as instructions lives here,
//! so prompt wording can be reviewed in one place.

mod message;
mod ocr;
mod socratic;

pub use message::{ChatMessage, ChatRole};
pub use ocr::OCR_PROMPT;
pub use socratic::SOCRATIC_TUTOR_PROMPT;
