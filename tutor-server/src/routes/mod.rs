//! HTTP route handlers.

pub mod chat;
pub mod ocr;
pub mod sessions;
