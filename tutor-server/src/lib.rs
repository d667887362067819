//! # tutor-server
//!
//! HTTP API for the Socratica math tutor. Three route groups:
//!
//! - `POST /api/chat` – one Socratic tutoring turn
//! - `POST /api/ocr` – problem text extraction from an uploaded image
//! - `/api/sessions` – session persistence CRUD
//!
//! Chat and sessions respond in a `{"success", "data", "error"}`
//! envelope; OCR keeps a flat body. [`build_router`] exposes the wired
//! router so integration tests can drive it without a socket.

pub mod cli;
pub mod config;
pub mod response;
pub mod routes;
pub mod server;

pub use cli::{load_config, Cli, Commands};
pub use config::ServerConfig;
pub use server::{build_router, run_server, AppState};
