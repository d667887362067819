//! Session store: tutoring session persistence over SQLite.
//!
//! ## Modules
//!
//! - [`error`] – Store error types
//! - [`models`] – Session, SessionDraft
//! - [`session_repo`] – SessionRepository (SQLite)
//! - [`sqlite_pool`] – SqlitePoolManager

mod error;
mod models;
mod session_repo;
mod sqlite_pool;


pub use error::StoreError;
pub use models::{Session, SessionDraft};
pub use session_repo::SessionRepository;
pub use sqlite_pool::SqlitePoolManager;
