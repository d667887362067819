//! Domain types round-tripped between client and server.

mod message;
mod state;

pub use message::{Message, MessageRole};
pub use state::{
    CompletionStatus, CorrectnessLevel, QuestionComplexity, StuckState, UnderstandingLevel,
    UnderstandingState,
};
