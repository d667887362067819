//! # guidance
//!
//! The tutoring heuristics: confusion and stuck detection, progressive
//! hint instructions, adaptive question complexity, and lightweight
//! correctness grading of student answers. Everything here is pure
//! state-in, state-out; the HTTP layer threads the results through
//! request and response bodies.

pub mod adaptive;
pub mod hints;
pub mod stuck;
pub mod validation;

pub use adaptive::{determine_understanding, questioning_instructions};
pub use hints::{build_prompt_with_hints, hint_instructions};
pub use stuck::{
    calculate_hint_level, ConfusionClassifier, LexiconClassifier, StuckDetector, MAX_HINT_LEVEL,
    STUCK_THRESHOLD,
};
pub use validation::{assess_response, validate_expression, ResponseAssessment};
