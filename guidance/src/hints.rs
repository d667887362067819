//! Progressive hint instructions.
//!
//! Once a student is stuck, the system prompt is extended with hint
//! instructions whose specificity escalates with the number of stuck
//! turns. Even the most specific level still phrases the hint as a
//! question.

use crate::stuck::{calculate_hint_level, MAX_HINT_LEVEL, STUCK_THRESHOLD};

/// Renders the hint addendum for the given escalation level. Level 0
/// (not stuck enough) renders nothing.
pub fn hint_instructions(level: u8, consecutive_confused: u32) -> String {
    let level = level.min(MAX_HINT_LEVEL);
    if level == 0 {
        return String::new();
    }

    let base = format!(
        "\n**HINT GENERATION INSTRUCTIONS (Hint Level {level}):**\n\n\
         Student is stuck after {consecutive_confused} consecutive confused responses. Offer a hint now while keeping the Socratic approach:\n\
         - Hints must be QUESTIONS, not direct answers\n\
         - NEVER provide direct answers, even inside a hint\n\
         - Every hint should guide student toward next step of the solution, not the full path\n\
         - Keep hints algebra-specific and problem-appropriate for the current equation\n"
    );

    match level {
        1 => format!(
            "{base}\n\
             **Hint Level 1 (Subtle Hint, 2-3 stuck turns):**\n\
             - Ask one subtle guiding question pointing at the general approach\n\
             - Gesture at which part of the equation matters, without naming the operation\n\
             - Example: \"What operation would help you get the variable by itself?\"\n"
        ),
        2 => format!(
            "{base}\n\
             **Hint Level 2 (More Specific Hint, 4-5 stuck turns):**\n\
             - Ask one more specific guiding question that narrows the approach to the relevant step\n\
             - Point at what is happening on both sides of the equation\n\
             - Name the term the student should focus on, but not what to do with it\n\
             - Example: \"What would happen if you performed the same operation on both sides to isolate x?\"\n"
        ),
        _ => format!(
            "{base}\n\
             **Hint Level 3 (Most Specific Hint, 6+ stuck turns):**\n\
             - Give the most specific hint allowed: guide directly to the next step, phrased as a question\n\
             - Name the operations the student needs and ask how they would apply them\n\
             - Spell out what to undo first when they solve for the variable, still without the result\n\
             - The student performs the step; you only point at it as precisely as needed\n\
             - Example: \"To solve for x, what operation would undo the addition on the left side, and what does the equation become?\"\n"
        ),
    }
}

/// Appends hint instructions to the base system prompt when the stuck
/// state calls for them; otherwise returns the base prompt untouched.
/// An explicit `hint_level` overrides the one derived from the counter.
pub fn build_prompt_with_hints(
    base_prompt: &str,
    is_stuck: bool,
    consecutive_confused: u32,
    hint_level: Option<u8>,
) -> String {
    if !is_stuck || consecutive_confused < STUCK_THRESHOLD {
        return base_prompt.to_string();
    }

    let level = hint_level.unwrap_or_else(|| calculate_hint_level(consecutive_confused));
    let instructions = hint_instructions(level, consecutive_confused);
    if instructions.is_empty() {
        return base_prompt.to_string();
    }

    format!("{base_prompt}\n{instructions}")
}
