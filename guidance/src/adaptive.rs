//! Adaptive questioning.
//!
//! Folds each graded student answer into an [`UnderstandingState`] and
//! renders the matching complexity instructions for the system prompt.
//! The level rules are ordered: confusion evidence wins over struggle
//! evidence, which wins over strength evidence, with `progressing` as
//! the default.

use chrono::Utc;
use tutor_core::{
    CorrectnessLevel, QuestionComplexity, StuckState, UnderstandingLevel, UnderstandingState,
};

/// Derives the next understanding state from one graded answer.
///
/// Counters are consecutive: each grade bumps its own counter and
/// zeroes the other two. The partial rule reads the previous incorrect
/// counter, and the correct-ratio rule divides by the previous total,
/// both before this answer is folded in.
pub fn determine_understanding(
    correctness: CorrectnessLevel,
    stuck: Option<&StuckState>,
    previous: Option<&UnderstandingState>,
) -> UnderstandingState {
    let prev = previous.cloned().unwrap_or_else(UnderstandingState::initial);

    let mut consecutive_correct = prev.consecutive_correct;
    let mut consecutive_incorrect = prev.consecutive_incorrect;
    let mut consecutive_partial = prev.consecutive_partial;

    match correctness {
        CorrectnessLevel::Correct => {
            consecutive_correct += 1;
            consecutive_incorrect = 0;
            consecutive_partial = 0;
        }
        CorrectnessLevel::Incorrect => {
            consecutive_correct = 0;
            consecutive_incorrect += 1;
            consecutive_partial = 0;
        }
        CorrectnessLevel::Partial => {
            consecutive_correct = 0;
            consecutive_incorrect = 0;
            consecutive_partial += 1;
        }
    }

    let is_stuck = stuck.is_some_and(|s| s.is_stuck);
    let stuck_confused = stuck.map_or(0, |s| s.consecutive_confused);

    let level = if (is_stuck && stuck_confused >= 2)
        || consecutive_incorrect >= 3
        || (consecutive_incorrect >= 2 && is_stuck)
    {
        UnderstandingLevel::Confused
    } else if consecutive_incorrect >= 2
        || (is_stuck && stuck_confused == 1)
        || (consecutive_partial >= 2 && prev.consecutive_incorrect > 0)
    {
        UnderstandingLevel::Struggling
    } else if consecutive_correct >= 2
        || (prev.total_responses > 3
            && consecutive_correct as f64 / prev.total_responses as f64 >= 0.8)
    {
        UnderstandingLevel::Strong
    } else {
        UnderstandingLevel::Progressing
    };

    UnderstandingState {
        level,
        consecutive_correct,
        consecutive_incorrect,
        consecutive_partial,
        total_responses: prev.total_responses + 1,
        last_updated: Utc::now().timestamp_millis(),
    }
}

/// System-prompt addendum telling the model how to pitch its next
/// question for the student's current level.
pub fn questioning_instructions(level: UnderstandingLevel) -> String {
    let base = format!(
        "\n**ADAPTIVE QUESTIONING INSTRUCTIONS (Student Understanding Level: {}):**\n\n\
         CRITICAL: Adjust question complexity based on student's understanding level. Maintain Socratic approach at all complexity levels.\n\
         - Questions must be QUESTIONS, not direct answers\n\
         - Questions guide student toward solution through discovery\n\
         - Complexity adjustments maintain logical sequence in problem-solving approach\n",
        level.as_str()
    );

    match level.complexity() {
        QuestionComplexity::Simplified => format!(
            "{base}\n\
             **Simplified Complexity (Student is Confused):**\n\
             - Break questions into smaller, simpler steps\n\
             - Use more guidance and scaffolding\n\
             - Use simpler language and familiar examples\n\
             - Check understanding frequently with yes/no or simple choice questions\n\
             - Provide more encouragement and reassurance\n\
             - Example: \"Let's start with something simpler. What do you see in this equation? Is there a number being added to x?\"\n\
             - Build confidence before progressing to harder questions\n\
             - NEVER give direct answers - still use questions, just simpler ones\n"
        ),
        QuestionComplexity::Scaffolded => format!(
            "{base}\n\
             **Scaffolded Complexity (Student is Struggling):**\n\
             - Provide scaffolding questions that guide through steps\n\
             - Break problems into manageable chunks\n\
             - Use guiding questions that check understanding at each step\n\
             - Provide hints within questions (e.g., \"What operation would help you isolate x? Think about what's happening to the x.\")\n\
             - Example: \"Let's work through this step by step. First, what number is being added to 2x? What operation would undo that addition?\"\n\
             - Offer more examples and analogies\n\
             - Maintain encouraging tone\n\
             - NEVER give direct answers - scaffold through questions\n"
        ),
        QuestionComplexity::Standard => format!(
            "{base}\n\
             **Standard Complexity (Student is Progressing):**\n\
             - Use normal progression with standard complexity\n\
             - Ask questions that guide toward solution\n\
             - Balance guidance with student independence\n\
             - Build questions progressively toward solution\n\
             - Maintain logical sequence (understand problem, isolate variable, solve)\n\
             - Example: \"What operation would you use to get x by itself? What's happening to the x in this equation?\"\n\
             - Standard Socratic questioning approach\n\
             - NEVER give direct answers - still use questions, just standard complexity\n"
        ),
        QuestionComplexity::Advanced => format!(
            "{base}\n\
             **Advanced Complexity (Student Shows Strong Understanding):**\n\
             - Increase question difficulty and depth\n\
             - Ask more challenging questions that require deeper thinking\n\
             - Reduce scaffolding - let student think more independently\n\
             - Ask questions that explore concepts more deeply\n\
             - Faster progression toward solution\n\
             - Example: \"How would you approach solving this equation? What properties of equality apply here?\"\n\
             - Challenge student to explain reasoning\n\
             - Skip simpler steps if student demonstrates understanding\n\
             - NEVER give direct answers - still use questions, just more challenging ones\n"
        ),
    }
}
