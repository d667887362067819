//! Confusion and stuck detection.
//!
//! A student is stuck after two consecutive confused turns. Confusion
//! itself is judged by an injectable classifier; the default
//! [`LexiconClassifier`] combines keyword matching, a short-answer
//! check, repeated-question similarity, and a vague-rambling check.

use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use tutor_core::{Message, MessageRole, StuckState};

/// Consecutive confused turns before the student counts as stuck.
pub const STUCK_THRESHOLD: u32 = 2;

/// Highest hint escalation level.
pub const MAX_HINT_LEVEL: u8 = 3;

/// Responses shorter than this are suspect unless they contain math.
const MIN_MEANINGFUL_LENGTH: usize = 10;

/// Responses longer than this plus vague wording suggest rambling
/// confusion.
const MAX_VAGUE_LENGTH: usize = 200;

static CONFUSION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\b(i don't know|i dont know|idk)\b",
        r"\b(i'm stuck|im stuck|stuck)\b",
        r"\b(i'm confused|im confused|confused)\b",
        r"\b(i don't understand|i dont understand)\b",
        r"\b(i don't get it|i dont get it)\b",
        r"\b(what\?|huh\?|i don't see|i dont see)\b",
        r"\b(i have no idea|no idea|no clue)\b",
        r"\b(can't figure|cannot figure|can't solve|cannot solve)\b",
        r"\b(help me|i need help|don't know how|dont know how)\b",
        r"\b(not sure|unsure|struggling|having trouble)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static VAGUE_CONFUSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(not sure|unsure|confusing|frustrated|struggling|having trouble)\b").unwrap()
});

static MATH_CONTENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\d+\-*/(=)]").unwrap());

/// Decides whether a single student turn reads as confused.
///
/// The keyword lexicon is not canonical, so the whole judgement is
/// behind a trait and can be swapped without touching the state
/// machine.
pub trait ConfusionClassifier: Send + Sync {
    fn is_confused(&self, response: &str, history: &[Message]) -> bool;
}

/// Default heuristic classifier.
#[derive(Debug, Default)]
pub struct LexiconClassifier;

impl ConfusionClassifier for LexiconClassifier {
    fn is_confused(&self, response: &str, history: &[Message]) -> bool {
        let normalized = response.trim().to_lowercase();

        if normalized.is_empty() {
            return true;
        }

        // Explicit confusion wording takes precedence.
        if CONFUSION_PATTERNS.iter().any(|p| p.is_match(&normalized)) {
            return true;
        }

        // Very short answers are suspect, but "x = 4" is a perfectly
        // clear short answer.
        if normalized.chars().count() < MIN_MEANINGFUL_LENGTH {
            return !contains_math_content(&normalized);
        }

        // Repeating the same question suggests the previous reply did
        // not land.
        let recent: Vec<String> = history
            .iter()
            .filter(|m| m.role == MessageRole::Student)
            .map(|m| m.content.trim().to_lowercase())
            .collect();
        let recent = &recent[recent.len().saturating_sub(3)..];
        let repeated = recent.iter().any(|prev| {
            similarity(&normalized, prev) > 0.8 && prev.chars().count() > MIN_MEANINGFUL_LENGTH
        });
        if repeated {
            return true;
        }

        // Long rambling answers with vague wording and no math.
        if normalized.chars().count() > MAX_VAGUE_LENGTH
            && VAGUE_CONFUSION.is_match(&normalized)
            && !contains_math_content(&normalized)
        {
            return true;
        }

        false
    }
}

/// Jaccard similarity over words longer than two characters.
fn similarity(a: &str, b: &str) -> f64 {
    let words_a: HashSet<&str> = a
        .split_whitespace()
        .filter(|w| w.chars().count() > 2)
        .collect();
    let words_b: HashSet<&str> = b
        .split_whitespace()
        .filter(|w| w.chars().count() > 2)
        .collect();

    if words_a.is_empty() && words_b.is_empty() {
        return 1.0;
    }
    if words_a.is_empty() || words_b.is_empty() {
        return 0.0;
    }

    let intersection = words_a.intersection(&words_b).count();
    let union = words_a.union(&words_b).count();
    intersection as f64 / union as f64
}

fn contains_math_content(response: &str) -> bool {
    MATH_CONTENT.is_match(response)
}

/// Hint escalation from the consecutive-confused counter: 0 below the
/// stuck threshold, then 1 for 2-3 turns, 2 for 4-5, 3 for 6 and up.
pub fn calculate_hint_level(consecutive_confused: u32) -> u8 {
    if consecutive_confused < 2 {
        0
    } else if consecutive_confused <= 3 {
        1
    } else if consecutive_confused <= 5 {
        2
    } else {
        MAX_HINT_LEVEL
    }
}

/// Stuck state machine over a conversation.
pub struct StuckDetector {
    classifier: Arc<dyn ConfusionClassifier>,
}

impl StuckDetector {
    pub fn new() -> Self {
        Self {
            classifier: Arc::new(LexiconClassifier),
        }
    }

    pub fn with_classifier(classifier: Arc<dyn ConfusionClassifier>) -> Self {
        Self { classifier }
    }

    /// Advances the stuck state for one new student turn.
    ///
    /// A confused turn bumps the counter and records its would-be
    /// history index; a clear turn resets the counter but keeps
    /// `last_confused_index` as a marker of where trouble last was.
    pub fn track(&self, response: &str, history: &[Message], prev: &StuckState) -> StuckState {
        if self.classifier.is_confused(response, history) {
            let consecutive = prev.consecutive_confused + 1;
            StuckState {
                consecutive_confused: consecutive,
                is_stuck: consecutive >= STUCK_THRESHOLD,
                last_confused_index: Some(history.len()),
            }
        } else {
            StuckState {
                consecutive_confused: 0,
                is_stuck: false,
                last_confused_index: prev.last_confused_index,
            }
        }
    }

    /// Rebuilds the stuck state by folding over the history, newest
    /// first, stopping at the first clear student turn. Used when a
    /// request arrives with history but no usable client state.
    pub fn analyze_history(&self, history: &[Message]) -> StuckState {
        let mut consecutive_confused = 0u32;
        let mut last_confused_index = None;

        for i in (0..history.len()).rev() {
            let message = &history[i];
            if message.role == MessageRole::Student {
                if self.classifier.is_confused(&message.content, &history[..i]) {
                    consecutive_confused += 1;
                    if last_confused_index.is_none() {
                        last_confused_index = Some(i);
                    }
                } else {
                    break;
                }
            }
        }

        StuckState {
            consecutive_confused,
            is_stuck: consecutive_confused >= STUCK_THRESHOLD,
            last_confused_index,
        }
    }
}

impl Default for StuckDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> StuckDetector {
        StuckDetector::new()
    }

    fn confused(response: &str) -> bool {
        LexiconClassifier.is_confused(response, &[])
    }

    #[test]
    fn empty_and_whitespace_responses_are_confused() {
        assert!(confused(""));
        assert!(confused("   "));
    }

    #[test]
    fn explicit_confusion_phrases_are_detected() {
        assert!(confused("I don't know"));
        assert!(confused("idk"));
        assert!(confused("I'm stuck on this one"));
        assert!(confused("this is confusing, I'm confused"));
        assert!(confused("I have no idea where to start"));
        assert!(confused("can't figure this out"));
        assert!(confused("help me please"));
        assert!(confused("I'm not sure about this at all"));
    }

    #[test]
    fn short_answers_with_math_are_clear() {
        assert!(!confused("x = 4"));
        assert!(!confused("12"));
        assert!(!confused("2x+5"));
    }

    #[test]
    fn short_answers_without_math_are_confused() {
        assert!(confused("ok"));
        assert!(confused("hmm"));
    }

    #[test]
    fn ordinary_working_answers_are_clear() {
        assert!(!confused("I would subtract five from both sides first"));
        assert!(!confused("The variable needs to be isolated on the left"));
    }

    #[test]
    fn repeating_the_same_question_is_confused() {
        let history = vec![
            Message::student("how do I solve this equation thing"),
            Message::tutor("What operation could you apply to both sides?"),
        ];
        assert!(LexiconClassifier.is_confused("how do I solve this equation thing", &history));
    }

    #[test]
    fn track_increments_and_flags_stuck_at_threshold() {
        let d = detector();
        let s1 = d.track("I don't know", &[], &StuckState::reset());
        assert_eq!(s1.consecutive_confused, 1);
        assert!(!s1.is_stuck);
        assert_eq!(s1.last_confused_index, Some(0));

        let history = vec![Message::student("I don't know"), Message::tutor("Try this")];
        let s2 = d.track("still no idea", &history, &s1);
        assert_eq!(s2.consecutive_confused, 2);
        assert!(s2.is_stuck);
        assert_eq!(s2.last_confused_index, Some(2));
    }

    #[test]
    fn track_resets_on_clear_turn_but_keeps_last_index() {
        let d = detector();
        let prev = StuckState {
            consecutive_confused: 3,
            is_stuck: true,
            last_confused_index: Some(5),
        };
        let next = d.track("I would divide both sides by two", &[], &prev);
        assert_eq!(next.consecutive_confused, 0);
        assert!(!next.is_stuck);
        assert_eq!(next.last_confused_index, Some(5));
    }

    #[test]
    fn analyze_history_counts_trailing_confused_student_turns() {
        let d = detector();
        let history = vec![
            Message::student("I want to solve 2x + 5 = 13"),
            Message::tutor("What would you do first?"),
            Message::student("I don't know"),
            Message::tutor("Think about the + 5"),
            Message::student("no idea"),
        ];
        let state = d.analyze_history(&history);
        assert_eq!(state.consecutive_confused, 2);
        assert!(state.is_stuck);
        assert_eq!(state.last_confused_index, Some(4));
    }

    #[test]
    fn analyze_history_stops_at_first_clear_student_turn() {
        let d = detector();
        let history = vec![
            Message::student("I'm stuck"),
            Message::tutor("Hint one"),
            Message::student("subtract 5 from both sides"),
            Message::tutor("Good, then?"),
            Message::student("I'm confused now"),
        ];
        let state = d.analyze_history(&history);
        assert_eq!(state.consecutive_confused, 1);
        assert!(!state.is_stuck);
        assert_eq!(state.last_confused_index, Some(4));
    }

    #[test]
    fn analyze_history_of_empty_conversation_is_zero_state() {
        assert_eq!(detector().analyze_history(&[]), StuckState::reset());
    }

    #[test]
    fn hint_level_boundaries() {
        assert_eq!(calculate_hint_level(0), 0);
        assert_eq!(calculate_hint_level(1), 0);
        assert_eq!(calculate_hint_level(2), 1);
        assert_eq!(calculate_hint_level(3), 1);
        assert_eq!(calculate_hint_level(4), 2);
        assert_eq!(calculate_hint_level(5), 2);
        assert_eq!(calculate_hint_level(6), 3);
        assert_eq!(calculate_hint_level(10), 3);
    }
}
