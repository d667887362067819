use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Rolling confusion tracker, threaded through chat requests and
/// responses so the client never recomputes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StuckState {
    /// Confused student turns in a row.
    pub consecutive_confused: u32,
    /// Set once two consecutive turns look confused.
    pub is_stuck: bool,
    /// History index of the most recent confused student turn.
    pub last_confused_index: Option<usize>,
}

impl StuckState {
    pub fn reset() -> Self {
        Self {
            consecutive_confused: 0,
            is_stuck: false,
            last_confused_index: None,
        }
    }
}

impl Default for StuckState {
    fn default() -> Self {
        Self::reset()
    }
}

/// Per-conversation tally of how the student has been answering,
/// used to pick the next question's complexity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnderstandingState {
    pub level: UnderstandingLevel,
    pub consecutive_correct: u32,
    pub consecutive_incorrect: u32,
    pub consecutive_partial: u32,
    pub total_responses: u32,
    /// Unix epoch millis of the last update.
    pub last_updated: i64,
}

impl UnderstandingState {
    /// Fresh conversations start at `progressing` with zeroed counters.
    pub fn initial() -> Self {
        Self {
            level: UnderstandingLevel::Progressing,
            consecutive_correct: 0,
            consecutive_incorrect: 0,
            consecutive_partial: 0,
            total_responses: 0,
            last_updated: Utc::now().timestamp_millis(),
        }
    }
}

impl Default for UnderstandingState {
    fn default() -> Self {
        Self::initial()
    }
}

/// How well the student is tracking, coarsest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnderstandingLevel {
    Confused,
    Struggling,
    Progressing,
    Strong,
}

impl UnderstandingLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnderstandingLevel::Confused => "confused",
            UnderstandingLevel::Struggling => "struggling",
            UnderstandingLevel::Progressing => "progressing",
            UnderstandingLevel::Strong => "strong",
        }
    }

    /// Question complexity paired with each level.
    pub fn complexity(self) -> QuestionComplexity {
        match self {
            UnderstandingLevel::Confused => QuestionComplexity::Simplified,
            UnderstandingLevel::Struggling => QuestionComplexity::Scaffolded,
            UnderstandingLevel::Progressing => QuestionComplexity::Standard,
            UnderstandingLevel::Strong => QuestionComplexity::Advanced,
        }
    }
}

/// How the next tutor question should be pitched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionComplexity {
    Simplified,
    Scaffolded,
    Standard,
    Advanced,
}

/// Heuristic verdict on a single student answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrectnessLevel {
    Correct,
    Incorrect,
    Partial,
}

/// Whether a stored session's problem got solved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionStatus {
    Solved,
    NotSolved,
    #[default]
    InProgress,
}

impl CompletionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompletionStatus::Solved => "solved",
            CompletionStatus::NotSolved => "not_solved",
            CompletionStatus::InProgress => "in_progress",
        }
    }
}

impl std::str::FromStr for CompletionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "solved" => Ok(CompletionStatus::Solved),
            "not_solved" => Ok(CompletionStatus::NotSolved),
            "in_progress" => Ok(CompletionStatus::InProgress),
            other => Err(format!("unknown completion status: {other}")),
        }
    }
}
