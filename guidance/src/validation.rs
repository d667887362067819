//! Lightweight grading of student answers.
//!
//! Syntax-checks anything that looks like algebra and grades it
//! `incorrect` when malformed. Everything else defaults to `partial`;
//! semantic grading is the model's job, this only feeds the
//! understanding-level counters and never blocks a request.

use std::sync::LazyLock;

use regex::Regex;
use tutor_core::CorrectnessLevel;

static VALID_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9+\-*/^().\s]+$").unwrap());
static CONSECUTIVE_OPS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[+\-*/^]{2,}").unwrap());
static NEGATIVE_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-\d+").unwrap());
static NEGATIVE_PAREN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(-[^)]+\)").unwrap());
static MATH_CONTENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z0-9+\-*/^=()]").unwrap());

/// Outcome of grading one student answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseAssessment {
    pub correctness: CorrectnessLevel,
    pub is_valid_expression: bool,
    pub expression_error: Option<String>,
}

/// Validates algebraic notation: an equation (`left = right`) or a bare
/// expression. Errors are student-readable sentences.
pub fn validate_expression(expression: &str) -> Result<(), String> {
    let trimmed = expression.trim();

    if trimmed.is_empty() {
        return Err("Expression cannot be empty".to_string());
    }

    if trimmed.contains('=') {
        let parts: Vec<&str> = trimmed.split('=').collect();
        if parts.len() != 2 {
            return Err("Equation must have exactly one equals sign".to_string());
        }

        let left = parts[0].trim();
        let right = parts[1].trim();
        if left.is_empty() || right.is_empty() {
            return Err("Both sides of equation must have content".to_string());
        }

        validate_syntax(left).map_err(|e| format!("Left side of equation: {e}"))?;
        validate_syntax(right).map_err(|e| format!("Right side of equation: {e}"))?;
    } else {
        validate_syntax(trimmed)?;
    }

    Ok(())
}

fn validate_syntax(expression: &str) -> Result<(), String> {
    let mut open_count = 0i32;
    for c in expression.chars() {
        match c {
            '(' => open_count += 1,
            ')' => {
                open_count -= 1;
                if open_count < 0 {
                    return Err("Unbalanced parentheses".to_string());
                }
            }
            _ => {}
        }
    }
    if open_count != 0 {
        return Err("Unbalanced parentheses".to_string());
    }

    if !VALID_CHARS.is_match(expression) {
        return Err("Expression contains invalid characters".to_string());
    }

    // Consecutive operators are bad, but "3 * -5" and "(-5)" are
    // legitimate negative numbers and get stripped before re-checking.
    let squeezed = squeeze(expression);
    if CONSECUTIVE_OPS.is_match(&squeezed) {
        let cleaned = NEGATIVE_NUMBER.replace_all(expression, "");
        let cleaned = NEGATIVE_PAREN.replace_all(&cleaned, "");
        if CONSECUTIVE_OPS.is_match(&squeeze(&cleaned)) {
            return Err("Expression contains consecutive operators".to_string());
        }
    }

    let trimmed = expression.trim();
    let starts_with_operator = trimmed.starts_with(['+', '-', '*', '/', '^']);
    let negative_number_start = {
        let mut it = trimmed.chars();
        it.next() == Some('-') && it.next().is_some_and(|c| c.is_ascii_digit())
    };
    if starts_with_operator && !negative_number_start {
        return Err("Expression cannot start with an operator".to_string());
    }
    if trimmed.ends_with(['+', '-', '*', '/', '^']) {
        return Err("Expression cannot end with an operator".to_string());
    }

    Ok(())
}

fn squeeze(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Grades a student answer. Malformed algebra is `incorrect`;
/// everything else is `partial` and left to the model to refine.
pub fn assess_response(response: &str) -> ResponseAssessment {
    if MATH_CONTENT.is_match(response) {
        if let Err(error) = validate_expression(response) {
            return ResponseAssessment {
                correctness: CorrectnessLevel::Incorrect,
                is_valid_expression: false,
                expression_error: Some(error),
            };
        }
    }

    ResponseAssessment {
        correctness: CorrectnessLevel::Partial,
        is_valid_expression: true,
        expression_error: None,
    }
}

/// Wording that suggests the student is part-way there.
pub fn indicates_partial_progress(response: &str) -> bool {
    static PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
        [
            r"(?i)partially",
            r"(?i)getting there",
            r"(?i)think",
            r"(?i)try",
            r"(?i)maybe",
            r"(?i)almost",
            r"(?i)close",
        ]
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect()
    });
    PATTERNS.iter().any(|p| p.is_match(response))
}

/// Wording that suggests the student has the right idea.
pub fn indicates_correct_understanding(response: &str) -> bool {
    static PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
        [r"(?i)correct", r"(?i)right", r"(?i)yes", r"(?i)equals", r"="]
            .iter()
            .map(|p| Regex::new(p).unwrap())
            .collect()
    });
    PATTERNS.iter().any(|p| p.is_match(response))
}
