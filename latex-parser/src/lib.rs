//! # latex-parser
//!
//! Splits tutor replies into text and math segments so the rendering
//! layer can hand math to a typesetter and leave prose alone.
//!
//! Recognized delimiters: `$...$` and `\(...\)` for inline math,
//! `$$...$$` and `\[...\]` for block math. `\$` is a literal dollar
//! sign. Unclosed delimiters degrade to plain text rather than
//! swallowing the rest of the message.

use regex::Regex;

/// What a segment holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Text,
    InlineMath,
    BlockMath,
}

/// One parsed run of the input. `raw` keeps the original delimited
/// substring for math segments; plain text has no `raw`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSegment {
    pub kind: SegmentKind,
    pub content: String,
    pub raw: Option<String>,
}

impl ParsedSegment {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            kind: SegmentKind::Text,
            content: content.into(),
            raw: None,
        }
    }

    pub fn inline_math(content: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            kind: SegmentKind::InlineMath,
            content: content.into(),
            raw: Some(raw.into()),
        }
    }

    pub fn block_math(content: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            kind: SegmentKind::BlockMath,
            content: content.into(),
            raw: Some(raw.into()),
        }
    }
}

/// Strips spacing commands the typesetter does not support.
///
/// OCR output likes to include `\hspace{1cm}` and friends, which make
/// KaTeX-style renderers error out on the whole expression.
pub fn clean_latex(latex: &str) -> String {
    use std::sync::LazyLock;
    static HSPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\\hspace\*?\{[^}]*\}").unwrap());
    static VSPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\\vspace\*?\{[^}]*\}").unwrap());
    static VSKIP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\\vskip\s*\S*").unwrap());
    static HSKIP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\\hskip\s*\S*").unwrap());
    static SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

    if latex.is_empty() {
        return latex.to_string();
    }

    let cleaned = HSPACE.replace_all(latex, " ");
    let cleaned = VSPACE.replace_all(&cleaned, "");
    let cleaned = VSKIP.replace_all(&cleaned, "");
    let cleaned = HSKIP.replace_all(&cleaned, " ");
    let cleaned = SPACES.replace_all(&cleaned, " ");
    cleaned.trim().to_string()
}

/// Single left-to-right scan producing an ordered segment list.
///
/// At each position the delimiters are tried in priority order:
/// `\[...\]`, `$$...$$`, `\(...\)`, then `$...$`. Empty input yields a
/// single empty text segment, never an empty vec.
pub fn parse_latex(text: &str) -> Vec<ParsedSegment> {
    if text.trim().is_empty() {
        return vec![ParsedSegment::text(text)];
    }

    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();
    let mut segments: Vec<ParsedSegment> = Vec::new();
    let mut current_text = String::new();
    let mut i = 0usize;

    while i < len {
        // Block math \[...\] wins over everything else.
        if i + 3 < len && chars[i] == '\\' && chars[i + 1] == '[' {
            match find_pair(&chars, '\\', ']', i + 2) {
                Some(close) => {
                    flush_text(&mut segments, &mut current_text);
                    let inner: String = chars[i + 2..close].iter().collect();
                    segments.push(ParsedSegment::block_math(
                        clean_latex(inner.trim()),
                        format!("\\[{inner}\\]"),
                    ));
                    i = close + 2;
                }
                None => {
                    // Unclosed; keep the backslash as text and move on.
                    current_text.push(chars[i]);
                    i += 1;
                }
            }
        }
        // Block math $$...$$
        else if i + 3 < len && chars[i] == '$' && chars[i + 1] == '$' {
            if i > 0 && chars[i - 1] == '\\' {
                // Escaped: drop the backslash already accumulated and
                // keep a literal dollar.
                current_text.pop();
                current_text.push(chars[i]);
                i += 1;
            } else {
                match find_pair(&chars, '$', '$', i + 2) {
                    Some(close) => {
                        flush_text(&mut segments, &mut current_text);
                        let inner: String = chars[i + 2..close].iter().collect();
                        segments.push(ParsedSegment::block_math(
                            clean_latex(inner.trim()),
                            format!("$${inner}$$"),
                        ));
                        i = close + 2;
                    }
                    None => {
                        merge_remaining(&mut segments, &mut current_text, &chars, i);
                        i = len;
                    }
                }
            }
        }
        // Inline math \(...\)
        else if i + 2 < len && chars[i] == '\\' && chars[i + 1] == '(' {
            match find_pair(&chars, '\\', ')', i + 2) {
                Some(close) => {
                    flush_text(&mut segments, &mut current_text);
                    let inner: String = chars[i + 2..close].iter().collect();
                    segments.push(ParsedSegment::inline_math(
                        clean_latex(inner.trim()),
                        format!("\\({inner}\\)"),
                    ));
                    i = close + 2;
                }
                None => {
                    current_text.push(chars[i]);
                    i += 1;
                }
            }
        }
        // Inline math $...$
        else if chars[i] == '$' {
            if i > 0 && chars[i - 1] == '\\' {
                current_text.pop();
                current_text.push(chars[i]);
                i += 1;
            } else {
                // Find a closing $ that is not itself the start of $$.
                let mut close = find_char(&chars, '$', i + 1);
                while let Some(c) = close {
                    if c + 1 < len && chars[c + 1] == '$' {
                        close = find_char(&chars, '$', c + 2);
                    } else {
                        break;
                    }
                }

                match close {
                    Some(close) => {
                        flush_text(&mut segments, &mut current_text);
                        let inner: String = chars[i + 1..close].iter().collect();
                        segments.push(ParsedSegment::inline_math(
                            clean_latex(inner.trim()),
                            format!("${inner}$"),
                        ));
                        i = close + 1;
                    }
                    None => {
                        merge_remaining(&mut segments, &mut current_text, &chars, i);
                        i = len;
                    }
                }
            }
        } else {
            current_text.push(chars[i]);
            i += 1;
        }
    }

    if !current_text.is_empty() {
        segments.push(ParsedSegment::text(current_text));
    }

    if segments.is_empty() {
        vec![ParsedSegment::text(text)]
    } else {
        segments
    }
}

/// True when `text` plausibly contains renderable math: an opening
/// delimiter with a matching closer, honoring the `\$` escape.
pub fn has_latex(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }

    if text.contains("\\[") || text.contains("$$") || text.contains("\\(") {
        return true;
    }

    let chars: Vec<char> = text.chars().collect();
    if let Some(idx) = chars.iter().position(|&c| c == '$') {
        if (idx == 0 || chars[idx - 1] != '\\') && chars[idx + 1..].contains(&'$') {
            return true;
        }
    }

    false
}

fn flush_text(segments: &mut Vec<ParsedSegment>, current_text: &mut String) {
    if !current_text.is_empty() {
        segments.push(ParsedSegment::text(std::mem::take(current_text)));
    }
}

/// Unclosed delimiter: everything from `from` to the end becomes plain
/// text, appended to the previous text segment when there is one.
fn merge_remaining(
    segments: &mut Vec<ParsedSegment>,
    current_text: &mut String,
    chars: &[char],
    from: usize,
) {
    let remaining: String = chars[from..].iter().collect();
    match segments.last_mut() {
        Some(last) if last.kind == SegmentKind::Text => last.content.push_str(&remaining),
        _ => current_text.push_str(&remaining),
    }
}

fn find_pair(chars: &[char], first: char, second: char, from: usize) -> Option<usize> {
    let mut i = from;
    while i + 1 < chars.len() {
        if chars[i] == first && chars[i + 1] == second {
            return Some(i);
        }
        i += 1;
    }
    None
}

fn find_char(chars: &[char], needle: char, from: usize) -> Option<usize> {
    chars[from.min(chars.len())..]
        .iter()
        .position(|&c| c == needle)
        .map(|p| p + from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_one_empty_text_segment() {
        assert_eq!(parse_latex(""), vec![ParsedSegment::text("")]);
    }

    #[test]
    fn plain_text_passes_through_whole() {
        assert_eq!(
            parse_latex("Plain text without math"),
            vec![ParsedSegment::text("Plain text without math")]
        );
    }

    #[test]
    fn inline_dollar_math_is_extracted() {
        assert_eq!(
            parse_latex("Solve for $x$"),
            vec![
                ParsedSegment::text("Solve for "),
                ParsedSegment::inline_math("x", "$x$"),
            ]
        );
    }

    #[test]
    fn block_dollar_math_is_extracted() {
        assert_eq!(
            parse_latex("Equation: $$x^2 + 5 = 0$$"),
            vec![
                ParsedSegment::text("Equation: "),
                ParsedSegment::block_math("x^2 + 5 = 0", "$$x^2 + 5 = 0$$"),
            ]
        );
    }

    #[test]
    fn multiple_inline_expressions_alternate_with_text() {
        assert_eq!(
            parse_latex("Find $x$ when $y = 5$ and $z = 10$"),
            vec![
                ParsedSegment::text("Find "),
                ParsedSegment::inline_math("x", "$x$"),
                ParsedSegment::text(" when "),
                ParsedSegment::inline_math("y = 5", "$y = 5$"),
                ParsedSegment::text(" and "),
                ParsedSegment::inline_math("z = 10", "$z = 10$"),
            ]
        );
    }

    #[test]
    fn escaped_dollar_is_literal_text() {
        assert_eq!(
            parse_latex("Price is \\$10"),
            vec![ParsedSegment::text("Price is $10")]
        );
    }

    #[test]
    fn unclosed_inline_math_degrades_to_text() {
        assert_eq!(
            parse_latex("Solve for $x"),
            vec![ParsedSegment::text("Solve for $x")]
        );
    }

    #[test]
    fn unclosed_block_math_degrades_to_text() {
        assert_eq!(
            parse_latex("Equation: $$x^2"),
            vec![ParsedSegment::text("Equation: $$x^2")]
        );
    }

    #[test]
    fn math_content_is_trimmed_but_raw_is_not() {
        assert_eq!(
            parse_latex("Solve for $  x  $"),
            vec![
                ParsedSegment::text("Solve for "),
                ParsedSegment::inline_math("x", "$  x  $"),
            ]
        );
    }

    #[test]
    fn math_at_string_boundaries() {
        assert_eq!(
            parse_latex("$x$ is a variable"),
            vec![
                ParsedSegment::inline_math("x", "$x$"),
                ParsedSegment::text(" is a variable"),
            ]
        );
        assert_eq!(
            parse_latex("Variable is $x$"),
            vec![
                ParsedSegment::text("Variable is "),
                ParsedSegment::inline_math("x", "$x$"),
            ]
        );
    }

    #[test]
    fn paren_inline_math_is_extracted() {
        assert_eq!(
            parse_latex("Solve for \\(x\\)"),
            vec![
                ParsedSegment::text("Solve for "),
                ParsedSegment::inline_math("x", "\\(x\\)"),
            ]
        );
    }

    #[test]
    fn bracket_block_math_is_extracted() {
        assert_eq!(
            parse_latex("Equation: \\[x^2 + 5 = 0\\]"),
            vec![
                ParsedSegment::text("Equation: "),
                ParsedSegment::block_math("x^2 + 5 = 0", "\\[x^2 + 5 = 0\\]"),
            ]
        );
    }

    #[test]
    fn paren_math_with_padding_trims_content_only() {
        assert_eq!(
            parse_latex("isolate the \\( x^2 \\) term?"),
            vec![
                ParsedSegment::text("isolate the "),
                ParsedSegment::inline_math("x^2", "\\( x^2 \\)"),
                ParsedSegment::text(" term?"),
            ]
        );
    }

    #[test]
    fn dollar_and_paren_forms_mix() {
        assert_eq!(
            parse_latex("Solve for $x$ in \\(x^2 + 5 = 0\\)"),
            vec![
                ParsedSegment::text("Solve for "),
                ParsedSegment::inline_math("x", "$x$"),
                ParsedSegment::text(" in "),
                ParsedSegment::inline_math("x^2 + 5 = 0", "\\(x^2 + 5 = 0\\)"),
            ]
        );
    }

    #[test]
    fn consecutive_block_expressions() {
        assert_eq!(
            parse_latex("$$x$$ and $$y$$"),
            vec![
                ParsedSegment::block_math("x", "$$x$$"),
                ParsedSegment::text(" and "),
                ParsedSegment::block_math("y", "$$y$$"),
            ]
        );
    }

    #[test]
    fn only_math_input() {
        assert_eq!(
            parse_latex("$x^2 + 5$"),
            vec![ParsedSegment::inline_math("x^2 + 5", "$x^2 + 5$")]
        );
        assert_eq!(
            parse_latex("$$\\frac{a}{b}$$"),
            vec![ParsedSegment::block_math("\\frac{a}{b}", "$$\\frac{a}{b}$$")]
        );
    }

    #[test]
    fn spacing_commands_are_cleaned_inside_math() {
        assert_eq!(
            parse_latex("Let $f(x) = \\frac{3}{4}x + 10, \\hspace{1cm} g(x) = x^2$"),
            vec![
                ParsedSegment::text("Let "),
                ParsedSegment::inline_math(
                    "f(x) = \\frac{3}{4}x + 10, g(x) = x^2",
                    "$f(x) = \\frac{3}{4}x + 10, \\hspace{1cm} g(x) = x^2$",
                ),
            ]
        );
    }

    #[test]
    fn clean_latex_strips_spacing_commands() {
        assert_eq!(
            clean_latex("f(x) = \\frac{3}{4}x + 10, \\hspace{1cm} g(x) = x^2"),
            "f(x) = \\frac{3}{4}x + 10, g(x) = x^2"
        );
        assert_eq!(
            clean_latex("f(x) = x^2 \\hspace*{0.5in} g(x) = x^3"),
            "f(x) = x^2 g(x) = x^3"
        );
        assert_eq!(
            clean_latex("f(x) = x^2 \\vspace{1cm} g(x) = x^3"),
            "f(x) = x^2 g(x) = x^3"
        );
        assert_eq!(
            clean_latex("f(x) = x^2 \\vskip 1cm g(x) = x^3"),
            "f(x) = x^2 g(x) = x^3"
        );
        assert_eq!(
            clean_latex("f(x) = x^2 \\hskip 1cm g(x) = x^3"),
            "f(x) = x^2 g(x) = x^3"
        );
        assert_eq!(clean_latex("a \\hspace{1cm}  \\hspace{1cm}  b"), "a b");
        assert_eq!(clean_latex(""), "");
        assert_eq!(
            clean_latex("f(x) = \\frac{3}{4}x + 10"),
            "f(x) = \\frac{3}{4}x + 10"
        );
    }

    #[test]
    fn has_latex_detects_each_delimiter_form() {
        assert!(!has_latex(""));
        assert!(!has_latex("Plain text without math"));
        assert!(has_latex("Solve for $x$"));
        assert!(has_latex("Equation: $$x^2$$"));
        assert!(has_latex("Solve for \\(x\\)"));
        assert!(has_latex("Equation: \\[x^2\\]"));
    }

    #[test]
    fn has_latex_respects_escapes_and_unclosed_dollars() {
        assert!(!has_latex("Price is \\$10"));
        assert!(!has_latex("Unclosed $x"));
    }
}
