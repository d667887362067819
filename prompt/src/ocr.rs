/// Instruction sent alongside a photographed problem. Points 7 and 8
/// exist because vision models like to wrap their output in markdown
/// code fences, which then have to be stripped again.
pub const OCR_PROMPT: &str = r#"Extract the text from this image. This is a math problem, so please:
1. Extract all text exactly as it appears
2. Preserve mathematical notation (operators, symbols, equations)
3. Keep equations on single lines - do not break equations across multiple lines
4. If an equation appears on multiple lines visually, join it into a single line (e.g., "2x = 6" not "2\nx\n=\n6")
5. If the image contains math equations, extract them as LaTeX where possible
6. Maintain structure between different problems/questions (use line breaks between problems, not within equations)
7. Return only the extracted text as plain text - do NOT use markdown formatting, code blocks, or triple backticks
8. Do not include any markdown code fences or formatting symbols"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_bans_code_fences() {
        assert!(OCR_PROMPT.contains("do NOT use markdown formatting"));
        assert!(OCR_PROMPT.contains("triple backticks"));
    }
}
