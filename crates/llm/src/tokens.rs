//! Approximate token accounting
//!
//! The provider's exact encoding is not available locally, so one token is
//! counted per four characters (rounded up).

/// Approximate characters per token
pub const CHARS_PER_TOKEN: usize = 4;

/// Appended whenever text is cut to fit the budget
pub const TRUNCATION_MARKER: &str = "\n\n[...text truncated to fit the model context window]";

/// Count tokens in text (0 for empty text, at least 1 otherwise)
pub fn count_tokens(text: &str) -> usize {
    let chars = text.chars().count();
    (chars + CHARS_PER_TOKEN - 1) / CHARS_PER_TOKEN
}

/// Cut text to at most `max_tokens` tokens and append [`TRUNCATION_MARKER`]
///
/// Text that already fits is returned unchanged.
pub fn truncate(text: &str, max_tokens: usize) -> String {
    if count_tokens(text) <= max_tokens {
        return text.to_string();
    }

    let max_chars = max_tokens * CHARS_PER_TOKEN;
    let ideal_end = text
        .char_indices()
        .nth(max_chars)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len());

    let end = find_break_point(text, ideal_end);
    let mut truncated = text[..end].trim_end().to_string();
    truncated.push_str(TRUNCATION_MARKER);
    truncated
}

/// Find a good breaking point (sentence or word boundary) near `ideal_end`
fn find_break_point(text: &str, ideal_end: usize) -> usize {
    // Look for a boundary within the last 20% of the prefix
    let mut search_start = ideal_end * 80 / 100;
    while !text.is_char_boundary(search_start) {
        search_start -= 1;
    }
    let search_text = &text[search_start..ideal_end];

    let sentence_endings = [". ", ".\n", "! ", "!\n", "? ", "?\n", "。", "！", "？"];
    let best_sentence = sentence_endings
        .iter()
        .filter_map(|ending| search_text.rfind(ending).map(|idx| idx + ending.len()))
        .max();

    if let Some(pos) = best_sentence {
        return search_start + pos;
    }

    search_text
        .rfind(char::is_whitespace)
        .map(|idx| search_start + idx)
        .unwrap_or(ideal_end)
}

/// Immutable context-window budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenBudget {
    /// Model context window in tokens
    pub context_limit: usize,
}

impl TokenBudget {
    pub fn new(context_limit: usize) -> Self {
        Self { context_limit }
    }

    /// Tokens available for the payload once instructions and the response are accounted for
    pub fn payload_budget(&self, instructions: &str, reserved_response_tokens: usize) -> usize {
        self.context_limit
            .saturating_sub(reserved_response_tokens)
            .saturating_sub(count_tokens(instructions))
    }

    /// Tokens a prompt may use
    pub fn prompt_limit(&self, reserved_response_tokens: usize) -> usize {
        self.context_limit.saturating_sub(reserved_response_tokens)
    }
}

impl Default for TokenBudget {
    fn default() -> Self {
        Self::new(8192)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_tokens() {
        assert_eq!(count_tokens(""), 0);
        assert_eq!(count_tokens("a"), 1);
        assert_eq!(count_tokens("abcd"), 1);
        assert_eq!(count_tokens("abcde"), 2);
        // Counted in chars, not bytes
        assert_eq!(count_tokens("ひらがな"), 1);
    }

    #[test]
    fn test_truncate_short_text_unchanged() {
        let text = "This is a short text.";
        assert_eq!(truncate(text, 100), text);
        assert_eq!(truncate("", 0), "");
    }

    #[test]
    fn test_truncate_long_text() {
        let text = "First sentence. Second sentence. Third sentence. Fourth sentence. Fifth sentence.";
        let out = truncate(text, 10);

        assert!(out.ends_with(TRUNCATION_MARKER));
        assert!(count_tokens(&out) <= 10 + count_tokens(TRUNCATION_MARKER));
        assert!(out.starts_with("First sentence."));
    }

    #[test]
    fn test_truncate_prefers_sentence_boundary() {
        let text = "Alpha beta gamma. Delta epsilon zeta eta theta iota kappa lambda";
        let out = truncate(text, 5);
        assert_eq!(out, format!("Alpha beta gamma.{}", TRUNCATION_MARKER));
    }

    #[test]
    fn test_truncate_multibyte_text() {
        let text = "日本語の文章です。".repeat(50);
        let out = truncate(&text, 20);
        assert!(out.ends_with(TRUNCATION_MARKER));
        assert!(count_tokens(&out) <= 20 + count_tokens(TRUNCATION_MARKER));
    }

    #[test]
    fn test_truncate_without_boundaries() {
        let text = "x".repeat(100);
        let out = truncate(&text, 5);
        assert_eq!(out, format!("{}{}", "x".repeat(20), TRUNCATION_MARKER));
    }

    #[test]
    fn test_payload_budget() {
        let budget = TokenBudget::new(1000);
        assert_eq!(budget.payload_budget("abcd", 500), 499);
        assert_eq!(budget.payload_budget("abcd", 2000), 0);
        assert_eq!(budget.prompt_limit(500), 500);
    }
}
