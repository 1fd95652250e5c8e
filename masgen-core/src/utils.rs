//! Pure text helpers shared across crates.

/// Truncate text to a maximum character count, adding ellipsis if needed.
///
/// Uses Unicode-aware character counting to handle multi-byte characters
/// correctly. Trims whitespace from input and from truncated output before
/// adding the ellipsis.
///
/// # Examples
///
/// ```
/// use masgen_core::truncate;
///
/// assert_eq!(truncate("hello world", 8), "hello...");
/// assert_eq!(truncate("short", 10), "short");
/// ```
pub fn truncate(s: &str, max_chars: usize) -> String {
    let s = s.trim();
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", truncated.trim_end())
    }
}

/// Strip a surrounding Markdown code fence from model output.
///
/// Models frequently wrap structured output in ```` ```json ... ``` ````
/// fences even when asked not to. Returns the inner text; input without a
/// fence is returned trimmed and unchanged.
///
/// # Examples
///
/// ```
/// use masgen_core::strip_code_fences;
///
/// assert_eq!(strip_code_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
/// assert_eq!(strip_code_fences("{\"a\": 1}"), "{\"a\": 1}");
/// ```
pub fn strip_code_fences(s: &str) -> &str {
    let trimmed = s.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // First line after the opening fence is a language tag (possibly empty).
    let body = rest.split_once('\n').map(|(_, b)| b).unwrap_or(rest);
    body.rsplit_once("```")
        .map(|(b, _)| b)
        .unwrap_or(body)
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_string() {
        assert_eq!(truncate("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_exact_length() {
        assert_eq!(truncate("hello", 5), "hello");
    }

    #[test]
    fn test_truncate_long_string() {
        assert_eq!(truncate("hello world", 8), "hello...");
    }

    #[test]
    fn test_truncate_trims_whitespace() {
        assert_eq!(truncate("  hello  ", 10), "hello");
    }

    #[test]
    fn test_strip_fences_with_language_tag() {
        assert_eq!(strip_code_fences("```json\n{\"x\": 2}\n```"), "{\"x\": 2}");
    }

    #[test]
    fn test_strip_fences_without_language_tag() {
        assert_eq!(strip_code_fences("```\n[1, 2]\n```"), "[1, 2]");
    }

    #[test]
    fn test_strip_fences_unfenced_passthrough() {
        assert_eq!(strip_code_fences("  plain text  "), "plain text");
    }

    #[test]
    fn test_strip_fences_unterminated() {
        assert_eq!(strip_code_fences("```json\n{\"x\": 2}"), "{\"x\": 2}");
    }
}
