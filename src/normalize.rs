//! Deterministic cleanup of extracted text before it is sent to the model.

/// Default cap on normalized text, in characters.
pub const DEFAULT_MAX_CHARS: usize = 12_000;

/// Trim surrounding whitespace, then keep at most `max_chars` characters.
///
/// Counts Unicode scalar values, not bytes. Interior text is left untouched.
pub fn normalize(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    match trimmed.char_indices().nth(max_chars) {
        Some((end, _)) => trimmed[..end].to_string(),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_only_trimmed() {
        assert_eq!(normalize("  Invoice  total 100 \n", 100), "Invoice  total 100");
    }

    #[test]
    fn test_interior_whitespace_preserved() {
        let text = "Line one\n\n\tLine  two";
        assert_eq!(normalize(text, 100), text);
    }

    #[test]
    fn test_truncates_by_chars() {
        assert_eq!(normalize("ABCDEFGHIJ", 4), "ABCD");
    }

    #[test]
    fn test_truncation_respects_multibyte() {
        let result = normalize("Olá, você está bem?", 10);
        assert_eq!(result, "Olá, você ");
        assert_eq!(result.chars().count(), 10);
    }

    #[test]
    fn test_trim_happens_before_truncation() {
        assert_eq!(normalize("     abcdef", 3), "abc");
    }

    #[test]
    fn test_empty_and_blank() {
        assert_eq!(normalize("", 10), "");
        assert_eq!(normalize(" \n\t ", 10), "");
        assert_eq!(normalize("text", 0), "");
    }

    #[test]
    fn test_length_bound_holds() {
        let samples = ["", "a", "  padded  ", "€€€€€€€€", "mixed ü ß 漢字 text", "x".repeat(50).as_str()]
            .map(String::from);
        for sample in &samples {
            for n in 0..20 {
                let out = normalize(sample, n);
                assert!(out.chars().count() <= n);
                if sample.trim().chars().count() <= n {
                    assert_eq!(out, sample.trim());
                }
            }
        }
    }
}
