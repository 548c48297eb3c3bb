//! Splits a raw keyword field into distinct search tokens.

/// Separators accepted between keywords besides whitespace.
const SEPARATORS: [char; 2] = [',', '，'];

/// Splits `raw` on commas and whitespace into trimmed, non-empty tokens.
///
/// Duplicates are dropped and the order of first occurrence is kept. Blank
/// input yields an empty list, which callers treat as "no results".
pub fn parse_keywords(raw: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();

    for token in raw
        .split(|c: char| c.is_whitespace() || SEPARATORS.contains(&c))
        .map(str::trim)
        .filter(|t| !t.is_empty())
    {
        if !tokens.iter().any(|t| t == token) {
            tokens.push(token.to_string());
        }
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comma_and_space_separated() {
        assert_eq!(parse_keywords("台積電, 台積電  半導體"), ["台積電", "半導體"]);
    }

    #[test]
    fn test_preserves_first_occurrence_order() {
        assert_eq!(parse_keywords("b a,b c a"), ["b", "a", "c"]);
    }

    #[test]
    fn test_full_width_comma() {
        assert_eq!(parse_keywords("台灣，經濟"), ["台灣", "經濟"]);
    }

    #[test]
    fn test_blank_input_is_empty() {
        assert!(parse_keywords("").is_empty());
        assert!(parse_keywords("  , ,\t\n").is_empty());
    }

    #[test]
    fn test_no_empty_or_duplicate_tokens() {
        let tokens = parse_keywords(",,a,,a , b,\u{3000}b");
        assert_eq!(tokens, ["a", "b"]);
        assert!(tokens.iter().all(|t| !t.is_empty()));
    }
}
