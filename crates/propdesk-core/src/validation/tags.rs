//! Tag string parsing

/// Parse a comma-separated tag string into an ordered, duplicate-free list.
///
/// Tokens are trimmed and empty tokens dropped; the first occurrence of a
/// repeated tag keeps its position. `"a, b ,,c"` yields `["a", "b", "c"]`.
pub fn parse_tags(input: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for token in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !tags.iter().any(|existing| existing == token) {
            tags.push(token.to_string());
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_drops_empty_tokens() {
        assert_eq!(parse_tags("a, b ,,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn blank_input_yields_no_tags() {
        assert!(parse_tags("").is_empty());
        assert!(parse_tags("   ").is_empty());
        assert!(parse_tags(" , ,, ").is_empty());
    }

    #[test]
    fn duplicates_keep_first_position() {
        assert_eq!(parse_tags("roof, leak, roof ,gutter"), vec!["roof", "leak", "gutter"]);
    }

    #[test]
    fn inner_whitespace_is_preserved() {
        assert_eq!(parse_tags("unit 4b, main hall"), vec!["unit 4b", "main hall"]);
    }
}
