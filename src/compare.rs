//! Title matching heuristic
//!
//! Upstream catalogs drift on punctuation and casing ("Spider-Man: No Way
//! Home" vs "spider man no way home"), so search-result titles are compared
//! on a normalized form rather than byte equality.

/// Lowercase, strip everything but letters and digits, collapse runs of
/// whitespace to single spaces.
#[must_use]
pub fn normalize_title(title: &str) -> String {
    let cleaned: String = title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Fuzzy title equality: true when both titles normalize to the same string.
#[must_use]
pub fn titles_match(a: &str, b: &str) -> bool {
    normalize_title(a) == normalize_title(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_punctuation_and_case() {
        assert_eq!(
            normalize_title("Spider-Man: No Way Home"),
            "spider man no way home"
        );
        assert_eq!(normalize_title("  Dune   (Part Two) "), "dune part two");
    }

    #[test]
    fn matching_is_symmetric_and_fuzzy() {
        assert!(titles_match("The Matrix", "the matrix"));
        assert!(titles_match("WALL-E", "wall e"));
        assert!(!titles_match("The Matrix", "The Matrix Reloaded"));
    }
}
