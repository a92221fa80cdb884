/// Lowercased form of a title search, or `None` when it is blank.
///
/// Blank means empty or whitespace-only; anything else is kept as typed.
pub fn fold_needle(needle: &str) -> Option<String> {
    if needle.trim().is_empty() {
        None
    } else {
        Some(needle.to_lowercase())
    }
}

/// Substring test against a needle already produced by [`fold_needle`].
pub fn contains_folded(haystack: &str, folded_needle: &str) -> bool {
    haystack.to_lowercase().contains(folded_needle)
}
