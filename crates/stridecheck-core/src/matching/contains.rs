//! Containment matching between agent output and reference item names.
//!
//! Three escalating strategies, first success wins:
//! 1. exact case-folded substring,
//! 2. normalized substring,
//! 3. keyword coverage over the normalized name.
//!
//! Keyword coverage tolerates reordering and inserted product-line words
//! ("NB 1080" matching "New Balance Fresh Foam 1080") but is refused for
//! single-token names, where it would be a bare substring test with a high
//! false-positive rate.

use super::normalize::normalize;

/// Does the output mention this item?
///
/// `output_lower` must already be lower-cased; item names are case-folded
/// here.
pub fn contains_item(output_lower: &str, item: &str) -> bool {
    if output_lower.contains(&item.to_lowercase()) {
        return true;
    }

    let normalized_item = normalize(item);
    let normalized_output = normalize(output_lower);

    if normalized_output.contains(&normalized_item) {
        return true;
    }

    let keywords: Vec<&str> = keyword_tokens(&normalized_item).collect();
    keywords.len() >= 2 && keywords.iter().all(|kw| normalized_output.contains(kw))
}

/// Byte offset of the first occurrence of this item in the output.
///
/// Same two-tier search as [`contains_item`], restricted to locating a
/// position: exact substring first, then the earliest first occurrence of
/// any normalized keyword. `None` when nothing is found.
pub fn locate_item(output_lower: &str, item: &str) -> Option<usize> {
    if let Some(idx) = output_lower.find(&item.to_lowercase()) {
        return Some(idx);
    }

    let normalized_item = normalize(item);
    keyword_tokens(&normalized_item)
        .filter_map(|kw| output_lower.find(kw))
        .min()
}

/// Whitespace tokens of a normalized name that are long enough to carry
/// signal (more than one character).
fn keyword_tokens(normalized: &str) -> impl Iterator<Item = &str> {
    normalized
        .split_whitespace()
        .filter(|token| token.chars().count() > 1)
}
