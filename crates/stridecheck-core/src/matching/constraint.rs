//! Item-name extraction from hard-constraint strings.
//!
//! A `must_not` entry may bundle several forbidden items with a trailing
//! annotation: `"Nike Vaporfly/Alphafly(不适合大体重)"` names two items and
//! one note to discard.

/// Split a constraint string into its independent item names.
///
/// The text from the first `(` onward is dropped, the remainder is split on
/// `/`, and empty fragments are discarded. Order of appearance is preserved.
pub fn extract_item_names(constraint: &str) -> Vec<String> {
    let without_note = constraint.split('(').next().unwrap_or("");

    without_note
        .split('/')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
