//! Negative-context classification around an item mention.
//!
//! A forbidden item mentioned as a warning ("avoid X because...") must not
//! score as a violation. The classifier is a window-based lexical lookup: a
//! cheap, explainable proxy for negation scope, not a semantic parse.
//! Dissuasion phrases outside the window are missed, and phrases inside an
//! unrelated adjacent clause are false positives; when two items are
//! discussed within one window the heuristic can misfire. Accepted
//! tradeoffs.

use super::contains::locate_item;
use super::lexicon::Lexicon;

/// Window radius in characters on each side of the located mention.
pub const CONTEXT_RADIUS: usize = 100;

/// Is the item mentioned in a dissuading context?
///
/// Locates the first occurrence of the item (exact, then normalized
/// keywords); returns false when no occurrence is found. Otherwise checks
/// the surrounding [`CONTEXT_RADIUS`]-character window for any negative
/// lexicon phrase.
pub fn is_negative_context(output: &str, item: &str, lexicon: &Lexicon) -> bool {
    let output_lower = output.to_lowercase();

    let Some(offset) = locate_item(&output_lower, item) else {
        return false;
    };

    let window = char_window(&output_lower, offset, CONTEXT_RADIUS);
    lexicon.contains_negative(window)
}

/// Slice a window of `radius` characters before and after a byte offset,
/// clamped to the string bounds.
///
/// The window is measured in characters, not bytes: the output routinely
/// mixes CJK text with ASCII, and byte slicing would both skew the radius
/// and risk splitting a code point.
fn char_window(text: &str, offset: usize, radius: usize) -> &str {
    let start = text[..offset]
        .char_indices()
        .rev()
        .nth(radius.saturating_sub(1))
        .map(|(idx, _)| idx)
        .unwrap_or(0);

    let end = text[offset..]
        .char_indices()
        .nth(radius)
        .map(|(idx, _)| offset + idx)
        .unwrap_or(text.len());

    &text[start..end]
}
