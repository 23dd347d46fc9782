//! Product-name normalization for fuzzy matching.
//!
//! Reference names and agent output disagree on version numbering, width
//! codes, and brand abbreviations ("NB 1080v14 2E" vs "New Balance Fresh
//! Foam 1080"). Normalization strips the volatile parts so that containment
//! checks compare stable cores.
//!
//! The numeric-suffix rules are deliberately narrow: only a 1-2 digit token
//! anchored at the end of the string is treated as a model generation, so
//! meaningful embedded numbers ("1080", "9060") survive.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Parenthesized annotations, e.g. width or sizing notes.
    static ref PAREN_PATTERN: Regex = Regex::new(r"\([^)]*\)").unwrap();

    /// Version tokens: "v14", "v2.0", with or without a preceding space.
    static ref VERSION_PATTERN: Regex = Regex::new(r"(?i)v\d{1,2}(\.\d+)?").unwrap();

    /// Bare 1-2 digit model-generation suffix: "Peregrine 14" -> "Peregrine".
    static ref TRAILING_MODEL_PATTERN: Regex = Regex::new(r"\s+\d{1,2}(\.\d+)?$").unwrap();

    /// Width/last qualifiers.
    static ref WIDTH_PATTERN: Regex = Regex::new(r"(?i)\s*(2e|4e|wide)").unwrap();
}

/// Brand-alias substitutions applied to the normalized prefix.
///
/// First matching alias wins. Self-mapping entries are allowed for brands
/// that need no rewriting.
const BRAND_ALIASES: &[(&str, &str)] = &[
    ("nb", "new balance"),
    ("asics", "asics"),
    ("hoka one one", "hoka"),
];

/// Normalize a product name for fuzzy matching.
///
/// Pure, total, and idempotent: `normalize(normalize(x)) == normalize(x)`.
///
/// A single rewriting pass is not a fixpoint for every input (stripping a
/// width qualifier can uncover a fresh trailing model number), so the pass
/// is iterated until the string stabilizes.
pub fn normalize(name: &str) -> String {
    // Every unstable pass removes at least one token (alias substitution
    // cannot re-trigger itself), so the pass count is bounded by the
    // input length.
    let max_passes = name.chars().count().max(4);

    let mut current = normalize_once(name);
    for _ in 0..max_passes {
        let next = normalize_once(&current);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

/// One rewriting pass: the ordered step list from the matching contract.
fn normalize_once(name: &str) -> String {
    let lowered = name.to_lowercase();
    let stripped = PAREN_PATTERN.replace_all(&lowered, "");
    let stripped = VERSION_PATTERN.replace_all(&stripped, "");
    let stripped = TRAILING_MODEL_PATTERN.replace(&stripped, "");
    let stripped = WIDTH_PATTERN.replace_all(&stripped, "");

    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");

    apply_brand_alias(&collapsed)
}

fn apply_brand_alias(name: &str) -> String {
    for (alias, canonical) in BRAND_ALIASES {
        if let Some(rest) = name.strip_prefix(alias) {
            if rest.starts_with(' ') {
                return format!("{}{}", canonical, rest);
            }
        }
    }
    name.to_string()
}
