//! # stridecheck-core
//!
//! Deterministic matching and scoring engine for recommendation-agent
//! evaluations.
//!
//! Given a free-text agent output and a structured test case, the engine
//! answers:
//! - Was any forbidden item affirmatively recommended (hard-constraint
//!   violation), or was it correctly argued against?
//! - Which reference items were matched, despite naming variance (brand
//!   aliases, version suffixes, width qualifiers, compound "A/B" entries)?
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: same input always produces the same verdict
//! 2. **Total**: evaluation never fails; missing output is a verdict state
//! 3. **Pure**: no I/O, no shared state; safe to call concurrently
//! 4. **Exhaustive**: every constraint and reference entry is checked, no
//!    short-circuiting
//!
//! ## Example
//!
//! ```rust,ignore
//! use stridecheck_core::{evaluate, CaseFile};
//!
//! let file = CaseFile::from_json_file("eval/test_cases.json")?;
//! let case = file.case(1).expect("case 1 exists");
//! let verdict = evaluate(Some("I'd go with the Brand Z Trail 4."), case);
//!
//! if verdict.hard_constraint_pass {
//!     println!("pass, {} reference hits", verdict.matches.len());
//! } else {
//!     println!("violations: {:?}", verdict.violations);
//! }
//! ```

pub mod cases;
pub mod evaluator;
pub mod matching;
pub mod verdict;

// Re-export main types at crate root
pub use cases::{extract_cases, CaseError, CaseFile, HardConstraints, SoftReference, TestCase};
pub use evaluator::Evaluator;
pub use matching::{
    contains_item, extract_item_names, is_negative_context, normalize, Lexicon, Polarity,
};
pub use verdict::{MatchKind, MatchVerdict, ReferenceMatch};

/// Evaluate one agent output against one test case with the builtin
/// sentiment lexicon.
///
/// Convenience wrapper around [`Evaluator::evaluate`].
pub fn evaluate(output: Option<&str>, case: &TestCase) -> MatchVerdict {
    Evaluator::new().evaluate(output, case)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crate_root_evaluate() {
        let case = TestCase {
            id: 1,
            category: "trail".to_string(),
            query: "muddy trail shoes?".to_string(),
            profile: None,
            hard_constraints: HardConstraints {
                must_have: vec![],
                must_not: vec!["Brand X Road".to_string()],
            },
            soft_reference: SoftReference {
                suggested_shoes: vec!["Brand Z Trail 3".to_string()],
                alternatives: vec![],
                confidence: None,
            },
        };

        let verdict = evaluate(Some("Try the Brand Z Trail 3."), &case);
        assert!(verdict.hard_constraint_pass);
        assert_eq!(verdict.suggested_hits(), 1);

        let verdict = evaluate(None, &case);
        assert!(!verdict.hard_constraint_pass);
    }
}
