//! The evaluator: orchestrates normalization, constraint splitting,
//! containment, and context classification into one verdict.
//!
//! Evaluation is synchronous, single-threaded, side-effect-free computation
//! over immutable inputs. Independent (output, case) pairs may be evaluated
//! concurrently without coordination; each call only reads its inputs and
//! allocates a fresh verdict.

use crate::cases::TestCase;
use crate::matching::{contains_item, extract_item_names, is_negative_context, Lexicon};
use crate::verdict::{MatchVerdict, ReferenceMatch};

/// Evaluates agent outputs against test cases.
///
/// Carries the sentiment lexicon used for negative-context classification;
/// everything else is stateless.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    lexicon: Lexicon,
}

impl Evaluator {
    /// An evaluator with the builtin sentiment lexicon.
    pub fn new() -> Self {
        Self::default()
    }

    /// An evaluator with a caller-supplied lexicon.
    pub fn with_lexicon(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    /// Evaluate one agent output against one test case.
    ///
    /// An absent or empty output is a terminal failure verdict; no further
    /// checks run. Otherwise every constraint and reference entry is checked
    /// exhaustively, in order, with no short-circuiting: the verdict always
    /// reflects the complete set of findings, not just the first.
    pub fn evaluate(&self, output: Option<&str>, case: &TestCase) -> MatchVerdict {
        let Some(output) = output.filter(|text| !text.is_empty()) else {
            tracing::debug!(case_id = case.id, "no agent output");
            return MatchVerdict::no_output(case.id);
        };

        let output_lower = output.to_lowercase();
        let mut verdict = MatchVerdict::passing(case.id);

        for constraint in &case.hard_constraints.must_not {
            for item in extract_item_names(constraint) {
                if !contains_item(&output_lower, &item) {
                    continue;
                }

                if is_negative_context(output, &item, &self.lexicon) {
                    // The agent warned against the forbidden item.
                    verdict.correct_avoidance.push(item);
                } else {
                    tracing::debug!(case_id = case.id, item = %item, "hard constraint violated");
                    verdict.hard_constraint_pass = false;
                    verdict.violations.push(format!(
                        "recommended forbidden item: {} (from constraint: {})",
                        item, constraint
                    ));
                }
            }
        }

        // Reference scanning is independent of constraint findings.
        for suggested in &case.soft_reference.suggested_shoes {
            if contains_item(&output_lower, suggested) {
                verdict.matches.push(ReferenceMatch::suggested(suggested));
            }
        }
        for alternative in &case.soft_reference.alternatives {
            if contains_item(&output_lower, alternative) {
                verdict.matches.push(ReferenceMatch::alternative(alternative));
            }
        }

        if verdict.matches.is_empty() && verdict.hard_constraint_pass {
            verdict.needs_verification.push(
                "recommended items are outside the reference lists; needs manual verification"
                    .to_string(),
            );
        }

        verdict
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cases::{HardConstraints, SoftReference};
    use crate::matching::Polarity;
    use crate::verdict::MatchKind;

    fn case(
        must_not: &[&str],
        suggested: &[&str],
        alternatives: &[&str],
    ) -> TestCase {
        TestCase {
            id: 1,
            category: "trail".to_string(),
            query: "which trail shoe?".to_string(),
            profile: None,
            hard_constraints: HardConstraints {
                must_have: vec![],
                must_not: must_not.iter().map(|s| s.to_string()).collect(),
            },
            soft_reference: SoftReference {
                suggested_shoes: suggested.iter().map(|s| s.to_string()).collect(),
                alternatives: alternatives.iter().map(|s| s.to_string()).collect(),
                confidence: None,
            },
        }
    }

    #[test]
    fn test_missing_output_is_terminal() {
        let evaluator = Evaluator::new();
        let case = case(&["Brand X Model"], &["Brand Z Trail 3"], &[]);

        for output in [None, Some("")] {
            let verdict = evaluator.evaluate(output, &case);
            assert!(!verdict.hard_constraint_pass);
            assert_eq!(verdict.violations, vec!["no output"]);
            assert!(verdict.matches.is_empty());
            assert!(verdict.needs_verification.is_empty());
        }
    }

    #[test]
    fn test_violation_in_plain_context() {
        let evaluator = Evaluator::new();
        let case = case(&["Brand X Model(too soft)"], &[], &[]);

        let verdict = evaluator.evaluate(Some("My pick: the Brand X Model."), &case);
        assert!(!verdict.hard_constraint_pass);
        assert_eq!(verdict.violations.len(), 1);
        assert!(verdict.violations[0].contains("Brand X Model"));
        assert!(verdict.violations[0].contains("Brand X Model(too soft)"));
        assert!(verdict.correct_avoidance.is_empty());
    }

    #[test]
    fn test_negative_context_is_correct_avoidance() {
        let evaluator = Evaluator::new();
        let case = case(&["Brand X Model"], &[], &[]);

        let verdict = evaluator.evaluate(
            Some("I'd avoid the Brand X Model for your weight."),
            &case,
        );
        assert!(verdict.hard_constraint_pass);
        assert_eq!(verdict.correct_avoidance, vec!["Brand X Model"]);
        assert!(verdict.violations.is_empty());
    }

    #[test]
    fn test_all_constraints_checked_after_violation() {
        let evaluator = Evaluator::new();
        let case = case(&["Brand X Model", "Brand Y Racer"], &[], &[]);

        let verdict = evaluator.evaluate(
            Some("Both the Brand X Model and the Brand Y Racer work."),
            &case,
        );
        assert_eq!(verdict.violations.len(), 2);
    }

    #[test]
    fn test_alternative_tagged_distinctly() {
        let evaluator = Evaluator::new();
        let case = case(&[], &["Brand Z Trail 3"], &["Brand W Glide 5"]);

        let verdict = evaluator.evaluate(
            Some("Either the Brand Z Trail 3 or the Brand W Glide 5."),
            &case,
        );
        assert_eq!(verdict.suggested_hits(), 1);
        assert_eq!(verdict.alternative_hits(), 1);
        assert_eq!(verdict.matches[0].kind, MatchKind::Suggested);
        assert_eq!(verdict.matches[1].kind, MatchKind::Alternative);
    }

    #[test]
    fn test_needs_verification_when_nothing_fires() {
        let evaluator = Evaluator::new();
        let case = case(&["Brand X Model"], &["Brand Z Trail 3"], &[]);

        let verdict = evaluator.evaluate(Some("Try the Brand Q Cloudrunner."), &case);
        assert!(verdict.hard_constraint_pass);
        assert!(verdict.matches.is_empty());
        assert_eq!(verdict.needs_verification.len(), 1);
    }

    #[test]
    fn test_no_verification_note_on_violation() {
        let evaluator = Evaluator::new();
        let case = case(&["Brand X Model"], &["Brand Z Trail 3"], &[]);

        let verdict = evaluator.evaluate(Some("Go with the Brand X Model."), &case);
        assert!(!verdict.hard_constraint_pass);
        assert!(verdict.needs_verification.is_empty());
    }

    #[test]
    fn test_empty_lists_are_valid() {
        let evaluator = Evaluator::new();
        let case = case(&[], &[], &[]);

        let verdict = evaluator.evaluate(Some("Anything goes."), &case);
        assert!(verdict.hard_constraint_pass);
        assert!(verdict.violations.is_empty());
        assert_eq!(verdict.needs_verification.len(), 1);
    }

    #[test]
    fn test_custom_lexicon() {
        let lexicon = Lexicon::new(vec![("skip".to_string(), Polarity::Negative)]);
        let evaluator = Evaluator::with_lexicon(lexicon);
        let case = case(&["Brand X Model"], &[], &[]);

        let verdict = evaluator.evaluate(Some("Skip the Brand X Model."), &case);
        assert!(verdict.hard_constraint_pass);
        assert_eq!(verdict.correct_avoidance, vec!["Brand X Model"]);
    }

    #[test]
    fn test_end_to_end_scenario() {
        let evaluator = Evaluator::new();
        let case = case(
            &["Brand X Model/Brand Y Model(reason)"],
            &["Brand Z Trail 3"],
            &[],
        );

        let verdict = evaluator.evaluate(
            Some("I'd avoid Brand X Model - instead try Brand Z Trail 4, great for your needs."),
            &case,
        );

        // "Brand Y Model" also lands here: its keywords "brand" and "model"
        // are covered by the Brand X mention, and the shared offset sits in
        // the same negative window. Keyword coverage trades this ambiguity
        // for recall.
        assert_eq!(
            verdict.correct_avoidance,
            vec!["Brand X Model", "Brand Y Model"]
        );
        assert!(verdict.violations.is_empty());
        assert!(verdict.hard_constraint_pass);
        // "Brand Z Trail 3" matches "Brand Z Trail 4" via keyword coverage
        // after trailing-number stripping.
        assert_eq!(verdict.suggested_hits(), 1);
        assert_eq!(verdict.matches[0].name, "Brand Z Trail 3");
        assert!(verdict.needs_verification.is_empty());
    }
}
