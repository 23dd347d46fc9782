//! Verdict types produced by the evaluator.
//!
//! A [`MatchVerdict`] is created fresh per evaluation, never mutated
//! afterwards, and carries no identity beyond its case id. It is
//! JSON-serializable for persistence by the runner.

use serde::{Deserialize, Serialize};

/// Whether a reference match came from the primary suggestions or the
/// alternatives list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Suggested,
    Alternative,
}

/// A reference item found in the agent output.
///
/// Alternatives are tagged distinctly from primary suggestions so the runner
/// can report the two hit rates separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceMatch {
    pub name: String,
    pub kind: MatchKind,
}

impl ReferenceMatch {
    pub fn suggested(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: MatchKind::Suggested,
        }
    }

    pub fn alternative(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: MatchKind::Alternative,
        }
    }
}

/// The structured verdict for one (output, test case) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchVerdict {
    /// Id of the evaluated case.
    pub case_id: u32,

    /// False iff at least one forbidden item was recommended in a
    /// non-negative context (or the output was missing).
    pub hard_constraint_pass: bool,

    /// Human-readable descriptions of each violation: the matched item and
    /// its originating constraint string.
    pub violations: Vec<String>,

    /// Forbidden items mentioned only in a dissuading context.
    pub correct_avoidance: Vec<String>,

    /// Reference items found in the output.
    pub matches: Vec<ReferenceMatch>,

    /// Non-empty iff nothing matched and nothing was violated: the output
    /// cannot be auto-scored and needs a manual or secondary check.
    pub needs_verification: Vec<String>,
}

impl MatchVerdict {
    /// A fresh passing verdict with no findings yet.
    pub fn passing(case_id: u32) -> Self {
        Self {
            case_id,
            hard_constraint_pass: true,
            violations: Vec::new(),
            correct_avoidance: Vec::new(),
            matches: Vec::new(),
            needs_verification: Vec::new(),
        }
    }

    /// The terminal verdict for an absent or empty output.
    pub fn no_output(case_id: u32) -> Self {
        Self {
            case_id,
            hard_constraint_pass: false,
            violations: vec!["no output".to_string()],
            correct_avoidance: Vec::new(),
            matches: Vec::new(),
            needs_verification: Vec::new(),
        }
    }

    /// Count of matched primary suggestions.
    pub fn suggested_hits(&self) -> usize {
        self.matches
            .iter()
            .filter(|m| m.kind == MatchKind::Suggested)
            .count()
    }

    /// Count of matched alternatives.
    pub fn alternative_hits(&self) -> usize {
        self.matches
            .iter()
            .filter(|m| m.kind == MatchKind::Alternative)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_output_verdict() {
        let verdict = MatchVerdict::no_output(7);
        assert_eq!(verdict.case_id, 7);
        assert!(!verdict.hard_constraint_pass);
        assert_eq!(verdict.violations, vec!["no output"]);
        assert!(verdict.matches.is_empty());
    }

    #[test]
    fn test_hit_counts() {
        let mut verdict = MatchVerdict::passing(1);
        verdict.matches.push(ReferenceMatch::suggested("A"));
        verdict.matches.push(ReferenceMatch::alternative("B"));
        verdict.matches.push(ReferenceMatch::suggested("C"));
        assert_eq!(verdict.suggested_hits(), 2);
        assert_eq!(verdict.alternative_hits(), 1);
    }

    #[test]
    fn test_verdict_serializes() {
        let mut verdict = MatchVerdict::passing(3);
        verdict.matches.push(ReferenceMatch::alternative("Brand Z"));

        let json = serde_json::to_value(&verdict).unwrap();
        assert_eq!(json["case_id"], 3);
        assert_eq!(json["matches"][0]["kind"], "alternative");
    }
}
