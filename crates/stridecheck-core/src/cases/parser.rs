//! Test-case data model and file loading.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading a case file.
#[derive(Error, Debug)]
pub enum CaseError {
    #[error("Failed to read case file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Case file validation failed: {0}")]
    Validation(String),
}

/// Hard constraints of a test case.
///
/// Only `must_not` is consumed by the matching engine; `must_have` is part
/// of the data contract and advisory for human review.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HardConstraints {
    #[serde(default)]
    pub must_have: Vec<String>,

    /// Forbidden items. Each entry may bundle several names joined by `/`
    /// with an optional parenthesized annotation.
    #[serde(default)]
    pub must_not: Vec<String>,
}

/// Soft reference answers of a test case.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SoftReference {
    #[serde(default)]
    pub suggested_shoes: Vec<String>,

    #[serde(default)]
    pub alternatives: Vec<String>,

    /// Extraction confidence label, advisory only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<String>,
}

/// One evaluation case: a query with its constraints and reference answers.
///
/// Read-only input, loaded once per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    /// Unique positive id.
    pub id: u32,

    /// Free-text category label.
    pub category: String,

    /// The natural-language prompt issued to the agent.
    pub query: String,

    /// Attribute name -> free-text value (weight, foot type, pace, pain
    /// point). Advisory only; not consumed by the matching engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<BTreeMap<String, String>>,

    #[serde(default)]
    pub hard_constraints: HardConstraints,

    #[serde(default)]
    pub soft_reference: SoftReference,
}

/// The case-set container persisted by the case builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseFile {
    pub version: String,

    pub description: String,

    pub extracted_at: DateTime<Utc>,

    /// Cases, sorted ascending by id.
    pub cases: Vec<TestCase>,
}

impl CaseFile {
    /// Parse a case file from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, CaseError> {
        let file: CaseFile = serde_json::from_str(json)?;
        file.validate()?;
        Ok(file)
    }

    /// Parse a case file from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, CaseError> {
        let file: CaseFile = serde_yaml::from_str(yaml)?;
        file.validate()?;
        Ok(file)
    }

    /// Parse a case file from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CaseError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parse a case file from a YAML file on disk.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, CaseError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Look up one case by id.
    pub fn case(&self, id: u32) -> Option<&TestCase> {
        self.cases.iter().find(|c| c.id == id)
    }

    /// Structural validation: ids positive and unique.
    fn validate(&self) -> Result<(), CaseError> {
        let mut seen = HashSet::new();

        for case in &self.cases {
            if case.id == 0 {
                return Err(CaseError::Validation(
                    "case id must be a positive integer".to_string(),
                ));
            }
            if !seen.insert(case.id) {
                return Err(CaseError::Validation(format!(
                    "duplicate case id: {}",
                    case.id
                )));
            }
        }

        Ok(())
    }
}
