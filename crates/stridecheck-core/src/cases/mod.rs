//! Test-case model, case-file loading, and the document case builder.

pub mod extract;
mod parser;

pub use extract::extract_cases;
pub use parser::{CaseError, CaseFile, HardConstraints, SoftReference, TestCase};
