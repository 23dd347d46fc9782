//! Matching primitives: name normalization, constraint splitting,
//! containment, and context classification.
//!
//! Everything here is pure computation over borrowed strings; the
//! [`Evaluator`](crate::evaluator::Evaluator) is the only consumer that
//! composes these pieces.

mod constraint;
mod contains;
mod context;
mod lexicon;
mod normalize;

pub use constraint::extract_item_names;
pub use contains::{contains_item, locate_item};
pub use context::{is_negative_context, CONTEXT_RADIUS};
pub use lexicon::{Lexicon, Polarity};
pub use normalize::normalize;
