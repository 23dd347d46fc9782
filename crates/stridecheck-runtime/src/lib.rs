//! Async runtime for stridecheck: agent providers and the sequential runner.
//!
//! `stridecheck-core` is pure and synchronous; everything that talks to the
//! outside world lives here. The [`AgentProvider`] trait is the seam between
//! the runner and whatever produces recommendation text, and
//! [`Runner`] drives a case set through a provider, scores each output, and
//! persists the reports.
//!
//! The HTTP provider for Anthropic-compatible messages APIs is gated behind
//! the `http-agent` feature so library users without network needs skip the
//! `reqwest` dependency.

pub mod providers;
pub mod runner;

pub use providers::{AgentError, AgentProvider};
pub use runner::{CaseReport, Runner, RunnerConfig, RunnerError, RunSummary};

#[cfg(feature = "http-agent")]
pub use providers::HttpAgentProvider;
