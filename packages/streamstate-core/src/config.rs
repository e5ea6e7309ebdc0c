//! Solver configuration
//!
//! Explicit immutable options passed into each solver call. Two
//! concurrent runs can use different options without interfering; there
//! is no process-wide option registry.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Options for one whole-program typestate solver run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverOptions {
    /// Restrict propagation to live objects. Off by default: the
    /// configuration automaton needs facts past the last use of the
    /// pipeline.
    pub live_analysis: bool,

    /// Wall-clock budget for one solver run.
    pub timeout: Option<Duration>,

    /// Upper bound on the number of tracked objects a run may examine.
    pub max_findings: Option<usize>,

    /// Fixpoint iteration bound.
    pub max_iterations: usize,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            live_analysis: false,
            timeout: None,
            max_findings: None,
            max_iterations: 100_000,
        }
    }
}
