/*
 * Configuration States
 *
 * Product states over the two independent configuration axes of a
 * pipeline: execution mode and element ordering. The state name encodes
 * the pair, e.g. "parallelOrdered". Exactly one state is initial: the
 * one with both axes unknown.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Execution mode axis of a pipeline configuration.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum ExecutionMode {
    Unknown,
    Sequential,
    Parallel,
}

impl ExecutionMode {
    pub const ALL: [ExecutionMode; 3] = [
        ExecutionMode::Unknown,
        ExecutionMode::Sequential,
        ExecutionMode::Parallel,
    ];

    fn label(&self) -> &'static str {
        match self {
            ExecutionMode::Unknown => "unknown",
            ExecutionMode::Sequential => "sequential",
            ExecutionMode::Parallel => "parallel",
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Element ordering axis of a pipeline configuration.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum ElementOrdering {
    Unknown,
    Ordered,
    Unordered,
}

impl ElementOrdering {
    pub const ALL: [ElementOrdering; 3] = [
        ElementOrdering::Unknown,
        ElementOrdering::Ordered,
        ElementOrdering::Unordered,
    ];

    fn label(&self) -> &'static str {
        match self {
            ElementOrdering::Unknown => "Unknown",
            ElementOrdering::Ordered => "Ordered",
            ElementOrdering::Unordered => "Unordered",
        }
    }
}

impl fmt::Display for ElementOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label().to_lowercase())
    }
}

/// One automaton state: a (mode, ordering) pair.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct DfaState {
    pub mode: ExecutionMode,
    pub ordering: ElementOrdering,
}

impl DfaState {
    /// Initial state of every built automaton: both axes unknown.
    pub const INITIAL: DfaState =
        DfaState::new(ExecutionMode::Unknown, ElementOrdering::Unknown);

    pub const fn new(mode: ExecutionMode, ordering: ElementOrdering) -> Self {
        Self { mode, ordering }
    }

    pub fn is_initial(&self) -> bool {
        *self == Self::INITIAL
    }

    /// State name encoding the pair, e.g. "sequentialOrdered".
    pub fn name(&self) -> String {
        format!("{}{}", self.mode.label(), self.ordering.label())
    }
}

impl fmt::Display for DfaState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.mode.label(), self.ordering.label())
    }
}
