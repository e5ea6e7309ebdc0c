//! Error types for streamstate-core
//!
//! Every failure mode is a distinguishable variant. Analysis failures are
//! reported per tracked pipeline object and never downgraded to a
//! partial or best-effort result.

use crate::features::automaton::domain::DfaState;
use crate::shared::models::{ProgramPoint, TypeRef};
use thiserror::Error;

/// Main error type for stream typestate analysis
#[derive(Debug, Error)]
pub enum StreamStateError {
    /// External call-graph/points-to construction failed.
    #[error("call graph construction failed: {0}")]
    EngineBuild(String),

    /// Call-graph construction observed a cancellation request.
    #[error("call graph construction cancelled")]
    EngineCancelled,

    /// The typestate fixpoint exceeded its wall-clock budget.
    #[error("typestate solver timed out after {elapsed_ms}ms")]
    SolverTimeout { elapsed_ms: u64 },

    /// More tracked objects than the configured findings limit.
    #[error("typestate solver exceeded findings limit of {limit} ({found} tracked objects)")]
    SolverFindingsLimit { limit: usize, found: usize },

    /// Solver input or options violated a precondition.
    #[error("typestate solver misconfigured: {0}")]
    SolverMisconfigured(String),

    /// The solver fixpoint observed a cancellation request.
    #[error("typestate solver cancelled")]
    SolverCancelled,

    /// No abstract object corresponds to the designated instantiation
    /// instruction.
    #[error("no abstract object produced by instantiation at {instruction} ({candidates} candidates examined)")]
    CorrelationMissing {
        instruction: String,
        candidates: usize,
    },

    /// More than one abstract object corresponds to the designated
    /// instantiation instruction. Never resolved by guessing.
    #[error("{matched} abstract objects produced by instantiation at {instruction}; exactly one expected")]
    CorrelationAmbiguous { instruction: String, matched: usize },

    /// A recognized event has no transition from the current state.
    /// Structurally impossible for the built automaton; reported as an
    /// internal consistency violation if it ever occurs.
    #[error("automaton has no transition from state {state} on event '{event}'")]
    MissingCoverage { state: DfaState, event: String },

    /// The declared pipeline type is unknown to the class hierarchy.
    #[error("type {0} not found in class hierarchy")]
    UnknownType(TypeRef),

    /// The declared pipeline type does not implement the required base
    /// pipeline type.
    #[error("type {type_ref} does not implement {base}")]
    NotAPipelineType { type_ref: TypeRef, base: TypeRef },

    /// The designated query point has no flow fact for the tracked
    /// instance.
    #[error("no flow fact recorded at query point {0}")]
    QueryPointUnavailable(ProgramPoint),
}

/// Result type alias for stream typestate analysis
pub type Result<T> = std::result::Result<T, StreamStateError>;
