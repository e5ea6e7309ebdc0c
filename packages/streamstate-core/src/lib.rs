/*
 * StreamState Core - Stream Configuration Typestate Analysis
 *
 * Determines the possible execution-mode x ordering configurations of a
 * stream pipeline object at a designated program point, by running a
 * deterministic finite automaton over configuration events forward
 * through the whole program.
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Common models (TypeRef, MethodRef, ProgramPoint, ...)
 *                  and the cooperative cancellation token
 * - features/    : Vertical slices
 *   (automaton -> engine -> solver -> correlation -> extraction
 *    -> stream_analysis)
 */

pub mod config;
pub mod errors;
pub mod features;
pub mod shared;

pub use config::SolverOptions;
pub use errors::{Result, StreamStateError};
pub use features::automaton::domain::{
    AutomatonSpec, DfaState, DispatchEvent, ElementOrdering, ExecutionMode,
};
pub use features::automaton::infrastructure::{StreamConfigAutomaton, AUTOMATON_NAME};
pub use features::correlation::correlate;
pub use features::engine::infrastructure::{
    SimpleEngine, SimpleMethod, SimpleProgram, SimpleStatement,
};
pub use features::engine::ports::{
    AnalysisEngine, CallGraph, CallSite, ClassHierarchy, ExplodedSupergraph, PointsToAnalysis,
    WholeProgram,
};
pub use features::extraction::extract_states;
pub use features::solver::{AggregateResult, FlowFact, InstanceResult, SolverStats, TypestateSolver};
pub use features::stream_analysis::{StreamAnalysisOutcome, StreamDescriptor, StreamStateAnalysis};
pub use shared::cancellation::CancellationToken;
pub use shared::models::{
    AbstractObject, CallGraphNode, InstructionRef, MethodRef, ProgramPoint, TypeRef, VarRef,
};
