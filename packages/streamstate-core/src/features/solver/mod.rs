/*
 * Whole-Program Typestate Solver
 *
 * - Domain: FlowFact lattice, per-object fact tables, aggregate result
 * - Application: the forward may-analysis fixpoint
 */

pub mod application;
pub mod domain;

pub use application::TypestateSolver;
pub use domain::{AggregateResult, FlowFact, InstanceResult, SolverStats};
