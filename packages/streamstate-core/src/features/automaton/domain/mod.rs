/*
 * Automaton Domain
 *
 * States, events, and the aggregate DFA specification.
 */

pub mod event;
pub mod spec;
pub mod state;

pub use event::DispatchEvent;
pub use spec::AutomatonSpec;
pub use state::{DfaState, ElementOrdering, ExecutionMode};
