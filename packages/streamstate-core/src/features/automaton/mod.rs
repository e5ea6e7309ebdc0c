/*
 * Configuration Automaton
 *
 * Typestate DFA over pipeline configuration events.
 *
 * - Domain: DfaState (mode x ordering product), DispatchEvent,
 *   AutomatonSpec with a total deterministic transition table
 * - Infrastructure: StreamConfigAutomaton builder for the fixed
 *   9-state x 4-event instance
 *
 * The event recognizer lives on AutomatonSpec (`recognize`): call-site
 * signatures are matched against the declared event patterns.
 */

pub mod domain;
pub mod infrastructure;

pub use domain::{AutomatonSpec, DfaState, DispatchEvent, ElementOrdering, ExecutionMode};
pub use infrastructure::{StreamConfigAutomaton, AUTOMATON_NAME};
