/*
 * Stream Configuration Automaton
 *
 * Builds the fixed 9-state x 4-event DFA over the product of
 * {unknown, sequential, parallel} x {unknown, ordered, unordered}.
 *
 * Transition rule for state (m, o):
 * - parallel   -> (parallel, o)
 * - sequential -> (sequential, o)
 * - sorted     -> (m, ordered)
 * - unordered  -> (m, unordered)
 *
 * Each event updates one axis and holds the other fixed. A later
 * configuration axis decomposes into one more axis of states plus events
 * that only touch that axis; nothing here needs to change.
 *
 * Merge/concatenation of two pipelines is intentionally unmodeled: no
 * event is declared for it, so such call sites pass through the transfer
 * function unchanged.
 */

use super::domain::{AutomatonSpec, DfaState, DispatchEvent, ElementOrdering, ExecutionMode};
use crate::shared::models::TypeRef;
use once_cell::sync::Lazy;
use regex::Regex;

/// Label of the built automaton.
pub const AUTOMATON_NAME: &str = "execution mode and ordering";

static PARALLEL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r".*parallel\(\).*").unwrap());
static SEQUENTIAL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r".*sequential\(\).*").unwrap());
static SORTED_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r".*sorted\(\).*").unwrap());
static UNORDERED_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r".*unordered\(\).*").unwrap());

pub struct StreamConfigAutomaton;

impl StreamConfigAutomaton {
    /// Build the automaton for the given tracked type set.
    ///
    /// Pure and deterministic; the resulting table always has exactly
    /// 36 entries (9 states x 4 events), all resolved.
    pub fn build(tracked_types: impl IntoIterator<Item = TypeRef>) -> AutomatonSpec {
        let mut spec = AutomatonSpec::new(
            AUTOMATON_NAME,
            tracked_types.into_iter().collect(),
            DfaState::INITIAL,
        );

        let mut states = Vec::with_capacity(9);
        for mode in ExecutionMode::ALL {
            for ordering in ElementOrdering::ALL {
                let state = DfaState::new(mode, ordering);
                spec.add_state(state);
                states.push(state);
            }
        }

        let parallel = DispatchEvent::new("parallel", PARALLEL_PATTERN.clone());
        let sequential = DispatchEvent::new("sequential", SEQUENTIAL_PATTERN.clone());
        let sorted = DispatchEvent::new("sorted", SORTED_PATTERN.clone());
        let unordered = DispatchEvent::new("unordered", UNORDERED_PATTERN.clone());

        spec.add_event(parallel.clone());
        spec.add_event(sequential.clone());
        spec.add_event(sorted.clone());
        spec.add_event(unordered.clone());

        for &state in &states {
            spec.add_transition(
                state,
                &parallel,
                DfaState::new(ExecutionMode::Parallel, state.ordering),
            );
            spec.add_transition(
                state,
                &sequential,
                DfaState::new(ExecutionMode::Sequential, state.ordering),
            );
            spec.add_transition(
                state,
                &sorted,
                DfaState::new(state.mode, ElementOrdering::Ordered),
            );
            spec.add_transition(
                state,
                &unordered,
                DfaState::new(state.mode, ElementOrdering::Unordered),
            );
        }

        debug_assert!(spec.validate().is_ok());
        spec
    }
}
