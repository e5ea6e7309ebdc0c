/*
 * Automaton Specification
 *
 * Aggregate DFA over configuration events: a label, the set of tracked
 * concrete types, states, dispatch events, a deterministic transition
 * table, and one initial state. Immutable after construction and safe to
 * share read-only across concurrent analysis runs.
 *
 * Determinism is structural: the table is keyed by (state, event), so at
 * most one destination exists per pair. Totality is checked by
 * `validate`.
 */

use super::event::DispatchEvent;
use super::state::DfaState;
use crate::errors::{Result, StreamStateError};
use crate::shared::models::TypeRef;
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
pub struct AutomatonSpec {
    name: String,
    tracked_types: BTreeSet<TypeRef>,
    states: Vec<DfaState>,
    events: Vec<DispatchEvent>,
    transitions: FxHashMap<(DfaState, String), DfaState>,
    initial: DfaState,
}

impl AutomatonSpec {
    pub(crate) fn new(
        name: impl Into<String>,
        tracked_types: BTreeSet<TypeRef>,
        initial: DfaState,
    ) -> Self {
        Self {
            name: name.into(),
            tracked_types,
            states: Vec::new(),
            events: Vec::new(),
            transitions: FxHashMap::default(),
            initial,
        }
    }

    pub(crate) fn add_state(&mut self, state: DfaState) {
        if !self.states.contains(&state) {
            self.states.push(state);
        }
    }

    pub(crate) fn add_event(&mut self, event: DispatchEvent) {
        if !self.events.contains(&event) {
            self.events.push(event);
        }
    }

    pub(crate) fn add_transition(
        &mut self,
        source: DfaState,
        event: &DispatchEvent,
        destination: DfaState,
    ) {
        self.transitions
            .insert((source, event.name().to_string()), destination);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tracked_types(&self) -> &BTreeSet<TypeRef> {
        &self.tracked_types
    }

    pub fn states(&self) -> &[DfaState] {
        &self.states
    }

    pub fn events(&self) -> &[DispatchEvent] {
        &self.events
    }

    /// Declared event by name.
    pub fn event(&self, name: &str) -> Option<&DispatchEvent> {
        self.events.iter().find(|e| e.name() == name)
    }

    pub fn initial_state(&self) -> DfaState {
        self.initial
    }

    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    /// Destination of the transition from `state` on `event`, if declared.
    pub fn next_state(&self, state: DfaState, event: &DispatchEvent) -> Option<DfaState> {
        self.transitions
            .get(&(state, event.name().to_string()))
            .copied()
    }

    /// Like `next_state`, but a missing entry is an internal consistency
    /// violation.
    pub fn step(&self, state: DfaState, event: &DispatchEvent) -> Result<DfaState> {
        self.next_state(state, event)
            .ok_or_else(|| StreamStateError::MissingCoverage {
                state,
                event: event.name().to_string(),
            })
    }

    /// Map a call-site signature to its dispatch event, if any.
    ///
    /// Returns the first match; declared events are mutually exclusive by
    /// the builder contract.
    pub fn recognize(&self, signature: &str) -> Option<&DispatchEvent> {
        self.events.iter().find(|e| e.matches(signature))
    }

    /// Check structural invariants: the initial state is declared and the
    /// transition table is total over states x events.
    pub fn validate(&self) -> Result<()> {
        if !self.states.contains(&self.initial) {
            return Err(StreamStateError::SolverMisconfigured(format!(
                "initial state {} not among declared states",
                self.initial
            )));
        }
        for &state in &self.states {
            for event in &self.events {
                if self.next_state(state, event).is_none() {
                    return Err(StreamStateError::MissingCoverage {
                        state,
                        event: event.name().to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::state::{ElementOrdering, ExecutionMode};
    use super::*;

    fn two_state_spec() -> AutomatonSpec {
        let mut spec = AutomatonSpec::new("test", BTreeSet::new(), DfaState::INITIAL);
        let parallel = DispatchEvent::parse("parallel", r".*parallel\(\).*").unwrap();
        let target = DfaState::new(ExecutionMode::Parallel, ElementOrdering::Unknown);

        spec.add_state(DfaState::INITIAL);
        spec.add_state(target);
        spec.add_event(parallel.clone());
        spec.add_transition(DfaState::INITIAL, &parallel, target);
        spec
    }

    #[test]
    fn test_next_state_lookup() {
        let spec = two_state_spec();
        let parallel = spec.event("parallel").unwrap().clone();
        let target = DfaState::new(ExecutionMode::Parallel, ElementOrdering::Unknown);

        assert_eq!(spec.next_state(DfaState::INITIAL, &parallel), Some(target));
        assert_eq!(spec.next_state(target, &parallel), None);
    }

    #[test]
    fn test_step_reports_missing_coverage() {
        let spec = two_state_spec();
        let parallel = spec.event("parallel").unwrap().clone();
        let target = DfaState::new(ExecutionMode::Parallel, ElementOrdering::Unknown);

        let err = spec.step(target, &parallel).unwrap_err();
        assert!(matches!(
            err,
            StreamStateError::MissingCoverage { state, .. } if state == target
        ));
    }

    #[test]
    fn test_validate_rejects_partial_table() {
        let spec = two_state_spec();
        assert!(spec.validate().is_err());
    }

    #[test]
    fn test_recognize_ignores_untracked_signatures() {
        let spec = two_state_spec();
        assert!(spec.recognize("s.map()").is_none());
        assert_eq!(
            spec.recognize("s.parallel()").map(|e| e.name()),
            Some("parallel")
        );
    }
}
