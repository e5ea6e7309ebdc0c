/*
 * Solver Domain
 *
 * Lattice and result types for the whole-program typestate analysis.
 * A flow fact is the set of automaton states an object may hold at a
 * program point. The lattice is the powerset of states ordered by
 * inclusion; bottom is the empty set, join is set union (may-analysis).
 */

use crate::features::automaton::domain::DfaState;
use crate::shared::models::{AbstractObject, ProgramPoint};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Set of automaton states an object may be in at one program point.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowFact {
    states: BTreeSet<DfaState>,
}

impl FlowFact {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn singleton(state: DfaState) -> Self {
        let mut states = BTreeSet::new();
        states.insert(state);
        Self { states }
    }

    pub fn insert(&mut self, state: DfaState) {
        self.states.insert(state);
    }

    pub fn contains(&self, state: DfaState) -> bool {
        self.states.contains(&state)
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Join with another fact: set union. Returns true if self grew.
    pub fn join(&mut self, other: &FlowFact) -> bool {
        let before = self.states.len();
        self.states.extend(other.states.iter().copied());
        self.states.len() > before
    }

    pub fn iter(&self) -> impl Iterator<Item = DfaState> + '_ {
        self.states.iter().copied()
    }

    pub fn states(&self) -> &BTreeSet<DfaState> {
        &self.states
    }
}

impl FromIterator<DfaState> for FlowFact {
    fn from_iter<I: IntoIterator<Item = DfaState>>(iter: I) -> Self {
        Self {
            states: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for FlowFact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, state) in self.states.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{state}")?;
        }
        write!(f, "}}")
    }
}

/// Per-object table of flow facts across the supergraph.
///
/// Facts are recorded at block entry.
#[derive(Debug, Clone, Default)]
pub struct InstanceResult {
    facts: FxHashMap<ProgramPoint, FlowFact>,
}

impl InstanceResult {
    pub(crate) fn fact_mut(&mut self, point: &ProgramPoint) -> &mut FlowFact {
        self.facts.entry(point.clone()).or_default()
    }

    pub fn fact_at(&self, point: &ProgramPoint) -> Option<&FlowFact> {
        self.facts.get(point)
    }

    pub fn points(&self) -> impl Iterator<Item = &ProgramPoint> {
        self.facts.keys()
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

/// Run statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SolverStats {
    pub iterations: usize,
    pub tracked_objects: usize,
    pub visited_points: usize,
    pub solve_time_ms: u64,
}

/// Aggregate solver output: one fact table per tracked abstract object.
///
/// Produced once per run; read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct AggregateResult {
    instances: FxHashMap<AbstractObject, InstanceResult>,
    pub stats: SolverStats,
}

impl AggregateResult {
    pub(crate) fn insert(&mut self, object: AbstractObject, result: InstanceResult) {
        self.instances.insert(object, result);
    }

    pub fn instance_result(&self, object: &AbstractObject) -> Option<&InstanceResult> {
        self.instances.get(object)
    }

    pub fn tracked_objects(&self) -> impl Iterator<Item = &AbstractObject> {
        self.instances.keys()
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::automaton::domain::{ElementOrdering, ExecutionMode};

    #[test]
    fn test_join_is_set_union() {
        let mut a = FlowFact::singleton(DfaState::new(
            ExecutionMode::Parallel,
            ElementOrdering::Unknown,
        ));
        let b = FlowFact::singleton(DfaState::new(
            ExecutionMode::Sequential,
            ElementOrdering::Unknown,
        ));

        assert!(a.join(&b));
        assert_eq!(a.len(), 2);

        // Joining again changes nothing.
        assert!(!a.join(&b));
    }

    #[test]
    fn test_join_never_shrinks() {
        let mut a: FlowFact = [
            DfaState::new(ExecutionMode::Parallel, ElementOrdering::Ordered),
            DfaState::new(ExecutionMode::Sequential, ElementOrdering::Ordered),
        ]
        .into_iter()
        .collect();

        assert!(!a.join(&FlowFact::empty()));
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn test_display_is_ordered() {
        let fact: FlowFact = [
            DfaState::new(ExecutionMode::Sequential, ElementOrdering::Unknown),
            DfaState::new(ExecutionMode::Parallel, ElementOrdering::Unknown),
        ]
        .into_iter()
        .collect();

        assert_eq!(fact.to_string(), "{sequentialUnknown, parallelUnknown}");
    }
}
