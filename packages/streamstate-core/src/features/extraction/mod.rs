/*
 * State Extraction
 *
 * Reads the possible automaton states of one tracked object at a
 * designated query block out of the solver's fact tables. The block is
 * named method-locally; facts from every calling context of the method
 * are unioned, since the caller asks about the source-level point, not
 * one context of it.
 */

use crate::errors::{Result, StreamStateError};
use crate::features::engine::ports::{CallGraph, ExplodedSupergraph};
use crate::features::solver::domain::{AggregateResult, FlowFact};
use crate::shared::models::{AbstractObject, MethodRef, ProgramPoint};

/// Union of the flow facts recorded for `object` at block `block_index`
/// of `method`, across all calling contexts.
pub fn extract_states<C, S>(
    call_graph: &C,
    supergraph: &S,
    result: &AggregateResult,
    object: AbstractObject,
    method: &MethodRef,
    block_index: u32,
) -> Result<FlowFact>
where
    C: CallGraph,
    S: ExplodedSupergraph,
{
    let query = ProgramPoint::new(method.clone(), block_index);
    let table = result
        .instance_result(&object)
        .ok_or_else(|| StreamStateError::QueryPointUnavailable(query.clone()))?;

    let mut states = FlowFact::empty();
    for node in call_graph.nodes_of(method) {
        let Some(point) = supergraph.node_for(&node, block_index) else {
            continue;
        };
        if let Some(fact) = table.fact_at(&point) {
            states.join(fact);
        }
    }

    if states.is_empty() {
        return Err(StreamStateError::QueryPointUnavailable(query));
    }
    tracing::debug!("{object} at {query}: {states}");
    Ok(states)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::automaton::domain::{DfaState, ElementOrdering, ExecutionMode};
    use crate::features::engine::ports::CallSite;
    use crate::shared::models::{CallGraphNode, InstructionRef};

    struct OneMethodGraph {
        method: MethodRef,
    }

    impl CallGraph for OneMethodGraph {
        fn contains_method(&self, method: &MethodRef) -> bool {
            *method == self.method
        }

        fn nodes_of(&self, method: &MethodRef) -> Vec<CallGraphNode> {
            if *method == self.method {
                vec![CallGraphNode::new(0, method.clone())]
            } else {
                vec![]
            }
        }
    }

    struct PassThroughSupergraph;

    impl ExplodedSupergraph for PassThroughSupergraph {
        fn node_for(&self, node: &CallGraphNode, block_index: u32) -> Option<ProgramPoint> {
            Some(ProgramPoint::new(node.method.clone(), block_index))
        }

        fn successors(&self, _point: &ProgramPoint) -> Vec<ProgramPoint> {
            vec![]
        }

        fn call_sites(&self, _point: &ProgramPoint) -> Vec<CallSite> {
            vec![]
        }

        fn creation_point(&self, instruction: &InstructionRef) -> Option<ProgramPoint> {
            Some(ProgramPoint::new(instruction.method.clone(), instruction.block))
        }
    }

    fn seeded_result(method: &MethodRef, block: u32, fact: FlowFact) -> AggregateResult {
        let mut table = crate::features::solver::domain::InstanceResult::default();
        table
            .fact_mut(&ProgramPoint::new(method.clone(), block))
            .join(&fact);

        let mut result = AggregateResult::default();
        result.insert(AbstractObject::new(1), table);
        result
    }

    #[test]
    fn test_recorded_fact_is_returned() {
        let method = MethodRef::new("A.main()V");
        let fact = FlowFact::singleton(DfaState::new(
            ExecutionMode::Parallel,
            ElementOrdering::Ordered,
        ));
        let result = seeded_result(&method, 2, fact.clone());

        let states = extract_states(
            &OneMethodGraph {
                method: method.clone(),
            },
            &PassThroughSupergraph,
            &result,
            AbstractObject::new(1),
            &method,
            2,
        )
        .unwrap();
        assert_eq!(states, fact);
    }

    #[test]
    fn test_missing_block_is_an_error() {
        let method = MethodRef::new("A.main()V");
        let result = seeded_result(&method, 2, FlowFact::singleton(DfaState::INITIAL));

        let err = extract_states(
            &OneMethodGraph {
                method: method.clone(),
            },
            &PassThroughSupergraph,
            &result,
            AbstractObject::new(1),
            &method,
            9,
        )
        .unwrap_err();
        assert!(matches!(err, StreamStateError::QueryPointUnavailable(_)));
    }

    #[test]
    fn test_unknown_object_is_an_error() {
        let method = MethodRef::new("A.main()V");
        let result = seeded_result(&method, 2, FlowFact::singleton(DfaState::INITIAL));

        let err = extract_states(
            &OneMethodGraph {
                method: method.clone(),
            },
            &PassThroughSupergraph,
            &result,
            AbstractObject::new(42),
            &method,
            2,
        )
        .unwrap_err();
        assert!(matches!(err, StreamStateError::QueryPointUnavailable(_)));
    }
}
