/*
 * Stream Analysis Domain
 *
 * Caller-facing descriptor of one pipeline to analyze, and the outcome
 * value the analysis returns for it.
 */

use crate::features::solver::domain::{FlowFact, SolverStats};
use crate::shared::models::{AbstractObject, InstructionRef, MethodRef, TypeRef};
use serde::{Deserialize, Serialize};

/// One stream pipeline to analyze.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamDescriptor {
    /// Method containing the pipeline declaration; also the sole analysis
    /// entry point.
    pub enclosing_method: MethodRef,

    /// Declared type of the pipeline object.
    pub stream_type: TypeRef,

    /// Instantiation instruction the tracked object must correlate to.
    pub creation: InstructionRef,

    /// Block of `enclosing_method` whose entry facts answer the query.
    pub query_block: u32,

    /// Base pipeline type the declared type must implement, if required.
    #[serde(default)]
    pub base_type: Option<TypeRef>,
}

impl StreamDescriptor {
    pub fn new(
        enclosing_method: MethodRef,
        stream_type: TypeRef,
        creation: InstructionRef,
        query_block: u32,
    ) -> Self {
        Self {
            enclosing_method,
            stream_type,
            creation,
            query_block,
            base_type: None,
        }
    }

    pub fn with_base_type(mut self, base_type: TypeRef) -> Self {
        self.base_type = Some(base_type);
        self
    }
}

/// Outcome of analyzing one pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamAnalysisOutcome {
    /// Abstract object the descriptor correlated to.
    pub object: AbstractObject,

    /// Possible automaton states at the query block.
    pub possible_states: FlowFact,

    pub stats: SolverStats,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_descriptor_round_trips_through_json() {
        let descriptor = StreamDescriptor::new(
            MethodRef::new("A.main()V"),
            TypeRef::new("java/util/stream/Stream"),
            InstructionRef::new(MethodRef::new("A.main()V"), 0, 2),
            5,
        );

        let json = serde_json::to_string(&descriptor).unwrap();
        let back: StreamDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, descriptor);
    }
}
