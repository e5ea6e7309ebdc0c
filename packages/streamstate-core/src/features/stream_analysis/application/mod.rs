/*
 * Stream Analysis
 *
 * End-to-end pipeline over one descriptor:
 * 1. build the whole program from the enclosing method as entry point
 * 2. validate the declared type and collect it with its supertypes
 * 3. build the configuration automaton over the tracked types
 * 4. run the typestate solver
 * 5. correlate the designated instantiation to its abstract object
 * 6. extract the possible states at the query block
 *
 * `analyze_all` runs independent descriptors on the rayon pool, one
 * result slot per descriptor. A failure in one slot never poisons the
 * others.
 */

use crate::config::SolverOptions;
use crate::errors::{Result, StreamStateError};
use crate::features::automaton::infrastructure::StreamConfigAutomaton;
use crate::features::correlation::correlate;
use crate::features::engine::ports::{AnalysisEngine, CallGraph, ClassHierarchy};
use crate::features::extraction::extract_states;
use crate::features::solver::TypestateSolver;
use crate::features::stream_analysis::domain::{StreamAnalysisOutcome, StreamDescriptor};
use crate::shared::cancellation::CancellationToken;
use rayon::prelude::*;

pub struct StreamStateAnalysis<'e, E> {
    engine: &'e E,
    options: SolverOptions,
}

impl<'e, E: AnalysisEngine> StreamStateAnalysis<'e, E> {
    pub fn new(engine: &'e E) -> Self {
        Self {
            engine,
            options: SolverOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SolverOptions) -> Self {
        self.options = options;
        self
    }

    /// Analyze one pipeline: the possible execution-mode x ordering states
    /// at its query block.
    pub fn analyze_stream(
        &self,
        descriptor: &StreamDescriptor,
        cancel: &CancellationToken,
    ) -> Result<StreamAnalysisOutcome> {
        tracing::info!(
            "analyzing pipeline of {} declared in {}",
            descriptor.stream_type,
            descriptor.enclosing_method
        );

        let program = self
            .engine
            .build_call_graph(std::slice::from_ref(&descriptor.enclosing_method), cancel)?;

        if !program.call_graph.contains_method(&descriptor.creation.method) {
            return Err(StreamStateError::SolverMisconfigured(format!(
                "instantiation method {} is not in the call graph",
                descriptor.creation.method
            )));
        }

        let declared = program
            .class_hierarchy
            .lookup_class(&descriptor.stream_type)
            .ok_or_else(|| StreamStateError::UnknownType(descriptor.stream_type.clone()))?;
        if let Some(base) = &descriptor.base_type {
            if !program.class_hierarchy.implements(&declared, base) {
                return Err(StreamStateError::NotAPipelineType {
                    type_ref: declared,
                    base: base.clone(),
                });
            }
        }
        let mut tracked = vec![declared.clone()];
        tracked.extend(program.class_hierarchy.supertypes(&declared));

        let automaton = StreamConfigAutomaton::build(tracked);
        let result = TypestateSolver::new(&automaton)
            .with_options(self.options.clone())
            .solve(&program, cancel)?;

        let object = correlate(
            &program.points_to,
            &descriptor.creation,
            result.tracked_objects().copied(),
        )?;

        let possible_states = extract_states(
            &program.call_graph,
            &program.supergraph,
            &result,
            object,
            &descriptor.enclosing_method,
            descriptor.query_block,
        )?;

        tracing::info!("{object}: possible configurations {possible_states}");
        Ok(StreamAnalysisOutcome {
            object,
            possible_states,
            stats: result.stats,
        })
    }

    /// Analyze independent pipelines in parallel; one result per
    /// descriptor, in input order.
    pub fn analyze_all(
        &self,
        descriptors: &[StreamDescriptor],
        cancel: &CancellationToken,
    ) -> Vec<Result<StreamAnalysisOutcome>> {
        descriptors
            .par_iter()
            .map(|descriptor| self.analyze_stream(descriptor, cancel))
            .collect()
    }
}
