/*
 * Whole-Program Typestate Solver
 *
 * Forward may-analysis over the exploded supergraph, one tracked object
 * at a time:
 * - seed {initial} at the object's creation point
 * - transfer: call sites whose receiver may-aliases the object apply the
 *   automaton transition for their recognized event, identity otherwise
 * - join at merges: set union
 *
 * A fact never becomes empty past the creation point; the automaton is
 * total. The worklist honors the cancellation token and the options'
 * timeout and iteration bounds on every step.
 */

use crate::config::SolverOptions;
use crate::errors::{Result, StreamStateError};
use crate::features::automaton::domain::AutomatonSpec;
use crate::features::engine::ports::{
    CallGraph, ClassHierarchy, ExplodedSupergraph, PointsToAnalysis, WholeProgram,
};
use crate::features::solver::domain::{AggregateResult, FlowFact, InstanceResult};
use crate::shared::cancellation::CancellationToken;
use crate::shared::models::{AbstractObject, ProgramPoint};
use std::collections::VecDeque;
use std::time::Instant;

pub struct TypestateSolver<'a> {
    automaton: &'a AutomatonSpec,
    options: SolverOptions,
}

impl<'a> TypestateSolver<'a> {
    pub fn new(automaton: &'a AutomatonSpec) -> Self {
        Self {
            automaton,
            options: SolverOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SolverOptions) -> Self {
        self.options = options;
        self
    }

    /// Compute the flow-fact table of every abstract object whose type is
    /// tracked by the automaton.
    pub fn solve<C, H, P, S>(
        &self,
        program: &WholeProgram<C, H, P, S>,
        cancel: &CancellationToken,
    ) -> Result<AggregateResult>
    where
        C: CallGraph,
        H: ClassHierarchy,
        P: PointsToAnalysis,
        S: ExplodedSupergraph,
    {
        if self.options.live_analysis {
            return Err(StreamStateError::SolverMisconfigured(
                "live object analysis is not available in this solver".into(),
            ));
        }

        let started = Instant::now();

        let mut objects: Vec<AbstractObject> = Vec::new();
        for type_ref in self.automaton.tracked_types() {
            for object in program.points_to.objects_of(type_ref) {
                if !objects.contains(&object) {
                    objects.push(object);
                }
            }
        }
        objects.sort_by_key(|o| o.id);
        tracing::info!(
            "solving '{}' for {} tracked object(s)",
            self.automaton.name(),
            objects.len()
        );

        if let Some(limit) = self.options.max_findings {
            if objects.len() > limit {
                return Err(StreamStateError::SolverFindingsLimit {
                    limit,
                    found: objects.len(),
                });
            }
        }

        let mut result = AggregateResult::default();
        let mut iterations = 0usize;
        for object in objects {
            let table = self.solve_object(program, object, cancel, started, &mut iterations)?;
            result.insert(object, table);
        }

        result.stats.iterations = iterations;
        result.stats.tracked_objects = result.instance_count();
        result.stats.visited_points = result
            .tracked_objects()
            .filter_map(|o| result.instance_result(o))
            .map(|t| t.len())
            .sum();
        result.stats.solve_time_ms = started.elapsed().as_millis() as u64;
        Ok(result)
    }

    fn solve_object<C, H, P, S>(
        &self,
        program: &WholeProgram<C, H, P, S>,
        object: AbstractObject,
        cancel: &CancellationToken,
        started: Instant,
        iterations: &mut usize,
    ) -> Result<InstanceResult>
    where
        C: CallGraph,
        H: ClassHierarchy,
        P: PointsToAnalysis,
        S: ExplodedSupergraph,
    {
        let creation = program.points_to.creation_site(&object).ok_or_else(|| {
            StreamStateError::SolverMisconfigured(format!("no creation site for {object}"))
        })?;
        let creation_point = program.supergraph.creation_point(&creation).ok_or_else(|| {
            StreamStateError::SolverMisconfigured(format!(
                "creation site {creation} outside the supergraph"
            ))
        })?;

        let mut table = InstanceResult::default();
        table
            .fact_mut(&creation_point)
            .join(&FlowFact::singleton(self.automaton.initial_state()));

        let mut worklist: VecDeque<ProgramPoint> = VecDeque::new();
        worklist.push_back(creation_point.clone());

        while let Some(point) = worklist.pop_front() {
            if cancel.is_cancelled() {
                return Err(StreamStateError::SolverCancelled);
            }
            if let Some(timeout) = self.options.timeout {
                if started.elapsed() >= timeout {
                    return Err(StreamStateError::SolverTimeout {
                        elapsed_ms: started.elapsed().as_millis() as u64,
                    });
                }
            }
            *iterations += 1;
            if *iterations > self.options.max_iterations {
                return Err(StreamStateError::SolverMisconfigured(format!(
                    "fixpoint exceeded {} iterations",
                    self.options.max_iterations
                )));
            }

            let fact_in = table
                .fact_at(&point)
                .cloned()
                .unwrap_or_default();
            // Call sites before the instantiation belong to a previous
            // lifetime of the block and are skipped.
            let skip_before = (point == creation_point).then_some(creation.index);
            let fact_out = self.transfer(program, &point, &fact_in, object, skip_before)?;

            for successor in program.supergraph.successors(&point) {
                if table.fact_mut(&successor).join(&fact_out) && !worklist.contains(&successor) {
                    worklist.push_back(successor);
                }
            }
        }

        Ok(table)
    }

    fn transfer<C, H, P, S>(
        &self,
        program: &WholeProgram<C, H, P, S>,
        point: &ProgramPoint,
        fact_in: &FlowFact,
        object: AbstractObject,
        skip_before: Option<usize>,
    ) -> Result<FlowFact>
    where
        C: CallGraph,
        H: ClassHierarchy,
        P: PointsToAnalysis,
        S: ExplodedSupergraph,
    {
        let mut states = fact_in.clone();
        for site in program.supergraph.call_sites(point) {
            if let Some(creation_index) = skip_before {
                if site.index < creation_index {
                    continue;
                }
            }
            if !program
                .points_to
                .objects_of_var(&site.receiver)
                .contains(&object)
            {
                continue;
            }
            if let Some(event) = self.automaton.recognize(&site.signature) {
                let mut next = FlowFact::empty();
                for state in states.iter() {
                    next.insert(self.automaton.step(state, event)?);
                }
                tracing::debug!(
                    "{object} at {point}[{}]: event '{event}' -> {next}",
                    site.index
                );
                states = next;
            }
        }
        Ok(states)
    }
}
