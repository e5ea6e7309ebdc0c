/*
 * Simple Engine
 *
 * Substitute whole-program engine over the SimpleProgram model. One
 * `build_call_graph` call derives:
 * - a context-insensitive call graph (one node per reachable method)
 * - a transitive class hierarchy
 * - flow-insensitive allocation-site points-to facts (assignment and
 *   argument copies propagated to fixpoint)
 * - an exploded supergraph at basic-block granularity with call and
 *   return edges
 */

use super::simple_program::{SimpleProgram, SimpleStatement};
use crate::errors::{Result, StreamStateError};
use crate::features::engine::ports::{
    AnalysisEngine, CallGraph, CallSite, ClassHierarchy, ExplodedSupergraph, PointsToAnalysis,
    WholeProgram,
};
use crate::shared::cancellation::CancellationToken;
use crate::shared::models::{
    AbstractObject, CallGraphNode, InstructionRef, MethodRef, ProgramPoint, TypeRef, VarRef,
};
use petgraph::graphmap::DiGraphMap;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;

pub struct SimpleEngine {
    program: SimpleProgram,
}

impl SimpleEngine {
    pub fn new(program: SimpleProgram) -> Self {
        Self { program }
    }
}

/// Context-insensitive call graph: one node per reachable method.
#[derive(Debug)]
pub struct SimpleCallGraph {
    nodes: FxHashMap<MethodRef, CallGraphNode>,
    edges: DiGraphMap<u32, ()>,
}

impl SimpleCallGraph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.edge_count()
    }
}

impl CallGraph for SimpleCallGraph {
    fn contains_method(&self, method: &MethodRef) -> bool {
        self.nodes.contains_key(method)
    }

    fn nodes_of(&self, method: &MethodRef) -> Vec<CallGraphNode> {
        self.nodes.get(method).cloned().into_iter().collect()
    }
}

/// Transitively closed class hierarchy.
#[derive(Debug)]
pub struct SimpleClassHierarchy {
    supertypes: FxHashMap<TypeRef, Vec<TypeRef>>,
}

impl ClassHierarchy for SimpleClassHierarchy {
    fn lookup_class(&self, type_ref: &TypeRef) -> Option<TypeRef> {
        self.supertypes.get(type_ref).map(|_| type_ref.clone())
    }

    fn supertypes(&self, type_ref: &TypeRef) -> Vec<TypeRef> {
        self.supertypes.get(type_ref).cloned().unwrap_or_default()
    }
}

/// Flow-insensitive allocation-site points-to facts.
#[derive(Debug)]
pub struct SimplePointsTo {
    /// Object -> (declared type, allocation instruction).
    objects: FxHashMap<AbstractObject, (TypeRef, InstructionRef)>,
    var_objects: FxHashMap<VarRef, FxHashSet<AbstractObject>>,
    supertypes: FxHashMap<TypeRef, Vec<TypeRef>>,
}

impl PointsToAnalysis for SimplePointsTo {
    fn objects_of(&self, type_ref: &TypeRef) -> FxHashSet<AbstractObject> {
        self.objects
            .iter()
            .filter(|(_, (declared, _))| {
                declared == type_ref
                    || self
                        .supertypes
                        .get(declared)
                        .is_some_and(|supers| supers.contains(type_ref))
            })
            .map(|(object, _)| *object)
            .collect()
    }

    fn objects_of_var(&self, var: &VarRef) -> FxHashSet<AbstractObject> {
        self.var_objects.get(var).cloned().unwrap_or_default()
    }

    fn creation_site(&self, object: &AbstractObject) -> Option<InstructionRef> {
        self.objects.get(object).map(|(_, site)| site.clone())
    }

    fn produced_by(&self, object: &AbstractObject, instruction: &InstructionRef) -> bool {
        self.creation_site(object).as_ref() == Some(instruction)
    }
}

/// Exploded supergraph with intra-method, call, and return edges.
#[derive(Debug)]
pub struct SimpleSupergraph {
    points: FxHashSet<ProgramPoint>,
    successors: FxHashMap<ProgramPoint, Vec<ProgramPoint>>,
    call_sites: FxHashMap<ProgramPoint, Vec<CallSite>>,
    creation_points: FxHashMap<InstructionRef, ProgramPoint>,
}

impl ExplodedSupergraph for SimpleSupergraph {
    fn node_for(&self, node: &CallGraphNode, block_index: u32) -> Option<ProgramPoint> {
        let point = ProgramPoint::new(node.method.clone(), block_index);
        self.points.contains(&point).then_some(point)
    }

    fn successors(&self, point: &ProgramPoint) -> Vec<ProgramPoint> {
        self.successors.get(point).cloned().unwrap_or_default()
    }

    fn call_sites(&self, point: &ProgramPoint) -> Vec<CallSite> {
        self.call_sites.get(point).cloned().unwrap_or_default()
    }

    fn creation_point(&self, instruction: &InstructionRef) -> Option<ProgramPoint> {
        self.creation_points.get(instruction).cloned()
    }
}

impl AnalysisEngine for SimpleEngine {
    type Cg = SimpleCallGraph;
    type Cha = SimpleClassHierarchy;
    type Pta = SimplePointsTo;
    type Sg = SimpleSupergraph;

    fn build_call_graph(
        &self,
        entry_points: &[MethodRef],
        cancel: &CancellationToken,
    ) -> Result<WholeProgram<Self::Cg, Self::Cha, Self::Pta, Self::Sg>> {
        if cancel.is_cancelled() {
            return Err(StreamStateError::EngineCancelled);
        }

        let reachable = self.reachable_methods(entry_points, cancel)?;
        let call_graph = self.derive_call_graph(&reachable);
        let class_hierarchy = self.derive_class_hierarchy();
        let points_to = self.derive_points_to(&reachable, &class_hierarchy);
        let supergraph = self.derive_supergraph(&reachable)?;

        tracing::info!(
            "call graph built: {} nodes, {} edges, {} objects",
            call_graph.node_count(),
            call_graph.edge_count(),
            points_to.objects.len()
        );

        Ok(WholeProgram {
            call_graph,
            class_hierarchy,
            points_to,
            supergraph,
        })
    }
}

impl SimpleEngine {
    /// Methods reachable from the entry points, in discovery order.
    fn reachable_methods(
        &self,
        entry_points: &[MethodRef],
        cancel: &CancellationToken,
    ) -> Result<Vec<MethodRef>> {
        let mut order = Vec::new();
        let mut seen = FxHashSet::default();
        let mut worklist: VecDeque<MethodRef> = VecDeque::new();

        for entry in entry_points {
            if self.program.method(entry).is_none() {
                return Err(StreamStateError::EngineBuild(format!(
                    "entry point {entry} not in program"
                )));
            }
            if seen.insert(entry.clone()) {
                worklist.push_back(entry.clone());
            }
        }

        while let Some(method) = worklist.pop_front() {
            if cancel.is_cancelled() {
                return Err(StreamStateError::EngineCancelled);
            }
            order.push(method.clone());

            let Some(body) = self.program.method(&method) else {
                continue;
            };
            for block in &body.blocks {
                for statement in &block.statements {
                    if let SimpleStatement::Invoke { callee, .. } = statement {
                        if self.program.method(callee).is_some() && seen.insert(callee.clone()) {
                            worklist.push_back(callee.clone());
                        }
                    }
                }
            }
        }

        Ok(order)
    }

    fn derive_call_graph(&self, reachable: &[MethodRef]) -> SimpleCallGraph {
        let mut nodes = FxHashMap::default();
        for (id, method) in reachable.iter().enumerate() {
            nodes.insert(
                method.clone(),
                CallGraphNode::new(id as u32, method.clone()),
            );
        }

        let mut edges = DiGraphMap::new();
        for method in reachable {
            let caller = nodes[method].id;
            edges.add_node(caller);
            let Some(body) = self.program.method(method) else {
                continue;
            };
            for block in &body.blocks {
                for statement in &block.statements {
                    if let SimpleStatement::Invoke { callee, .. } = statement {
                        if let Some(target) = nodes.get(callee) {
                            edges.add_edge(caller, target.id, ());
                        }
                    }
                }
            }
        }

        SimpleCallGraph { nodes, edges }
    }

    fn derive_class_hierarchy(&self) -> SimpleClassHierarchy {
        let mut closed = FxHashMap::default();
        for type_ref in self.program.hierarchy.keys() {
            let mut supers = Vec::new();
            let mut stack: Vec<TypeRef> = self
                .program
                .hierarchy
                .get(type_ref)
                .cloned()
                .unwrap_or_default();
            while let Some(supertype) = stack.pop() {
                if supers.contains(&supertype) {
                    continue;
                }
                if let Some(parents) = self.program.hierarchy.get(&supertype) {
                    stack.extend(parents.iter().cloned());
                }
                supers.push(supertype);
            }
            supers.sort();
            closed.insert(type_ref.clone(), supers);
        }
        SimpleClassHierarchy { supertypes: closed }
    }

    fn derive_points_to(
        &self,
        reachable: &[MethodRef],
        hierarchy: &SimpleClassHierarchy,
    ) -> SimplePointsTo {
        let mut objects = FxHashMap::default();
        let mut var_objects: FxHashMap<VarRef, FxHashSet<AbstractObject>> = FxHashMap::default();
        let mut next_id = 1u32;

        // Allocation sites seed the variable sets.
        for method in reachable {
            let Some(body) = self.program.method(method) else {
                continue;
            };
            for block in &body.blocks {
                for (index, statement) in block.statements.iter().enumerate() {
                    if let SimpleStatement::NewPipeline { var, type_ref } = statement {
                        let object = AbstractObject::new(next_id);
                        next_id += 1;
                        let site = InstructionRef::new(method.clone(), block.index, index);
                        tracing::debug!("allocation {object} of {type_ref} at {site}");
                        objects.insert(object, (type_ref.clone(), site));
                        var_objects
                            .entry(VarRef::new(method.clone(), var.clone()))
                            .or_default()
                            .insert(object);
                    }
                }
            }
        }

        // Copy edges from assignments and invoke arguments, to fixpoint.
        let mut copies: Vec<(VarRef, VarRef)> = Vec::new();
        for method in reachable {
            let Some(body) = self.program.method(method) else {
                continue;
            };
            for block in &body.blocks {
                for statement in &block.statements {
                    match statement {
                        SimpleStatement::Assign { lhs, rhs } => copies.push((
                            VarRef::new(method.clone(), lhs.clone()),
                            VarRef::new(method.clone(), rhs.clone()),
                        )),
                        SimpleStatement::Invoke { callee, args } => {
                            for (caller_var, callee_param) in args {
                                copies.push((
                                    VarRef::new(callee.clone(), callee_param.clone()),
                                    VarRef::new(method.clone(), caller_var.clone()),
                                ));
                            }
                        }
                        _ => {}
                    }
                }
            }
        }

        let mut changed = true;
        while changed {
            changed = false;
            for (target, source) in &copies {
                let incoming = var_objects.get(source).cloned().unwrap_or_default();
                if incoming.is_empty() {
                    continue;
                }
                let set = var_objects.entry(target.clone()).or_default();
                let before = set.len();
                set.extend(incoming);
                changed |= set.len() > before;
            }
        }

        SimplePointsTo {
            objects,
            var_objects,
            supertypes: hierarchy.supertypes.clone(),
        }
    }

    fn derive_supergraph(&self, reachable: &[MethodRef]) -> Result<SimpleSupergraph> {
        let mut points = FxHashSet::default();
        let mut successors: FxHashMap<ProgramPoint, Vec<ProgramPoint>> = FxHashMap::default();
        let mut call_sites: FxHashMap<ProgramPoint, Vec<CallSite>> = FxHashMap::default();
        let mut creation_points = FxHashMap::default();
        let reachable_set: FxHashSet<&MethodRef> = reachable.iter().collect();

        for method in reachable {
            let Some(body) = self.program.method(method) else {
                continue;
            };
            for block in &body.blocks {
                let point = ProgramPoint::new(method.clone(), block.index);
                points.insert(point.clone());

                let mut sites = Vec::new();
                let mut invoked: Option<&MethodRef> = None;
                for (index, statement) in block.statements.iter().enumerate() {
                    match statement {
                        SimpleStatement::Call {
                            receiver,
                            signature,
                        } => sites.push(CallSite {
                            index,
                            signature: signature.clone(),
                            receiver: VarRef::new(method.clone(), receiver.clone()),
                        }),
                        SimpleStatement::NewPipeline { .. } => {
                            creation_points.insert(
                                InstructionRef::new(method.clone(), block.index, index),
                                point.clone(),
                            );
                        }
                        SimpleStatement::Invoke { callee, .. }
                            if reachable_set.contains(callee) =>
                        {
                            if index != block.statements.len() - 1 {
                                return Err(StreamStateError::EngineBuild(format!(
                                    "invoke of {callee} must end block {point}"
                                )));
                            }
                            invoked = Some(callee);
                        }
                        _ => {}
                    }
                }
                call_sites.insert(point.clone(), sites);

                let intra: Vec<ProgramPoint> = body
                    .intra_successors(block.index)
                    .into_iter()
                    .map(|b| ProgramPoint::new(method.clone(), b))
                    .collect();

                match invoked {
                    None => {
                        successors.entry(point).or_default().extend(intra);
                    }
                    Some(callee) => {
                        // Call edge into the callee; return edges from its
                        // exit blocks to this block's intra successors.
                        let Some(callee_body) = self.program.method(callee) else {
                            continue;
                        };
                        if let Some(entry) = callee_body.entry_block() {
                            successors
                                .entry(point)
                                .or_default()
                                .push(ProgramPoint::new(callee.clone(), entry));
                        }
                        for exit in callee_body.exit_blocks() {
                            successors
                                .entry(ProgramPoint::new(callee.clone(), exit))
                                .or_default()
                                .extend(intra.iter().cloned());
                        }
                    }
                }
            }
        }

        Ok(SimpleSupergraph {
            points,
            successors,
            call_sites,
            creation_points,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::simple_program::{SimpleMethod, SimpleStatement};
    use super::*;
    use pretty_assertions::assert_eq;

    fn stream_type() -> TypeRef {
        TypeRef::new("java/util/stream/Stream")
    }

    fn base_type() -> TypeRef {
        TypeRef::new("java/util/stream/BaseStream")
    }

    fn two_method_program() -> SimpleProgram {
        let mut program = SimpleProgram::new();
        program.add_class(stream_type(), vec![base_type()]);
        program.add_method(
            SimpleMethod::new("A.main()V")
                .block(
                    0,
                    vec![
                        SimpleStatement::NewPipeline {
                            var: "s".into(),
                            type_ref: stream_type(),
                        },
                        SimpleStatement::Invoke {
                            callee: MethodRef::new("A.helper(S)V"),
                            args: vec![("s".into(), "p".into())],
                        },
                    ],
                )
                .block(1, vec![SimpleStatement::Return])
                .edge(0, 1),
        );
        program.add_method(SimpleMethod::new("A.helper(S)V").block(
            0,
            vec![
                SimpleStatement::Call {
                    receiver: "p".into(),
                    signature: "S.parallel()".into(),
                },
                SimpleStatement::Return,
            ],
        ));
        program
    }

    #[test]
    fn test_unknown_entry_point_fails_the_build() {
        let engine = SimpleEngine::new(SimpleProgram::new());
        let err = engine
            .build_call_graph(&[MethodRef::new("missing()V")], &CancellationToken::new())
            .unwrap_err();
        assert!(matches!(err, StreamStateError::EngineBuild(_)));
    }

    #[test]
    fn test_cancelled_token_stops_the_build() {
        let engine = SimpleEngine::new(two_method_program());
        let token = CancellationToken::new();
        token.cancel();

        let err = engine
            .build_call_graph(&[MethodRef::new("A.main()V")], &token)
            .unwrap_err();
        assert!(matches!(err, StreamStateError::EngineCancelled));
    }

    #[test]
    fn test_call_graph_covers_reachable_methods() {
        let engine = SimpleEngine::new(two_method_program());
        let program = engine
            .build_call_graph(&[MethodRef::new("A.main()V")], &CancellationToken::new())
            .unwrap();

        assert!(program.call_graph.contains_method(&MethodRef::new("A.main()V")));
        assert!(program
            .call_graph
            .contains_method(&MethodRef::new("A.helper(S)V")));
        assert_eq!(program.call_graph.node_count(), 2);
        assert_eq!(program.call_graph.edge_count(), 1);
    }

    #[test]
    fn test_points_to_propagates_through_invoke_args() {
        let engine = SimpleEngine::new(two_method_program());
        let program = engine
            .build_call_graph(&[MethodRef::new("A.main()V")], &CancellationToken::new())
            .unwrap();

        let in_main = program
            .points_to
            .objects_of_var(&VarRef::new(MethodRef::new("A.main()V"), "s"));
        let in_helper = program
            .points_to
            .objects_of_var(&VarRef::new(MethodRef::new("A.helper(S)V"), "p"));

        assert_eq!(in_main.len(), 1);
        assert_eq!(in_main, in_helper);
    }

    #[test]
    fn test_objects_of_matches_supertypes() {
        let engine = SimpleEngine::new(two_method_program());
        let program = engine
            .build_call_graph(&[MethodRef::new("A.main()V")], &CancellationToken::new())
            .unwrap();

        assert_eq!(program.points_to.objects_of(&stream_type()).len(), 1);
        assert_eq!(program.points_to.objects_of(&base_type()).len(), 1);
        assert!(program
            .points_to
            .objects_of(&TypeRef::new("java/lang/Object"))
            .is_empty());
    }

    #[test]
    fn test_produced_by_identifies_the_allocation() {
        let engine = SimpleEngine::new(two_method_program());
        let program = engine
            .build_call_graph(&[MethodRef::new("A.main()V")], &CancellationToken::new())
            .unwrap();

        let object = *program
            .points_to
            .objects_of(&stream_type())
            .iter()
            .next()
            .unwrap();
        let creation = InstructionRef::new(MethodRef::new("A.main()V"), 0, 0);
        let elsewhere = InstructionRef::new(MethodRef::new("A.main()V"), 0, 1);

        assert!(program.points_to.produced_by(&object, &creation));
        assert!(!program.points_to.produced_by(&object, &elsewhere));
    }

    #[test]
    fn test_supergraph_routes_flow_through_the_callee() {
        let engine = SimpleEngine::new(two_method_program());
        let program = engine
            .build_call_graph(&[MethodRef::new("A.main()V")], &CancellationToken::new())
            .unwrap();

        let main = MethodRef::new("A.main()V");
        let helper = MethodRef::new("A.helper(S)V");

        // Invoke block flows into the callee entry, not past it.
        assert_eq!(
            program
                .supergraph
                .successors(&ProgramPoint::new(main.clone(), 0)),
            vec![ProgramPoint::new(helper.clone(), 0)]
        );
        // Callee exit returns to the invoke block's intra successor.
        assert_eq!(
            program.supergraph.successors(&ProgramPoint::new(helper, 0)),
            vec![ProgramPoint::new(main.clone(), 1)]
        );
    }

    #[test]
    fn test_invoke_not_ending_its_block_fails_the_build() {
        let mut program = SimpleProgram::new();
        program.add_class(stream_type(), vec![base_type()]);
        program.add_method(
            SimpleMethod::new("A.main()V").block(
                0,
                vec![
                    SimpleStatement::NewPipeline {
                        var: "s".into(),
                        type_ref: stream_type(),
                    },
                    SimpleStatement::Invoke {
                        callee: MethodRef::new("A.helper(S)V"),
                        args: vec![("s".into(), "p".into())],
                    },
                    SimpleStatement::Call {
                        receiver: "s".into(),
                        signature: "S.parallel()".into(),
                    },
                ],
            ),
        );
        program.add_method(
            SimpleMethod::new("A.helper(S)V").block(0, vec![SimpleStatement::Return]),
        );

        let engine = SimpleEngine::new(program);
        let err = engine
            .build_call_graph(&[MethodRef::new("A.main()V")], &CancellationToken::new())
            .unwrap_err();
        assert!(matches!(err, StreamStateError::EngineBuild(_)));
    }

    #[test]
    fn test_creation_point_lookup() {
        let engine = SimpleEngine::new(two_method_program());
        let program = engine
            .build_call_graph(&[MethodRef::new("A.main()V")], &CancellationToken::new())
            .unwrap();

        let main = MethodRef::new("A.main()V");
        let creation = InstructionRef::new(main.clone(), 0, 0);
        assert_eq!(
            program.supergraph.creation_point(&creation),
            Some(ProgramPoint::new(main, 0))
        );
    }
}
