/*
 * Engine Ports
 *
 * Contracts onto the external whole-program analysis engine. The core
 * consumes exactly these; it does not rebuild call graphs or points-to
 * facts. A minimal substitute implementation lives in the sibling
 * infrastructure module.
 */

use crate::errors::Result;
use crate::shared::cancellation::CancellationToken;
use crate::shared::models::{
    AbstractObject, CallGraphNode, InstructionRef, MethodRef, ProgramPoint, TypeRef, VarRef,
};
use rustc_hash::FxHashSet;

/// One call instruction inside a supergraph block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    /// Statement index within the block.
    pub index: usize,

    /// Textual signature the event recognizer matches against.
    pub signature: String,

    /// Receiver variable of the call.
    pub receiver: VarRef,
}

/// Call graph over a chosen entry-point set.
pub trait CallGraph: Send + Sync {
    fn contains_method(&self, method: &MethodRef) -> bool;

    /// All nodes (calling contexts) of a method. Empty if unreachable.
    fn nodes_of(&self, method: &MethodRef) -> Vec<CallGraphNode>;
}

/// Class hierarchy of the analyzed program.
pub trait ClassHierarchy: Send + Sync {
    /// Canonical form of a type, or None if unknown to the hierarchy.
    fn lookup_class(&self, type_ref: &TypeRef) -> Option<TypeRef>;

    /// Transitive supertypes, excluding the type itself.
    fn supertypes(&self, type_ref: &TypeRef) -> Vec<TypeRef>;

    /// True if `type_ref` is `base` or has `base` among its supertypes.
    fn implements(&self, type_ref: &TypeRef, base: &TypeRef) -> bool {
        type_ref == base || self.supertypes(type_ref).contains(base)
    }
}

/// Points-to facts computed alongside the call graph.
pub trait PointsToAnalysis: Send + Sync {
    /// All abstract objects whose inferred type is `type_ref`.
    fn objects_of(&self, type_ref: &TypeRef) -> FxHashSet<AbstractObject>;

    /// Objects a variable may reference.
    fn objects_of_var(&self, var: &VarRef) -> FxHashSet<AbstractObject>;

    /// Allocation instruction of an abstract object.
    fn creation_site(&self, object: &AbstractObject) -> Option<InstructionRef>;

    /// True if `object` was produced by `instruction`.
    fn produced_by(&self, object: &AbstractObject, instruction: &InstructionRef) -> bool;
}

/// Exploded control-flow supergraph at basic-block granularity.
pub trait ExplodedSupergraph: Send + Sync {
    /// Supergraph node for a call-graph node and local block index.
    fn node_for(&self, node: &CallGraphNode, block_index: u32) -> Option<ProgramPoint>;

    /// Forward successors: intra-method, call, and return edges.
    fn successors(&self, point: &ProgramPoint) -> Vec<ProgramPoint>;

    /// Call instructions inside the block, in statement order.
    fn call_sites(&self, point: &ProgramPoint) -> Vec<CallSite>;

    /// Supergraph node containing an instantiation instruction.
    fn creation_point(&self, instruction: &InstructionRef) -> Option<ProgramPoint>;
}

/// Result bundle of one call-graph construction.
#[derive(Debug)]
pub struct WholeProgram<C, H, P, S> {
    pub call_graph: C,
    pub class_hierarchy: H,
    pub points_to: P,
    pub supergraph: S,
}

/// External whole-program engine entry point.
///
/// One `build_call_graph` call per analysis run; the bundle it returns
/// is read-only for the rest of the run.
pub trait AnalysisEngine: Send + Sync {
    type Cg: CallGraph;
    type Cha: ClassHierarchy;
    type Pta: PointsToAnalysis;
    type Sg: ExplodedSupergraph;

    /// Build the call graph, class hierarchy, points-to facts, and
    /// exploded supergraph for the given entry points.
    fn build_call_graph(
        &self,
        entry_points: &[MethodRef],
        cancel: &CancellationToken,
    ) -> Result<WholeProgram<Self::Cg, Self::Cha, Self::Pta, Self::Sg>>;
}
