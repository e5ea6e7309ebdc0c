/*
 * Whole-Program Engine
 *
 * - Ports: contracts the core consumes (call graph, class hierarchy,
 *   points-to facts, exploded supergraph)
 * - Infrastructure: SimpleEngine, a minimal substitute implementation
 */

pub mod infrastructure;
pub mod ports;

pub use infrastructure::{SimpleEngine, SimpleMethod, SimpleProgram, SimpleStatement};
pub use ports::{
    AnalysisEngine, CallGraph, CallSite, ClassHierarchy, ExplodedSupergraph, PointsToAnalysis,
    WholeProgram,
};
