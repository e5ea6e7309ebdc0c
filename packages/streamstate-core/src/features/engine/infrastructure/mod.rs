/*
 * Engine Infrastructure
 *
 * Minimal substitute for the external whole-program engine, exposing
 * exactly the port contracts.
 */

pub mod simple_engine;
pub mod simple_program;

pub use simple_engine::{
    SimpleCallGraph, SimpleClassHierarchy, SimpleEngine, SimplePointsTo, SimpleSupergraph,
};
pub use simple_program::{SimpleBlock, SimpleMethod, SimpleProgram, SimpleStatement};
