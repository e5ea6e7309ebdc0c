/*
 * Shared Models
 *
 * Identifiers exchanged with the external whole-program engine. The core
 * treats them as opaque keys: equality, hashing, and display only.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference to a named type in the analyzed program.
///
/// The name is whatever the engine's class hierarchy uses, e.g.
/// `java/util/stream/Stream`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeRef {
    pub name: String,
}

impl TypeRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Reference to a method in the analyzed program.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MethodRef {
    pub signature: String,
}

impl MethodRef {
    pub fn new(signature: impl Into<String>) -> Self {
        Self {
            signature: signature.into(),
        }
    }
}

impl fmt::Display for MethodRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.signature)
    }
}

/// A single instruction, identified by its enclosing method, basic block,
/// and statement index within that block.
///
/// Used to designate the instantiation instruction of the tracked pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstructionRef {
    pub method: MethodRef,
    pub block: u32,
    pub index: usize,
}

impl InstructionRef {
    pub fn new(method: MethodRef, block: u32, index: usize) -> Self {
        Self {
            method,
            block,
            index,
        }
    }
}

impl fmt::Display for InstructionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:bb{}:{}", self.method, self.block, self.index)
    }
}

/// Opaque may-alias class of concrete runtime objects, as produced by the
/// points-to analysis. The core never constructs these on its own.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct AbstractObject {
    pub id: u32,
}

impl AbstractObject {
    pub fn new(id: u32) -> Self {
        Self { id }
    }
}

impl fmt::Display for AbstractObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "obj#{}", self.id)
    }
}

/// One node of the call graph: a method in some calling context.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CallGraphNode {
    pub id: u32,
    pub method: MethodRef,
}

impl CallGraphNode {
    pub fn new(id: u32, method: MethodRef) -> Self {
        Self { id, method }
    }
}

impl fmt::Display for CallGraphNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.method, self.id)
    }
}

/// Node of the exploded supergraph: one basic block of one method.
///
/// Flow facts are recorded at block entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProgramPoint {
    pub method: MethodRef,
    pub block: u32,
}

impl ProgramPoint {
    pub fn new(method: MethodRef, block: u32) -> Self {
        Self { method, block }
    }
}

impl fmt::Display for ProgramPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@bb{}", self.method, self.block)
    }
}

/// A method-local variable, as named by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VarRef {
    pub method: MethodRef,
    pub name: String,
}

impl VarRef {
    pub fn new(method: MethodRef, name: impl Into<String>) -> Self {
        Self {
            method,
            name: name.into(),
        }
    }
}

impl fmt::Display for VarRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.method, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instruction_display() {
        let instr = InstructionRef::new(MethodRef::new("A.main()V"), 0, 2);
        assert_eq!(instr.to_string(), "A.main()V:bb0:2");
    }

    #[test]
    fn test_program_point_identity() {
        let p1 = ProgramPoint::new(MethodRef::new("A.main()V"), 1);
        let p2 = ProgramPoint::new(MethodRef::new("A.main()V"), 1);
        let p3 = ProgramPoint::new(MethodRef::new("A.main()V"), 2);

        assert_eq!(p1, p2);
        assert_ne!(p1, p3);
        assert_eq!(p1.to_string(), "A.main()V@bb1");
    }

    #[test]
    fn test_abstract_object_is_opaque_key() {
        let a = AbstractObject::new(7);
        let b = AbstractObject::new(7);
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "obj#7");
    }
}
