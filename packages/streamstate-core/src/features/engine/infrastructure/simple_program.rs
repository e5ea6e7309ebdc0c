/*
 * Simple Program Model
 *
 * Minimal whole-program representation used to drive the analysis
 * without binding a full external engine: methods made of basic blocks
 * with explicit intra-method edges, five statement forms, and a declared
 * class hierarchy.
 *
 * Conventions:
 * - `Invoke` must be the last statement of its block. Control flows into
 *   the callee entry block; return edges connect callee exit blocks to
 *   the invoke block's intra-method successors.
 * - Variable names are method-local. `Invoke` argument pairs copy caller
 *   variables into callee parameters.
 */

use crate::shared::models::{MethodRef, TypeRef};
use rustc_hash::FxHashMap;

/// Statement forms the substitute engine understands.
#[derive(Debug, Clone)]
pub enum SimpleStatement {
    /// Allocation of a tracked pipeline object.
    NewPipeline { var: String, type_ref: TypeRef },

    /// Instance call; `signature` is what the event recognizer sees.
    Call { receiver: String, signature: String },

    /// Static call to another method, copying `(caller_var, callee_param)`
    /// pairs.
    Invoke {
        callee: MethodRef,
        args: Vec<(String, String)>,
    },

    /// Variable copy.
    Assign { lhs: String, rhs: String },

    Return,
}

#[derive(Debug, Clone)]
pub struct SimpleBlock {
    pub index: u32,
    pub statements: Vec<SimpleStatement>,
}

#[derive(Debug, Clone)]
pub struct SimpleMethod {
    pub method: MethodRef,
    pub blocks: Vec<SimpleBlock>,
    /// Intra-method edges between block indices.
    pub edges: Vec<(u32, u32)>,
}

impl SimpleMethod {
    pub fn new(signature: impl Into<String>) -> Self {
        Self {
            method: MethodRef::new(signature),
            blocks: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn block(mut self, index: u32, statements: Vec<SimpleStatement>) -> Self {
        self.blocks.push(SimpleBlock { index, statements });
        self
    }

    pub fn edge(mut self, from: u32, to: u32) -> Self {
        self.edges.push((from, to));
        self
    }

    /// Entry block: the first declared block.
    pub(crate) fn entry_block(&self) -> Option<u32> {
        self.blocks.first().map(|b| b.index)
    }

    pub(crate) fn intra_successors(&self, block: u32) -> Vec<u32> {
        self.edges
            .iter()
            .filter(|(from, _)| *from == block)
            .map(|(_, to)| *to)
            .collect()
    }

    /// Exit blocks: blocks with no intra-method successors or an explicit
    /// `Return`.
    pub(crate) fn exit_blocks(&self) -> Vec<u32> {
        self.blocks
            .iter()
            .filter(|b| {
                self.intra_successors(b.index).is_empty()
                    || b.statements
                        .iter()
                        .any(|s| matches!(s, SimpleStatement::Return))
            })
            .map(|b| b.index)
            .collect()
    }
}

/// A whole program: methods plus a declared class hierarchy.
#[derive(Debug, Clone, Default)]
pub struct SimpleProgram {
    pub(crate) methods: FxHashMap<MethodRef, SimpleMethod>,
    /// Type -> direct supertypes.
    pub(crate) hierarchy: FxHashMap<TypeRef, Vec<TypeRef>>,
}

impl SimpleProgram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_method(&mut self, method: SimpleMethod) {
        self.methods.insert(method.method.clone(), method);
    }

    /// Declare a class with its direct supertypes. Supertypes without
    /// their own declaration are treated as root types.
    pub fn add_class(&mut self, type_ref: TypeRef, supertypes: Vec<TypeRef>) {
        for supertype in &supertypes {
            self.hierarchy.entry(supertype.clone()).or_default();
        }
        self.hierarchy.insert(type_ref, supertypes);
    }

    pub(crate) fn method(&self, method: &MethodRef) -> Option<&SimpleMethod> {
        self.methods.get(method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_blocks() {
        let method = SimpleMethod::new("A.m()V")
            .block(0, vec![])
            .block(1, vec![SimpleStatement::Return])
            .block(2, vec![])
            .edge(0, 1)
            .edge(1, 2);

        // Block 1 returns, block 2 has no successors.
        assert_eq!(method.exit_blocks(), vec![1, 2]);
    }

    #[test]
    fn test_class_declaration_registers_supertypes() {
        let mut program = SimpleProgram::new();
        let stream = TypeRef::new("java/util/stream/Stream");
        let base = TypeRef::new("java/util/stream/BaseStream");

        program.add_class(stream.clone(), vec![base.clone()]);

        assert!(program.hierarchy.contains_key(&stream));
        assert!(program.hierarchy.contains_key(&base));
    }
}
