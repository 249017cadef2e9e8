//! Per-evaluation mutable state.
//!
//! The compiled evaluator tree is read-only. Everything an evaluation needs
//! to remember (resolved dynamic types, operator bindings, resolved
//! builtins) lives here, keyed by node id. Callers reuse one state across
//! records for the caching to pay off, and reset it whenever the kinds of
//! the scope bindings may have changed.

use std::sync::Arc;

use hashbrown::HashMap;

use crate::eval::dispatch::OpEntry;
use crate::eval::func::{BuiltinFn, FunctionRegistry};
use crate::value::ValueType;

/// Identity of an evaluator node, assigned at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(pub(crate) u32);

/// A binary node's memoised operator binding. Only a type transition on
/// either operand triggers a table relookup.
#[derive(Clone, Copy)]
pub(crate) struct BoundOperator {
    pub(crate) signature: (ValueType, ValueType),
    pub(crate) entry: &'static OpEntry,
}

pub struct ExecutionState {
    functions: Arc<FunctionRegistry>,
    types: HashMap<NodeId, ValueType>,
    bindings: HashMap<NodeId, BoundOperator>,
    resolved: HashMap<NodeId, Arc<dyn BuiltinFn>>,
}

impl ExecutionState {
    pub fn new(functions: Arc<FunctionRegistry>) -> Self {
        ExecutionState {
            functions,
            types: HashMap::new(),
            bindings: HashMap::new(),
            resolved: HashMap::new(),
        }
    }

    /// Drop every cached type, binding and resolved builtin. Required when
    /// the kinds of scope bindings may have changed since the last
    /// evaluation.
    pub fn reset(&mut self) {
        self.types.clear();
        self.bindings.clear();
        self.resolved.clear();
    }

    pub(crate) fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    pub(crate) fn cached_type(&self, id: NodeId) -> Option<ValueType> {
        self.types.get(&id).copied()
    }

    pub(crate) fn cache_type(&mut self, id: NodeId, ty: ValueType) {
        self.types.insert(id, ty);
    }

    pub(crate) fn binding(&self, id: NodeId) -> Option<BoundOperator> {
        self.bindings.get(&id).copied()
    }

    pub(crate) fn cache_binding(
        &mut self,
        id: NodeId,
        signature: (ValueType, ValueType),
        entry: &'static OpEntry,
    ) {
        self.bindings.insert(id, BoundOperator { signature, entry });
    }

    pub(crate) fn resolved_fn(&self, id: NodeId) -> Option<Arc<dyn BuiltinFn>> {
        self.resolved.get(&id).cloned()
    }

    pub(crate) fn cache_resolved_fn(&mut self, id: NodeId, f: Arc<dyn BuiltinFn>) {
        self.resolved.insert(id, f);
    }
}

impl Default for ExecutionState {
    fn default() -> Self {
        ExecutionState::new(FunctionRegistry::standard())
    }
}
