//! Binary evaluator nodes and their operator-binding strategy.
//!
//! A binary node over two static children binds its evaluation function at
//! compile time. With a dynamic child the binding happens on first call and
//! is memoised in the execution state keyed by the operand-kind signature,
//! so only a type transition triggers another table lookup.

use tracing::trace;

use crate::ast::Operator;
use crate::eval::dispatch::{self, OpEntry};
use crate::eval::error::EvalError;
use crate::eval::node::Node;
use crate::eval::state::{ExecutionState, NodeId};
use crate::scope::Scope;
use crate::value::{Value, ValueType};

pub(crate) struct BinaryNode {
    pub(crate) id: NodeId,
    pub(crate) op: Operator,
    pub(crate) left: Box<Node>,
    pub(crate) right: Box<Node>,
    /// Bound at compile time when both children are static.
    pub(crate) static_entry: Option<&'static OpEntry>,
}

impl BinaryNode {
    pub(crate) fn eval_value(
        &self,
        scope: &Scope,
        state: &mut ExecutionState,
    ) -> Result<Value, EvalError> {
        let entry = self.bind(scope, state)?;
        (entry.eval)(scope, state, &self.left, &self.right).map_err(EvalError::from)
    }

    pub(crate) fn value_type(
        &self,
        scope: &Scope,
        state: &mut ExecutionState,
    ) -> Result<ValueType, EvalError> {
        self.bind(scope, state).map(|entry| entry.return_type)
    }

    fn bind(
        &self,
        scope: &Scope,
        state: &mut ExecutionState,
    ) -> Result<&'static OpEntry, EvalError> {
        if let Some(entry) = self.static_entry {
            return Ok(entry);
        }

        // Logical operators only exist over booleans and the operands guard
        // their own types, so the binding is constant. Crucially this must
        // not query the right operand's type: short-circuit evaluation may
        // never observe that operand at all.
        if matches!(self.op, Operator::And | Operator::Or) {
            return self.lookup(ValueType::Bool, ValueType::Bool);
        }

        let left = self.left.value_type(scope, state)?;
        let right = self.right.value_type(scope, state)?;

        if let Some(bound) = state.binding(self.id) {
            if bound.signature == (left, right) {
                return Ok(bound.entry);
            }
        }

        let entry = self.lookup(left, right)?;
        state.cache_binding(self.id, (left, right), entry);
        trace!(op = %self.op, %left, %right, "bound binary operator");
        Ok(entry)
    }

    fn lookup(&self, left: ValueType, right: ValueType) -> Result<&'static OpEntry, EvalError> {
        dispatch::lookup(self.op, left, right).ok_or(EvalError::OperatorNotDefined {
            op: self.op,
            left,
            right,
        })
    }
}
