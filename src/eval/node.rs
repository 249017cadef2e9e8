//! The evaluator tree.
//!
//! A homomorphic image of the AST, built once by `compile` and immutable
//! afterwards. Every node answers the full typed-evaluation capability set:
//! the `eval_*` method matching the node's actual kind returns the value,
//! every other one returns a `TypeGuard` error naming the kind that was
//! actually available.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use regex::Regex;

use crate::ast::Operator;
use crate::eval::binary::BinaryNode;
use crate::eval::error::EvalError;
use crate::eval::state::{ExecutionState, NodeId};
use crate::scope::Scope;
use crate::value::{duration, Value, ValueType};

pub(crate) enum Node {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Duration(TimeDelta),
    Regex(Arc<Regex>),
    Reference(ReferenceNode),
    Unary(UnaryNode),
    Binary(BinaryNode),
    Call(CallNode),
}

pub(crate) struct ReferenceNode {
    pub(crate) id: NodeId,
    pub(crate) name: String,
}

/// Unary node; `compile` guarantees `op` is `!` or `-`.
pub(crate) struct UnaryNode {
    pub(crate) op: Operator,
    pub(crate) child: Box<Node>,
}

pub(crate) struct CallNode {
    pub(crate) id: NodeId,
    pub(crate) name: String,
    pub(crate) args: Vec<Node>,
}

fn type_guard(requested: ValueType, actual: Value) -> EvalError {
    EvalError::TypeGuard {
        requested,
        actual: actual.value_type(),
    }
}

impl Node {
    /// Evaluate to whatever kind the node produces for this scope.
    pub(crate) fn eval_value(
        &self,
        scope: &Scope,
        state: &mut ExecutionState,
    ) -> Result<Value, EvalError> {
        match self {
            Node::Bool(v) => Ok(Value::Bool(*v)),
            Node::Int(v) => Ok(Value::Int(*v)),
            Node::Float(v) => Ok(Value::Float(*v)),
            Node::String(v) => Ok(Value::String(v.clone())),
            Node::Duration(v) => Ok(Value::Duration(*v)),
            Node::Regex(v) => Ok(Value::Regex(v.clone())),
            Node::Reference(node) => node.eval_value(scope),
            Node::Unary(node) => node.eval_value(scope, state),
            Node::Binary(node) => node.eval_value(scope, state),
            Node::Call(node) => node.eval_value(scope, state),
        }
    }

    /// The kind this node evaluates to. Static nodes answer without touching
    /// the scope; dynamic nodes consult it once and are memoised in `state`.
    pub(crate) fn value_type(
        &self,
        scope: &Scope,
        state: &mut ExecutionState,
    ) -> Result<ValueType, EvalError> {
        match self {
            Node::Bool(_) => Ok(ValueType::Bool),
            Node::Int(_) => Ok(ValueType::Int),
            Node::Float(_) => Ok(ValueType::Float),
            Node::String(_) => Ok(ValueType::String),
            Node::Duration(_) => Ok(ValueType::Duration),
            Node::Regex(_) => Ok(ValueType::Regex),
            Node::Reference(node) => node.value_type(scope, state),
            Node::Unary(node) => node.value_type(scope, state),
            Node::Binary(node) => node.value_type(scope, state),
            Node::Call(node) => node.value_type(scope, state),
        }
    }

    pub(crate) fn eval_float(
        &self,
        scope: &Scope,
        state: &mut ExecutionState,
    ) -> Result<f64, EvalError> {
        match self.eval_value(scope, state)? {
            Value::Float(v) => Ok(v),
            other => Err(type_guard(ValueType::Float, other)),
        }
    }

    pub(crate) fn eval_int(
        &self,
        scope: &Scope,
        state: &mut ExecutionState,
    ) -> Result<i64, EvalError> {
        match self.eval_value(scope, state)? {
            Value::Int(v) => Ok(v),
            other => Err(type_guard(ValueType::Int, other)),
        }
    }

    pub(crate) fn eval_string(
        &self,
        scope: &Scope,
        state: &mut ExecutionState,
    ) -> Result<String, EvalError> {
        match self.eval_value(scope, state)? {
            Value::String(v) => Ok(v),
            other => Err(type_guard(ValueType::String, other)),
        }
    }

    pub(crate) fn eval_bool(
        &self,
        scope: &Scope,
        state: &mut ExecutionState,
    ) -> Result<bool, EvalError> {
        match self.eval_value(scope, state)? {
            Value::Bool(v) => Ok(v),
            other => Err(type_guard(ValueType::Bool, other)),
        }
    }

    pub(crate) fn eval_regex(
        &self,
        scope: &Scope,
        state: &mut ExecutionState,
    ) -> Result<Arc<Regex>, EvalError> {
        match self.eval_value(scope, state)? {
            Value::Regex(v) => Ok(v),
            other => Err(type_guard(ValueType::Regex, other)),
        }
    }

    pub(crate) fn eval_time(
        &self,
        scope: &Scope,
        state: &mut ExecutionState,
    ) -> Result<DateTime<Utc>, EvalError> {
        match self.eval_value(scope, state)? {
            Value::Time(v) => Ok(v),
            other => Err(type_guard(ValueType::Time, other)),
        }
    }

    pub(crate) fn eval_duration(
        &self,
        scope: &Scope,
        state: &mut ExecutionState,
    ) -> Result<TimeDelta, EvalError> {
        match self.eval_value(scope, state)? {
            Value::Duration(v) => Ok(v),
            other => Err(type_guard(ValueType::Duration, other)),
        }
    }
}

impl ReferenceNode {
    fn eval_value(&self, scope: &Scope) -> Result<Value, EvalError> {
        scope
            .get(&self.name)
            .cloned()
            .ok_or_else(|| EvalError::NameNotFound {
                name: self.name.clone(),
            })
    }

    fn value_type(
        &self,
        scope: &Scope,
        state: &mut ExecutionState,
    ) -> Result<ValueType, EvalError> {
        if let Some(ty) = state.cached_type(self.id) {
            return Ok(ty);
        }
        let ty = self
            .eval_value(scope)?
            .value_type();
        state.cache_type(self.id, ty);
        Ok(ty)
    }
}

impl UnaryNode {
    fn eval_value(&self, scope: &Scope, state: &mut ExecutionState) -> Result<Value, EvalError> {
        let child = self.child.eval_value(scope, state)?;
        match self.op {
            Operator::Not => match child {
                Value::Bool(v) => Ok(Value::Bool(!v)),
                Value::Regex(_) => Err(EvalError::RegexNotApplicable { op: self.op }),
                other => Err(type_guard(ValueType::Bool, other)),
            },
            Operator::Minus => match child {
                Value::Float(v) => Ok(Value::Float(-v)),
                Value::Int(v) => Ok(Value::Int(v.wrapping_neg())),
                Value::Duration(v) => Ok(Value::Duration(duration::neg(v))),
                Value::Regex(_) => Err(EvalError::RegexNotApplicable { op: self.op }),
                other => Err(type_guard(ValueType::Float, other)),
            },
            op => unreachable!("unary operator {op} rejected at compile time"),
        }
    }

    fn value_type(
        &self,
        scope: &Scope,
        state: &mut ExecutionState,
    ) -> Result<ValueType, EvalError> {
        match self.op {
            Operator::Not => Ok(ValueType::Bool),
            _ => self.child.value_type(scope, state),
        }
    }
}

impl CallNode {
    fn resolve(
        &self,
        state: &mut ExecutionState,
    ) -> Result<Arc<dyn crate::eval::func::BuiltinFn>, EvalError> {
        if let Some(f) = state.resolved_fn(self.id) {
            return Ok(f);
        }
        let f = state
            .functions()
            .get(&self.name)
            .ok_or_else(|| EvalError::UndefinedFunction {
                name: self.name.clone(),
            })?;
        state.cache_resolved_fn(self.id, f.clone());
        Ok(f)
    }

    fn check_arity(&self, expected: usize) -> Result<(), EvalError> {
        if expected != self.args.len() {
            return Err(EvalError::ArityMismatch {
                function: self.name.clone(),
                expected,
                got: self.args.len(),
            });
        }
        Ok(())
    }

    fn eval_value(&self, scope: &Scope, state: &mut ExecutionState) -> Result<Value, EvalError> {
        let f = self.resolve(state)?;
        self.check_arity(f.arity())?;

        // Arguments evaluate in positional order before the call.
        let mut args = Vec::with_capacity(self.args.len());
        for arg in &self.args {
            args.push(arg.eval_value(scope, state)?);
        }
        f.call(&args)
    }

    fn value_type(
        &self,
        scope: &Scope,
        state: &mut ExecutionState,
    ) -> Result<ValueType, EvalError> {
        if let Some(ty) = state.cached_type(self.id) {
            return Ok(ty);
        }
        let f = self.resolve(state)?;
        self.check_arity(f.arity())?;

        let mut kinds = Vec::with_capacity(self.args.len());
        for arg in &self.args {
            kinds.push(arg.value_type(scope, state)?);
        }
        let ty = f.return_type(&kinds);
        state.cache_type(self.id, ty);
        Ok(ty)
    }
}
