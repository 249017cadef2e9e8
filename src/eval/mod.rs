//! The stateful expression evaluator.
//!
//! [`compile`] turns an AST into an [`Expression`]: a reusable evaluator
//! tree whose per-record evaluation is typed, short-circuiting and cached.
//! The tree is immutable and shareable; all per-evaluation mutability lives
//! in the caller's [`ExecutionState`].
//!
//! ```
//! use rill::ast::{Node, Operator};
//! use rill::{compile, ExecutionState, Scope, Value};
//!
//! let ast = Node::binary(Operator::Greater, Node::reference("value"), Node::int(10));
//! let expr = compile(&ast)?;
//!
//! let mut scope = Scope::new();
//! scope.set("value", Value::Int(42));
//! let mut state = ExecutionState::default();
//!
//! assert!(expr.eval_bool(&scope, &mut state)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod binary;
mod dispatch;
mod error;
mod func;
mod infer;
mod node;
mod state;


use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use regex::Regex;
use tracing::trace;

use crate::ast::{self, NodeKind, Number, Operator};
use crate::scope::Scope;
use crate::value::{Value, ValueType};

use self::binary::BinaryNode;
use self::node::{CallNode, Node, ReferenceNode, UnaryNode};
use self::state::NodeId;

pub use self::error::{CompileError, EvalError, Side};
pub use self::func::{BuiltinFn, FunctionRegistry, NativeFunction};
pub use self::state::ExecutionState;

/// Compile an AST into a reusable evaluator tree.
///
/// A top-level lambda wrapper compiles to its body; pipeline nodes hand
/// their predicates over as lambda literals.
pub fn compile(node: &ast::Node) -> Result<Expression, CompileError> {
    Expression::compile(node)
}

/// A compiled expression.
///
/// Built once, evaluated per record. The tree itself is read-only and safe
/// to share between concurrent evaluations as long as each evaluation uses
/// its own [`Scope`] and [`ExecutionState`].
pub struct Expression {
    root: Node,
}

impl std::fmt::Debug for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Expression").finish()
    }
}

impl Expression {
    pub fn compile(node: &ast::Node) -> Result<Self, CompileError> {
        let body = match &node.kind {
            NodeKind::Lambda(inner) => inner.as_ref(),
            _ => node,
        };
        let mut compiler = Compiler { nodes: 0 };
        let root = compiler.node(body)?;
        trace!(nodes = compiler.nodes, "compiled expression");
        Ok(Expression { root })
    }

    /// The kind this expression evaluates to under the given scope. Static
    /// expressions answer without reading the scope.
    pub fn value_type(
        &self,
        scope: &Scope,
        state: &mut ExecutionState,
    ) -> Result<ValueType, EvalError> {
        self.root.value_type(scope, state)
    }

    /// Evaluate to whatever kind the expression produces.
    pub fn eval(&self, scope: &Scope, state: &mut ExecutionState) -> Result<Value, EvalError> {
        self.root.eval_value(scope, state)
    }

    pub fn eval_float(
        &self,
        scope: &Scope,
        state: &mut ExecutionState,
    ) -> Result<f64, EvalError> {
        self.root.eval_float(scope, state)
    }

    pub fn eval_int(&self, scope: &Scope, state: &mut ExecutionState) -> Result<i64, EvalError> {
        self.root.eval_int(scope, state)
    }

    pub fn eval_string(
        &self,
        scope: &Scope,
        state: &mut ExecutionState,
    ) -> Result<String, EvalError> {
        self.root.eval_string(scope, state)
    }

    pub fn eval_bool(&self, scope: &Scope, state: &mut ExecutionState) -> Result<bool, EvalError> {
        self.root.eval_bool(scope, state)
    }

    pub fn eval_regex(
        &self,
        scope: &Scope,
        state: &mut ExecutionState,
    ) -> Result<Arc<Regex>, EvalError> {
        self.root.eval_regex(scope, state)
    }

    pub fn eval_time(
        &self,
        scope: &Scope,
        state: &mut ExecutionState,
    ) -> Result<DateTime<Utc>, EvalError> {
        self.root.eval_time(scope, state)
    }

    pub fn eval_duration(
        &self,
        scope: &Scope,
        state: &mut ExecutionState,
    ) -> Result<TimeDelta, EvalError> {
        self.root.eval_duration(scope, state)
    }
}

/// Node ids are process-unique (the moral equivalent of node identity), so
/// an execution state never confuses cache entries, whichever expressions
/// it is used with.
static NEXT_NODE_ID: AtomicU32 = AtomicU32::new(0);

struct Compiler {
    nodes: u32,
}

impl Compiler {
    fn fresh_id(&mut self) -> NodeId {
        self.nodes += 1;
        NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    fn node(&mut self, node: &ast::Node) -> Result<Node, CompileError> {
        match &node.kind {
            NodeKind::Bool(v) => Ok(Node::Bool(*v)),
            NodeKind::Number(Number::Int(v)) => Ok(Node::Int(*v)),
            NodeKind::Number(Number::Float(v)) => Ok(Node::Float(*v)),
            NodeKind::String(v) => Ok(Node::String(v.clone())),
            NodeKind::Duration(v) => Ok(Node::Duration(*v)),
            NodeKind::Regex(v) => Ok(Node::Regex(v.clone())),

            NodeKind::Reference(name) => Ok(Node::Reference(ReferenceNode {
                id: self.fresh_id(),
                name: name.clone(),
            })),

            NodeKind::Unary { op, expr } => {
                if !matches!(op, Operator::Not | Operator::Minus) {
                    return Err(CompileError::InvalidUnaryOperator {
                        op: *op,
                        pos: node.pos,
                    });
                }
                if !infer::is_dynamic(expr) && infer::constant_type_of(expr) == ValueType::Regex {
                    return Err(CompileError::RegexNotApplicable {
                        op: *op,
                        pos: node.pos,
                    });
                }
                Ok(Node::Unary(UnaryNode {
                    op: *op,
                    child: Box::new(self.node(expr)?),
                }))
            }

            NodeKind::Binary { op, left, right } => {
                let static_entry = if !infer::is_dynamic(left) && !infer::is_dynamic(right) {
                    let left = infer::constant_type_of(left);
                    let right = infer::constant_type_of(right);
                    let entry = dispatch::lookup(*op, left, right).ok_or(
                        CompileError::OperatorNotDefined {
                            op: *op,
                            left,
                            right,
                            pos: node.pos,
                        },
                    )?;
                    Some(entry)
                } else {
                    None
                };
                Ok(Node::Binary(BinaryNode {
                    id: self.fresh_id(),
                    op: *op,
                    left: Box::new(self.node(left)?),
                    right: Box::new(self.node(right)?),
                    static_entry,
                }))
            }

            NodeKind::Call { name, args } => {
                let mut compiled = Vec::with_capacity(args.len());
                for arg in args {
                    compiled.push(self.node(arg)?);
                }
                Ok(Node::Call(CallNode {
                    id: self.fresh_id(),
                    name: name.clone(),
                    args: compiled,
                }))
            }

            // Lambdas are first-class values, not subexpressions; only the
            // top level unwraps them.
            NodeKind::Lambda(_) => Err(CompileError::NestedLambda { pos: node.pos }),
        }
    }
}
