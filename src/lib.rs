//! Rill lambda expressions: a stateful, typed expression evaluator for
//! dataflow pipelines.
//!
//! Pipeline nodes compile a lambda expression once and evaluate it against a
//! fresh [`Scope`] for every record that flows through. Evaluation is typed
//! (every node answers one `eval_*` entrypoint per primitive kind and
//! type-guards the rest), short-circuiting (`AND`/`OR` never evaluate the
//! dead side) and cached (dynamic types and operator bindings are memoised
//! in a per-evaluation [`ExecutionState`]).
//!
//! ```
//! use rill::ast::{Node, Operator};
//! use rill::{compile, ExecutionState, Scope, Value};
//!
//! // "host" == 'h001.example.com' AND "value" > 10
//! let predicate = Node::binary(
//!     Operator::And,
//!     Node::binary(
//!         Operator::Equal,
//!         Node::reference("host"),
//!         Node::string("h001.example.com"),
//!     ),
//!     Node::binary(Operator::Greater, Node::reference("value"), Node::int(10)),
//! );
//! let expr = compile(&predicate)?;
//!
//! let mut scope = Scope::new();
//! scope.set("host", Value::String("h001.example.com".into()));
//! scope.set("value", Value::Int(42));
//! let mut state = ExecutionState::default();
//!
//! assert!(expr.eval_bool(&scope, &mut state)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod ast;
pub mod eval;
pub mod pipeline;
pub mod scope;
pub mod stdlib;
pub mod value;

pub use eval::{
    compile, BuiltinFn, CompileError, EvalError, ExecutionState, Expression, FunctionRegistry,
    NativeFunction, Side,
};
pub use scope::Scope;
pub use value::{Value, ValueType};
