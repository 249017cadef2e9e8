//! Errors produced while compiling and evaluating expressions.
//!
//! Errors are values. Compile-time errors carry the offending subtree's
//! source position; runtime errors from a binary node are wrapped with the
//! side of the operand that failed so callers can localise diagnostics.

use std::fmt;

use snafu::Snafu;

use crate::ast::{Operator, Pos};
use crate::value::ValueType;

/// Which operand of a binary node produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::Left => "left",
            Side::Right => "right",
        })
    }
}

/// Errors raised while compiling an AST into an evaluator tree.
#[derive(Debug, Snafu)]
#[snafu(module)]
pub enum CompileError {
    #[snafu(display("operator {op} is not supported for {left} and {right} ({pos})"))]
    OperatorNotDefined {
        op: Operator,
        left: ValueType,
        right: ValueType,
        pos: Pos,
    },

    #[snafu(display("invalid unary operator {op} ({pos})"))]
    InvalidUnaryOperator { op: Operator, pos: Pos },

    #[snafu(display("regex not applicable to unary operator {op} ({pos})"))]
    RegexNotApplicable { op: Operator, pos: Pos },

    #[snafu(display("unsupported literal type {kind} ({pos})"))]
    UnsupportedLiteralType { kind: ValueType, pos: Pos },

    #[snafu(display("lambda expressions cannot be nested inside an expression ({pos})"))]
    NestedLambda { pos: Pos },
}

/// Errors raised while evaluating a compiled expression.
#[derive(Debug, Snafu)]
#[snafu(module)]
pub enum EvalError {
    #[snafu(display(
        "TypeGuard: expression returned unexpected type {actual}, expected {requested}"
    ))]
    TypeGuard {
        requested: ValueType,
        actual: ValueType,
    },

    #[snafu(display("name {name:?} is undefined"))]
    NameNotFound { name: String },

    #[snafu(display("undefined function {name:?}"))]
    UndefinedFunction { name: String },

    #[snafu(display("operator {op} is not supported for {left} and {right}"))]
    OperatorNotDefined {
        op: Operator,
        left: ValueType,
        right: ValueType,
    },

    #[snafu(display("division by zero"))]
    DivisionByZero,

    #[snafu(display("regex not applicable to operator {op}"))]
    RegexNotApplicable { op: Operator },

    #[snafu(display("function {function:?} expects {expected} arguments, got {got}"))]
    ArityMismatch {
        function: String,
        expected: usize,
        got: usize,
    },

    /// A child of a binary node failed; `side` records which one.
    #[snafu(display("{side} operand: {source}"))]
    Operand { side: Side, source: Box<EvalError> },
}

impl EvalError {
    /// The operand side this error was attributed to, if any.
    pub fn side(&self) -> Option<Side> {
        match self {
            EvalError::Operand { side, .. } => Some(*side),
            _ => None,
        }
    }

    /// The underlying error with any operand wrapping stripped.
    pub fn root_cause(&self) -> &EvalError {
        match self {
            EvalError::Operand { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Internal side-tagged error used inside dispatch functions, distinct from
/// the public [`EvalError`]. Operand errors carry their side; operation
/// errors (for example division by zero) carry none and propagate bare.
pub(crate) struct SidedError {
    pub(crate) cause: EvalError,
    pub(crate) side: Option<Side>,
}

impl SidedError {
    pub(crate) fn left(cause: EvalError) -> Self {
        SidedError {
            cause,
            side: Some(Side::Left),
        }
    }

    pub(crate) fn right(cause: EvalError) -> Self {
        SidedError {
            cause,
            side: Some(Side::Right),
        }
    }

    pub(crate) fn operation(cause: EvalError) -> Self {
        SidedError { cause, side: None }
    }
}

impl From<SidedError> for EvalError {
    fn from(err: SidedError) -> Self {
        match err.side {
            Some(side) => EvalError::Operand {
                side,
                source: Box::new(err.cause),
            },
            None => err.cause,
        }
    }
}
