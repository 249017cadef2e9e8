//! The AST contract consumed by the evaluator.
//!
//! The parser is a separate component; what matters here is the shape of the
//! tree it hands over. Nodes are owned, immutable once built, and carry the
//! source position the parser recorded so compile errors can point at the
//! offending subtree. Regex literals are compiled at AST construction, never
//! later.

use std::fmt;
use std::sync::Arc;

use chrono::TimeDelta;
use regex::Regex;

use crate::eval::CompileError;
use crate::value::{Value, ValueType};

/// Source position of a node, as reported by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pos {
    pub line: usize,
    pub char: usize,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {} char {}", self.line, self.char)
    }
}

/// Operator tokens, spanning the logical, equality, relational, regex-match,
/// arithmetic and modulo groups plus unary `!`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Not,
    And,
    Or,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    RegexEqual,
    RegexNotEqual,
    Plus,
    Minus,
    Mult,
    Div,
    Mod,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Operator::Not => "!",
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
            Operator::Less => "<",
            Operator::LessEqual => "<=",
            Operator::Greater => ">",
            Operator::GreaterEqual => ">=",
            Operator::RegexEqual => "=~",
            Operator::RegexNotEqual => "!~",
            Operator::Plus => "+",
            Operator::Minus => "-",
            Operator::Mult => "*",
            Operator::Div => "/",
            Operator::Mod => "%",
        };
        f.write_str(symbol)
    }
}

/// A numeric literal. The parser distinguishes integer from float form and
/// the distinction is load-bearing: `1` and `1.0` have different kinds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

/// An expression node.
#[derive(Debug, Clone)]
pub struct Node {
    pub pos: Pos,
    pub kind: NodeKind,
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    Bool(bool),
    Number(Number),
    String(String),
    Duration(TimeDelta),
    Regex(Arc<Regex>),
    /// A name looked up in the scope at evaluation time.
    Reference(String),
    Unary {
        op: Operator,
        expr: Box<Node>,
    },
    Binary {
        op: Operator,
        left: Box<Node>,
        right: Box<Node>,
    },
    /// A call of a registered builtin function.
    Call {
        name: String,
        args: Vec<Node>,
    },
    /// A nested expression carried as an opaque first-class value.
    Lambda(Arc<Node>),
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Node {
            pos: Pos::default(),
            kind,
        }
    }

    pub fn with_pos(mut self, pos: Pos) -> Self {
        self.pos = pos;
        self
    }

    pub fn bool(value: bool) -> Self {
        Node::new(NodeKind::Bool(value))
    }

    pub fn int(value: i64) -> Self {
        Node::new(NodeKind::Number(Number::Int(value)))
    }

    pub fn float(value: f64) -> Self {
        Node::new(NodeKind::Number(Number::Float(value)))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Node::new(NodeKind::String(value.into()))
    }

    pub fn duration(value: TimeDelta) -> Self {
        Node::new(NodeKind::Duration(value))
    }

    /// A regex literal. The pattern is already compiled: the parser (or the
    /// caller building the tree by hand) compiles it when the literal is
    /// constructed.
    pub fn regex(value: Regex) -> Self {
        Node::new(NodeKind::Regex(Arc::new(value)))
    }

    pub fn reference(name: impl Into<String>) -> Self {
        Node::new(NodeKind::Reference(name.into()))
    }

    pub fn unary(op: Operator, expr: Node) -> Self {
        let pos = expr.pos;
        Node::new(NodeKind::Unary {
            op,
            expr: Box::new(expr),
        })
        .with_pos(pos)
    }

    pub fn binary(op: Operator, left: Node, right: Node) -> Self {
        let pos = left.pos;
        Node::new(NodeKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
        .with_pos(pos)
    }

    pub fn call(name: impl Into<String>, args: Vec<Node>) -> Self {
        Node::new(NodeKind::Call {
            name: name.into(),
            args,
        })
    }

    pub fn lambda(expr: Node) -> Self {
        let pos = expr.pos;
        Node::new(NodeKind::Lambda(Arc::new(expr))).with_pos(pos)
    }

    /// Convert a runtime value to the matching literal node.
    ///
    /// Used by pipeline nodes that splice computed values back into
    /// expressions. `Time` has no literal form and is rejected with
    /// [`CompileError::UnsupportedLiteralType`].
    pub fn literal(pos: Pos, value: Value) -> Result<Node, CompileError> {
        let kind = match value {
            Value::Bool(v) => NodeKind::Bool(v),
            Value::Int(v) => NodeKind::Number(Number::Int(v)),
            Value::Float(v) => NodeKind::Number(Number::Float(v)),
            Value::Duration(v) => NodeKind::Duration(v),
            Value::String(v) => NodeKind::String(v),
            Value::Regex(v) => NodeKind::Regex(v),
            Value::Lambda(v) => NodeKind::Lambda(v),
            Value::Time(_) => {
                return Err(CompileError::UnsupportedLiteralType {
                    kind: ValueType::Time,
                    pos,
                })
            }
        };
        Ok(Node::new(kind).with_pos(pos))
    }
}
