//! Compile-time classification of AST subtrees.
//!
//! A subtree is *dynamic* when its kind depends on the scope, which is the
//! case exactly when it contains a reference or a function call. Static
//! subtrees resolve their kind here, without any scope, and binary nodes
//! over them bind their operator function once at compile time.

use crate::ast::{Node, NodeKind, Number, Operator};
use crate::eval::dispatch;
use crate::value::ValueType;

pub(crate) fn is_dynamic(node: &Node) -> bool {
    match &node.kind {
        NodeKind::Reference(_) | NodeKind::Call { .. } => true,
        NodeKind::Unary { expr, .. } => is_dynamic(expr),
        NodeKind::Binary { left, right, .. } => is_dynamic(left) || is_dynamic(right),
        _ => false,
    }
}

/// The kind a static subtree evaluates to, or `Invalid` when it cannot be
/// resolved without a scope.
pub(crate) fn constant_type_of(node: &Node) -> ValueType {
    match &node.kind {
        NodeKind::Bool(_) => ValueType::Bool,
        NodeKind::Number(Number::Int(_)) => ValueType::Int,
        NodeKind::Number(Number::Float(_)) => ValueType::Float,
        NodeKind::String(_) => ValueType::String,
        NodeKind::Duration(_) => ValueType::Duration,
        NodeKind::Regex(_) => ValueType::Regex,
        NodeKind::Lambda(_) => ValueType::Lambda,
        NodeKind::Unary { op, expr } => match op {
            Operator::Not => ValueType::Bool,
            Operator::Minus => constant_type_of(expr),
            _ => ValueType::Invalid,
        },
        NodeKind::Binary { op, left, right } => {
            let left = constant_type_of(left);
            let right = constant_type_of(right);
            dispatch::return_type(*op, left, right).unwrap_or(ValueType::Invalid)
        }
        NodeKind::Reference(_) | NodeKind::Call { .. } => ValueType::Invalid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Node;

    #[test]
    fn literals_are_static() {
        assert!(!is_dynamic(&Node::int(1)));
        assert!(!is_dynamic(&Node::string("x")));
        assert_eq!(constant_type_of(&Node::int(1)), ValueType::Int);
        assert_eq!(constant_type_of(&Node::float(1.0)), ValueType::Float);
        assert_eq!(constant_type_of(&Node::string("x")), ValueType::String);
    }

    #[test]
    fn references_and_calls_are_dynamic() {
        assert!(is_dynamic(&Node::reference("x")));
        assert!(is_dynamic(&Node::call("sqrt", vec![Node::float(2.0)])));
        assert!(is_dynamic(&Node::unary(
            Operator::Minus,
            Node::reference("x")
        )));
        assert!(is_dynamic(&Node::binary(
            Operator::Plus,
            Node::int(1),
            Node::reference("x"),
        )));
    }

    #[test]
    fn unary_types() {
        assert_eq!(
            constant_type_of(&Node::unary(Operator::Not, Node::bool(true))),
            ValueType::Bool
        );
        assert_eq!(
            constant_type_of(&Node::unary(Operator::Minus, Node::float(1.5))),
            ValueType::Float
        );
    }

    #[test]
    fn binary_types_follow_the_dispatch_table() {
        assert_eq!(
            constant_type_of(&Node::binary(Operator::Plus, Node::int(1), Node::int(2))),
            ValueType::Int
        );
        assert_eq!(
            constant_type_of(&Node::binary(
                Operator::Less,
                Node::int(1),
                Node::float(1.5)
            )),
            ValueType::Bool
        );
        // Unresolvable pair.
        assert_eq!(
            constant_type_of(&Node::binary(
                Operator::Minus,
                Node::string("x"),
                Node::string("y")
            )),
            ValueType::Invalid
        );
    }
}
