//! The filter node: a compiled predicate applied per record.

use tracing::warn;

use crate::ast::{Node, NodeKind, Operator};
use crate::eval::{compile, CompileError, EvalError, ExecutionState, Expression};
use crate::scope::Scope;

/// Filters the record stream by a predicate expression.
///
/// The predicate is compiled once at construction; `accepts` evaluates it
/// against the scope built for each record.
pub struct FilterNode {
    expression: Node,
    predicate: Expression,
}

impl FilterNode {
    pub fn new(expression: Node) -> Result<Self, CompileError> {
        // Predicates arrive as lambda literals; keep the body so `and` can
        // compose it into a larger expression.
        let expression = match expression.kind {
            NodeKind::Lambda(inner) => (*inner).clone(),
            _ => expression,
        };
        let predicate = compile(&expression)?;
        Ok(FilterNode {
            expression,
            predicate,
        })
    }

    /// Conjoin another predicate onto the existing expression.
    pub fn and(self, expression: Node) -> Result<Self, CompileError> {
        let expression = match expression.kind {
            NodeKind::Lambda(inner) => (*inner).clone(),
            _ => expression,
        };
        FilterNode::new(Node::binary(Operator::And, self.expression, expression))
    }

    /// The predicate expression this node was built from.
    pub fn expression(&self) -> &Node {
        &self.expression
    }

    /// Evaluate the predicate for one record.
    pub fn accepts(
        &self,
        scope: &Scope,
        state: &mut ExecutionState,
    ) -> Result<bool, EvalError> {
        self.predicate.eval_bool(scope, state).map_err(|err| {
            warn!(error = %err, "predicate evaluation failed");
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn filters_records() {
        let node = FilterNode::new(Node::binary(
            Operator::Greater,
            Node::reference("value"),
            Node::int(10),
        ))
        .unwrap();

        let mut state = ExecutionState::default();
        let mut scope = Scope::new();

        scope.set("value", Value::Int(42));
        assert!(node.accepts(&scope, &mut state).unwrap());

        scope.set("value", Value::Int(5));
        assert!(!node.accepts(&scope, &mut state).unwrap());
    }

    #[test]
    fn and_conjoins_predicates() {
        let node = FilterNode::new(Node::binary(
            Operator::Greater,
            Node::reference("value"),
            Node::int(10),
        ))
        .unwrap()
        .and(Node::binary(
            Operator::Equal,
            Node::reference("host"),
            Node::string("h001"),
        ))
        .unwrap();

        let mut state = ExecutionState::default();
        let mut scope = Scope::new();
        scope.set("value", Value::Int(42));
        scope.set("host", Value::String("h001".into()));
        assert!(node.accepts(&scope, &mut state).unwrap());

        scope.set("host", Value::String("h002".into()));
        assert!(!node.accepts(&scope, &mut state).unwrap());
    }

    #[test]
    fn lambda_wrapped_predicates_compile() {
        let node = FilterNode::new(Node::lambda(Node::binary(
            Operator::Less,
            Node::reference("value"),
            Node::int(0),
        )))
        .unwrap();

        let mut state = ExecutionState::default();
        let mut scope = Scope::new();
        scope.set("value", Value::Int(-1));
        assert!(node.accepts(&scope, &mut state).unwrap());
    }
}
