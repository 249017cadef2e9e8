//! End-to-end arithmetic and typing scenarios through the public API.

use chrono::TimeDelta;
use rill::ast::{Node, Operator};
use rill::{compile, CompileError, EvalError, ExecutionState, Scope, Value, ValueType};

#[test]
fn mixed_numerics_promote_to_float() {
    let node = Node::binary(Operator::Plus, Node::reference("a"), Node::reference("b"));
    let expr = compile(&node).unwrap();

    let mut scope = Scope::new();
    scope.set("a", Value::Int(3));
    scope.set("b", Value::Float(2.5));
    let mut state = ExecutionState::default();

    assert_eq!(expr.eval_float(&scope, &mut state).unwrap(), 5.5);
    assert!(matches!(
        expr.eval_int(&scope, &mut state),
        Err(EvalError::TypeGuard {
            requested: ValueType::Int,
            actual: ValueType::Float,
        })
    ));
}

#[test]
fn numeric_promotion_in_comparisons() {
    let scope = Scope::new();
    let mut state = ExecutionState::default();

    let node = Node::binary(Operator::Less, Node::int(1), Node::float(1.5));
    assert!(compile(&node).unwrap().eval_bool(&scope, &mut state).unwrap());

    let node = Node::binary(Operator::Greater, Node::float(1.5), Node::int(1));
    assert!(compile(&node).unwrap().eval_bool(&scope, &mut state).unwrap());
}

#[test]
fn duration_arithmetic() {
    let scope = Scope::new();
    let mut state = ExecutionState::default();

    // 1h + 30m == 90m
    let node = Node::binary(
        Operator::Plus,
        Node::duration(TimeDelta::hours(1)),
        Node::duration(TimeDelta::minutes(30)),
    );
    let expr = compile(&node).unwrap();
    assert_eq!(
        expr.eval_duration(&scope, &mut state).unwrap(),
        TimeDelta::minutes(90)
    );

    // 2 * 15m == 30m
    let node = Node::binary(
        Operator::Mult,
        Node::int(2),
        Node::duration(TimeDelta::minutes(15)),
    );
    let expr = compile(&node).unwrap();
    assert_eq!(
        expr.eval_duration(&scope, &mut state).unwrap(),
        TimeDelta::minutes(30)
    );

    // 1h / 0 is a runtime error.
    let node = Node::binary(
        Operator::Div,
        Node::duration(TimeDelta::hours(1)),
        Node::int(0),
    );
    let expr = compile(&node).unwrap();
    assert!(matches!(
        expr.eval_duration(&scope, &mut state),
        Err(EvalError::DivisionByZero)
    ));
}

#[test]
fn duration_comparisons() {
    let scope = Scope::new();
    let mut state = ExecutionState::default();

    let node = Node::binary(
        Operator::Less,
        Node::duration(TimeDelta::minutes(30)),
        Node::duration(TimeDelta::hours(1)),
    );
    assert!(compile(&node).unwrap().eval_bool(&scope, &mut state).unwrap());
}

#[test]
fn string_minus_string_fails_to_compile() {
    let node = Node::binary(Operator::Minus, Node::string("x"), Node::string("y"));
    assert!(matches!(
        compile(&node).unwrap_err(),
        CompileError::OperatorNotDefined {
            op: Operator::Minus,
            left: ValueType::String,
            right: ValueType::String,
            ..
        }
    ));
}

#[test]
fn builtin_functions_compose_with_operators() {
    // abs(value - 50) <= 10
    let node = Node::binary(
        Operator::LessEqual,
        Node::call(
            "abs",
            vec![Node::binary(
                Operator::Minus,
                Node::reference("value"),
                Node::int(50),
            )],
        ),
        Node::int(10),
    );
    let expr = compile(&node).unwrap();
    let mut state = ExecutionState::default();

    for (value, expected) in [(45, true), (60, true), (61, false), (0, false)] {
        let mut scope = Scope::new();
        scope.set("value", Value::Int(value));
        assert_eq!(expr.eval_bool(&scope, &mut state).unwrap(), expected);
    }
}

#[test]
fn expression_type_queries() {
    let scope = Scope::new();
    let mut state = ExecutionState::default();

    // Static expressions resolve their kind without the scope.
    let node = Node::binary(
        Operator::Mult,
        Node::duration(TimeDelta::minutes(1)),
        Node::int(3),
    );
    let expr = compile(&node).unwrap();
    assert_eq!(
        expr.value_type(&scope, &mut state).unwrap(),
        ValueType::Duration
    );

    // Dynamic ones resolve against the bound kinds.
    let node = Node::binary(Operator::Plus, Node::reference("a"), Node::float(1.0));
    let expr = compile(&node).unwrap();
    let mut scope = Scope::new();
    scope.set("a", Value::Int(2));
    assert_eq!(
        expr.value_type(&scope, &mut state).unwrap(),
        ValueType::Float
    );
}
