//! The operator dispatch table.
//!
//! One static, closed table maps `(operator, left kind, right kind)` to a
//! typed evaluation function and its return kind. Binary nodes bind against
//! it (at compile time for static operands, per type-transition otherwise)
//! and type inference reads the return kinds. A triple missing from the
//! table is an "operator not defined" error, so the table *is* the
//! definition of which mixed-kind operations exist.
//!
//! The entries are generated from the coercion rules below rather than
//! enumerated by hand: each `comparisons!`/`arith!` line stamps out the full
//! kind matrix for one operator.

use std::sync::LazyLock;

use hashbrown::HashMap;

use crate::ast::Operator;
use crate::eval::error::{EvalError, SidedError};
use crate::eval::node::Node;
use crate::eval::state::ExecutionState;
use crate::scope::Scope;
use crate::value::{duration, Value, ValueType};

pub(crate) type EvalFn = Box<
    dyn Fn(&Scope, &mut ExecutionState, &Node, &Node) -> Result<Value, SidedError> + Send + Sync,
>;

pub(crate) struct OpEntry {
    pub(crate) return_type: ValueType,
    pub(crate) eval: EvalFn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct OpKey {
    op: Operator,
    left: ValueType,
    right: ValueType,
}

static TABLE: LazyLock<HashMap<OpKey, OpEntry>> = LazyLock::new(build);

pub(crate) fn lookup(op: Operator, left: ValueType, right: ValueType) -> Option<&'static OpEntry> {
    TABLE.get(&OpKey { op, left, right })
}

pub(crate) fn return_type(op: Operator, left: ValueType, right: ValueType) -> Option<ValueType> {
    lookup(op, left, right).map(|entry| entry.return_type)
}

fn insert(table: &mut HashMap<OpKey, OpEntry>, key: OpKey, entry: OpEntry) {
    let prev = table.insert(key, entry);
    debug_assert!(prev.is_none(), "duplicate dispatch entry {key:?}");
}

/// One table entry: evaluate both operands to their kinds (tagging errors
/// with the failing side), then apply. Operation errors propagate untagged.
macro_rules! op_entry {
    ($t:ident, $op:ident, $lk:ident($getl:ident), $rk:ident($getr:ident) -> $ret:ident, $apply:expr) => {
        insert(
            &mut $t,
            OpKey {
                op: Operator::$op,
                left: ValueType::$lk,
                right: ValueType::$rk,
            },
            OpEntry {
                return_type: ValueType::$ret,
                eval: Box::new(|scope, state, left, right| {
                    let l = left.$getl(scope, state).map_err(SidedError::left)?;
                    let r = right.$getr(scope, state).map_err(SidedError::right)?;
                    ($apply)(l, r).map_err(SidedError::operation)
                }),
            },
        )
    };
}

/// A comparison operator over every comparable kind pair, with Int promoted
/// to Float on mixed numeric operands.
macro_rules! comparisons {
    ($t:ident, $($op:ident => $cmp:tt),* $(,)?) => {$(
        op_entry!($t, $op, Int(eval_int), Int(eval_int) -> Bool,
            |l, r| Ok::<_, EvalError>(Value::Bool(l $cmp r)));
        op_entry!($t, $op, Float(eval_float), Float(eval_float) -> Bool,
            |l, r| Ok::<_, EvalError>(Value::Bool(l $cmp r)));
        op_entry!($t, $op, Int(eval_int), Float(eval_float) -> Bool,
            |l, r| Ok::<_, EvalError>(Value::Bool((l as f64) $cmp r)));
        op_entry!($t, $op, Float(eval_float), Int(eval_int) -> Bool,
            |l, r| Ok::<_, EvalError>(Value::Bool(l $cmp (r as f64))));
        op_entry!($t, $op, String(eval_string), String(eval_string) -> Bool,
            |l: String, r: String| Ok::<_, EvalError>(Value::Bool(l $cmp r)));
        op_entry!($t, $op, Duration(eval_duration), Duration(eval_duration) -> Bool,
            |l, r| Ok::<_, EvalError>(Value::Bool(l $cmp r)));
    )*};
}

/// Equality additionally covers booleans and time instants.
macro_rules! equality_extras {
    ($t:ident, $($op:ident => $cmp:tt),* $(,)?) => {$(
        op_entry!($t, $op, Bool(eval_bool), Bool(eval_bool) -> Bool,
            |l, r| Ok::<_, EvalError>(Value::Bool(l $cmp r)));
        op_entry!($t, $op, Time(eval_time), Time(eval_time) -> Bool,
            |l, r| Ok::<_, EvalError>(Value::Bool(l $cmp r)));
    )*};
}

/// Float arithmetic follows IEEE-754; division by zero produces infinity.
macro_rules! float_arith {
    ($t:ident, $($op:ident => $tok:tt),* $(,)?) => {$(
        op_entry!($t, $op, Float(eval_float), Float(eval_float) -> Float,
            |l: f64, r: f64| Ok::<_, EvalError>(Value::Float(l $tok r)));
    )*};
}

/// Mixed-kind arithmetic promotes the Int operand to Float and follows
/// float semantics from there.
macro_rules! mixed_arith {
    ($t:ident, $($op:ident => $tok:tt),* $(,)?) => {$(
        op_entry!($t, $op, Int(eval_int), Float(eval_float) -> Float,
            |l, r: f64| Ok::<_, EvalError>(Value::Float((l as f64) $tok r)));
        op_entry!($t, $op, Float(eval_float), Int(eval_int) -> Float,
            |l: f64, r| Ok::<_, EvalError>(Value::Float(l $tok (r as f64))));
    )*};
}

/// Integer arithmetic wraps on overflow rather than panicking.
macro_rules! int_arith {
    ($t:ident, $($op:ident => $f:ident),* $(,)?) => {$(
        op_entry!($t, $op, Int(eval_int), Int(eval_int) -> Int,
            |l: i64, r: i64| Ok::<_, EvalError>(Value::Int(l.$f(r))));
    )*};
}

fn checked_int_div(l: i64, r: i64) -> Result<Value, EvalError> {
    if r == 0 {
        return Err(EvalError::DivisionByZero);
    }
    Ok(Value::Int(l.wrapping_div(r)))
}

fn checked_int_mod(l: i64, r: i64) -> Result<Value, EvalError> {
    if r == 0 {
        return Err(EvalError::DivisionByZero);
    }
    Ok(Value::Int(l.wrapping_rem(r)))
}

/// `And` and `Or` short-circuit on the left operand: when the left value
/// alone decides the result, the right operand is never evaluated and
/// errors it would have produced are suppressed.
fn insert_logical(table: &mut HashMap<OpKey, OpEntry>, op: Operator, deciding: bool) {
    insert(
        table,
        OpKey {
            op,
            left: ValueType::Bool,
            right: ValueType::Bool,
        },
        OpEntry {
            return_type: ValueType::Bool,
            eval: Box::new(move |scope, state, left, right| {
                let l = left.eval_bool(scope, state).map_err(SidedError::left)?;
                if l == deciding {
                    return Ok(Value::Bool(deciding));
                }
                let r = right.eval_bool(scope, state).map_err(SidedError::right)?;
                Ok(Value::Bool(r))
            }),
        },
    );
}

fn build() -> HashMap<OpKey, OpEntry> {
    let mut t = HashMap::new();

    insert_logical(&mut t, Operator::And, false);
    insert_logical(&mut t, Operator::Or, true);

    comparisons!(t,
        Equal => ==,
        NotEqual => !=,
        Less => <,
        LessEqual => <=,
        Greater => >,
        GreaterEqual => >=,
    );
    equality_extras!(t, Equal => ==, NotEqual => !=);

    op_entry!(t, RegexEqual, String(eval_string), Regex(eval_regex) -> Bool,
        |s: String, re: std::sync::Arc<regex::Regex>| {
            Ok::<_, EvalError>(Value::Bool(re.is_match(&s)))
        });
    op_entry!(t, RegexNotEqual, String(eval_string), Regex(eval_regex) -> Bool,
        |s: String, re: std::sync::Arc<regex::Regex>| {
            Ok::<_, EvalError>(Value::Bool(!re.is_match(&s)))
        });

    float_arith!(t, Plus => +, Minus => -, Mult => *, Div => /);
    mixed_arith!(t, Plus => +, Minus => -, Mult => *, Div => /);

    int_arith!(t, Plus => wrapping_add, Minus => wrapping_sub, Mult => wrapping_mul);
    op_entry!(t, Div, Int(eval_int), Int(eval_int) -> Int, checked_int_div);
    op_entry!(t, Mod, Int(eval_int), Int(eval_int) -> Int, checked_int_mod);

    // Duration arithmetic works on wrapped nanosecond counts.
    op_entry!(t, Plus, Duration(eval_duration), Duration(eval_duration) -> Duration,
        |l, r| Ok::<_, EvalError>(Value::Duration(duration::add(l, r))));
    op_entry!(t, Minus, Duration(eval_duration), Duration(eval_duration) -> Duration,
        |l, r| Ok::<_, EvalError>(Value::Duration(duration::sub(l, r))));

    // Duration scaling; float factors truncate to whole nanoseconds.
    op_entry!(t, Mult, Duration(eval_duration), Int(eval_int) -> Duration,
        |l, r| Ok::<_, EvalError>(Value::Duration(duration::scale_int(l, r))));
    op_entry!(t, Mult, Int(eval_int), Duration(eval_duration) -> Duration,
        |l, r| Ok::<_, EvalError>(Value::Duration(duration::scale_int(r, l))));
    op_entry!(t, Mult, Duration(eval_duration), Float(eval_float) -> Duration,
        |l, r| Ok::<_, EvalError>(Value::Duration(duration::scale_float(l, r))));
    op_entry!(t, Mult, Float(eval_float), Duration(eval_duration) -> Duration,
        |l, r| Ok::<_, EvalError>(Value::Duration(duration::scale_float(r, l))));
    op_entry!(t, Div, Duration(eval_duration), Int(eval_int) -> Duration,
        |l, r: i64| {
            if r == 0 {
                return Err(EvalError::DivisionByZero);
            }
            Ok(Value::Duration(duration::div_int(l, r)))
        });
    op_entry!(t, Div, Duration(eval_duration), Float(eval_float) -> Duration,
        |l, r: f64| {
            if r == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            Ok(Value::Duration(duration::div_float(l, r)))
        });

    op_entry!(t, Plus, String(eval_string), String(eval_string) -> String,
        |l: String, r: String| Ok::<_, EvalError>(Value::String(l + &r)));

    t
}
