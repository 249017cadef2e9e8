//! Math package.
//!
//! Functions: abs, ceil, floor, round, sqrt, log, log10, exp, pow, min, max.
//! All take floats; `abs`, `min` and `max` also accept integers and return
//! the kind they were given.

use crate::eval::{EvalError, FunctionRegistry, NativeFunction};
use crate::value::{Value, ValueType};

fn want_float(value: &Value) -> Result<f64, EvalError> {
    match value {
        Value::Float(v) => Ok(*v),
        other => Err(EvalError::TypeGuard {
            requested: ValueType::Float,
            actual: other.value_type(),
        }),
    }
}

/// Return kind for float-only functions.
fn float_only(args: &[ValueType]) -> ValueType {
    if args.iter().all(|ty| *ty == ValueType::Float) {
        ValueType::Float
    } else {
        ValueType::Invalid
    }
}

/// Return kind for functions preserving their numeric argument kind.
fn numeric_preserving(args: &[ValueType]) -> ValueType {
    match args {
        [ValueType::Float, rest @ ..] if rest.iter().all(|ty| *ty == ValueType::Float) => {
            ValueType::Float
        }
        [ValueType::Int, rest @ ..] if rest.iter().all(|ty| *ty == ValueType::Int) => {
            ValueType::Int
        }
        _ => ValueType::Invalid,
    }
}

fn abs(args: &[Value]) -> Result<Value, EvalError> {
    match &args[0] {
        Value::Float(v) => Ok(Value::Float(v.abs())),
        Value::Int(v) => Ok(Value::Int(v.wrapping_abs())),
        other => Err(EvalError::TypeGuard {
            requested: ValueType::Float,
            actual: other.value_type(),
        }),
    }
}

fn ceil(args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Float(want_float(&args[0])?.ceil()))
}

fn floor(args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Float(want_float(&args[0])?.floor()))
}

fn round(args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Float(want_float(&args[0])?.round()))
}

// sqrt of a negative returns NaN (IEEE-754).
fn sqrt(args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Float(want_float(&args[0])?.sqrt()))
}

fn log(args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Float(want_float(&args[0])?.ln()))
}

fn log10(args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Float(want_float(&args[0])?.log10()))
}

fn exp(args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Float(want_float(&args[0])?.exp()))
}

fn pow(args: &[Value]) -> Result<Value, EvalError> {
    let base = want_float(&args[0])?;
    let exp = want_float(&args[1])?;
    Ok(Value::Float(base.powf(exp)))
}

fn min(args: &[Value]) -> Result<Value, EvalError> {
    match (&args[0], &args[1]) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(*a.min(b))),
        _ => Ok(Value::Float(want_float(&args[0])?.min(want_float(&args[1])?))),
    }
}

fn max(args: &[Value]) -> Result<Value, EvalError> {
    match (&args[0], &args[1]) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(*a.max(b))),
        _ => Ok(Value::Float(want_float(&args[0])?.max(want_float(&args[1])?))),
    }
}

pub fn install(registry: &mut FunctionRegistry) {
    registry.register("abs", NativeFunction::new(1, numeric_preserving, abs));
    registry.register("ceil", NativeFunction::new(1, float_only, ceil));
    registry.register("floor", NativeFunction::new(1, float_only, floor));
    registry.register("round", NativeFunction::new(1, float_only, round));
    registry.register("sqrt", NativeFunction::new(1, float_only, sqrt));
    registry.register("log", NativeFunction::new(1, float_only, log));
    registry.register("log10", NativeFunction::new(1, float_only, log10));
    registry.register("exp", NativeFunction::new(1, float_only, exp));
    registry.register("pow", NativeFunction::new(2, float_only, pow));
    registry.register("min", NativeFunction::new(2, numeric_preserving, min));
    registry.register("max", NativeFunction::new(2, numeric_preserving, max));
}
