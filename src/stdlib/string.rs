//! String package.
//!
//! Functions: length, contains, has_prefix, has_suffix, to_lower, to_upper,
//! trim.

use crate::eval::{EvalError, FunctionRegistry, NativeFunction};
use crate::value::{Value, ValueType};

fn want_string(value: &Value) -> Result<&str, EvalError> {
    match value {
        Value::String(v) => Ok(v),
        other => Err(EvalError::TypeGuard {
            requested: ValueType::String,
            actual: other.value_type(),
        }),
    }
}

fn all_strings(args: &[ValueType]) -> bool {
    args.iter().all(|ty| *ty == ValueType::String)
}

fn strings_to_int(args: &[ValueType]) -> ValueType {
    if all_strings(args) {
        ValueType::Int
    } else {
        ValueType::Invalid
    }
}

fn strings_to_bool(args: &[ValueType]) -> ValueType {
    if all_strings(args) {
        ValueType::Bool
    } else {
        ValueType::Invalid
    }
}

fn strings_to_string(args: &[ValueType]) -> ValueType {
    if all_strings(args) {
        ValueType::String
    } else {
        ValueType::Invalid
    }
}

fn length(args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Int(want_string(&args[0])?.chars().count() as i64))
}

fn contains(args: &[Value]) -> Result<Value, EvalError> {
    let haystack = want_string(&args[0])?;
    let needle = want_string(&args[1])?;
    Ok(Value::Bool(haystack.contains(needle)))
}

fn has_prefix(args: &[Value]) -> Result<Value, EvalError> {
    let s = want_string(&args[0])?;
    let prefix = want_string(&args[1])?;
    Ok(Value::Bool(s.starts_with(prefix)))
}

fn has_suffix(args: &[Value]) -> Result<Value, EvalError> {
    let s = want_string(&args[0])?;
    let suffix = want_string(&args[1])?;
    Ok(Value::Bool(s.ends_with(suffix)))
}

fn to_lower(args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::String(want_string(&args[0])?.to_lowercase()))
}

fn to_upper(args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::String(want_string(&args[0])?.to_uppercase()))
}

fn trim(args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::String(want_string(&args[0])?.trim().to_string()))
}

pub fn install(registry: &mut FunctionRegistry) {
    registry.register("length", NativeFunction::new(1, strings_to_int, length));
    registry.register("contains", NativeFunction::new(2, strings_to_bool, contains));
    registry.register(
        "has_prefix",
        NativeFunction::new(2, strings_to_bool, has_prefix),
    );
    registry.register(
        "has_suffix",
        NativeFunction::new(2, strings_to_bool, has_suffix),
    );
    registry.register(
        "to_lower",
        NativeFunction::new(1, strings_to_string, to_lower),
    );
    registry.register(
        "to_upper",
        NativeFunction::new(1, strings_to_string, to_upper),
    );
    registry.register("trim", NativeFunction::new(1, strings_to_string, trim));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_counts_chars() {
        assert_eq!(
            length(&[Value::String("héllo".into())]).unwrap(),
            Value::Int(5)
        );
    }

    #[test]
    fn contains_and_affixes() {
        let args = [Value::String("h001.example.com".into()), Value::String("example".into())];
        assert_eq!(contains(&args).unwrap(), Value::Bool(true));

        let args = [Value::String("h001.example.com".into()), Value::String("h001".into())];
        assert_eq!(has_prefix(&args).unwrap(), Value::Bool(true));
        assert_eq!(has_suffix(&args).unwrap(), Value::Bool(false));
    }

    #[test]
    fn case_and_trim() {
        assert_eq!(
            to_upper(&[Value::String("abc".into())]).unwrap(),
            Value::String("ABC".into())
        );
        assert_eq!(
            trim(&[Value::String("  x  ".into())]).unwrap(),
            Value::String("x".into())
        );
    }
}
