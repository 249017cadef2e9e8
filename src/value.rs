//! The primitive value domain shared by scopes and the evaluator.
//!
//! Every value flowing through a lambda expression is one of the kinds in
//! [`ValueType`]. The set is closed: the evaluator, the scope and the
//! operator dispatch table all agree on it.

use std::fmt;
use std::sync::{Arc, LazyLock};

use chrono::{DateTime, TimeDelta, Utc};
use regex::Regex;
use snafu::Snafu;

use crate::ast;

/// The kind of a runtime value.
///
/// `Invalid` is a sentinel meaning "no value / unknown" and never describes
/// an actual [`Value`]; it shows up in type inference when a subtree cannot
/// be resolved statically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Float,
    Int,
    String,
    Bool,
    Regex,
    Time,
    Duration,
    Lambda,
    Invalid,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Float => "float64",
            ValueType::Int => "int64",
            ValueType::String => "string",
            ValueType::Bool => "boolean",
            ValueType::Regex => "regex",
            ValueType::Time => "time",
            ValueType::Duration => "duration",
            ValueType::Lambda => "lambda",
            ValueType::Invalid => "invalid type",
        };
        f.write_str(name)
    }
}

/// Error returned when a kind has no zero value.
#[derive(Debug, Snafu)]
#[snafu(display("no zero value for {kind} kind"))]
pub struct NoZeroValue {
    pub kind: ValueType,
}

static EMPTY_REGEX: LazyLock<Arc<Regex>> =
    LazyLock::new(|| Arc::new(Regex::new("").expect("empty pattern is valid")));

impl ValueType {
    /// The zero value of this kind.
    ///
    /// `Invalid` has no values at all and `Lambda` has no meaningful zero;
    /// both are errors.
    pub fn zero(self) -> Result<Value, NoZeroValue> {
        match self {
            ValueType::Float => Ok(Value::Float(0.0)),
            ValueType::Int => Ok(Value::Int(0)),
            ValueType::String => Ok(Value::String(String::new())),
            ValueType::Bool => Ok(Value::Bool(false)),
            ValueType::Regex => Ok(Value::Regex(EMPTY_REGEX.clone())),
            ValueType::Time => Ok(Value::Time(DateTime::UNIX_EPOCH)),
            ValueType::Duration => Ok(Value::Duration(TimeDelta::zero())),
            ValueType::Lambda | ValueType::Invalid => Err(NoZeroValue { kind: self }),
        }
    }
}

/// A runtime value bound in a scope or produced by evaluation.
#[derive(Debug, Clone)]
pub enum Value {
    Float(f64),
    Int(i64),
    String(String),
    Bool(bool),
    Regex(Arc<Regex>),
    Time(DateTime<Utc>),
    Duration(TimeDelta),
    /// An unevaluated expression carried as an opaque value. Lambdas take
    /// part in scope bindings but never in arithmetic or comparison.
    Lambda(Arc<ast::Node>),
}

impl Value {
    /// Reflect this value back to its kind.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Float(_) => ValueType::Float,
            Value::Int(_) => ValueType::Int,
            Value::String(_) => ValueType::String,
            Value::Bool(_) => ValueType::Bool,
            Value::Regex(_) => ValueType::Regex,
            Value::Time(_) => ValueType::Time,
            Value::Duration(_) => ValueType::Duration,
            Value::Lambda(_) => ValueType::Lambda,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            // Compiled regexes compare by pattern source.
            (Value::Regex(a), Value::Regex(b)) => a.as_str() == b.as_str(),
            (Value::Time(a), Value::Time(b)) => a == b,
            (Value::Duration(a), Value::Duration(b)) => a == b,
            (Value::Lambda(a), Value::Lambda(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Float(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "{v:?}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Regex(v) => write!(f, "/{}/", v.as_str()),
            Value::Time(v) => write!(f, "{}", v.to_rfc3339()),
            Value::Duration(v) => write!(f, "{}ns", duration::nanos(*v)),
            Value::Lambda(_) => f.write_str("lambda"),
        }
    }
}

/// Duration arithmetic helpers.
///
/// The evaluator works at nanosecond resolution; every duration it produces
/// is clamped to the i64-nanosecond range, and integer arithmetic on the
/// nanosecond counts wraps rather than panics.
pub(crate) mod duration {
    use chrono::TimeDelta;

    pub(crate) fn nanos(d: TimeDelta) -> i64 {
        d.num_nanoseconds().unwrap_or_else(|| {
            if d < TimeDelta::zero() {
                i64::MIN
            } else {
                i64::MAX
            }
        })
    }

    pub(crate) fn from_nanos(n: i64) -> TimeDelta {
        TimeDelta::nanoseconds(n)
    }

    pub(crate) fn add(l: TimeDelta, r: TimeDelta) -> TimeDelta {
        from_nanos(nanos(l).wrapping_add(nanos(r)))
    }

    pub(crate) fn sub(l: TimeDelta, r: TimeDelta) -> TimeDelta {
        from_nanos(nanos(l).wrapping_sub(nanos(r)))
    }

    pub(crate) fn neg(d: TimeDelta) -> TimeDelta {
        from_nanos(nanos(d).wrapping_neg())
    }

    pub(crate) fn scale_int(d: TimeDelta, k: i64) -> TimeDelta {
        from_nanos(nanos(d).wrapping_mul(k))
    }

    // Float scaling truncates toward zero nanoseconds.
    pub(crate) fn scale_float(d: TimeDelta, k: f64) -> TimeDelta {
        from_nanos((nanos(d) as f64 * k) as i64)
    }

    /// Divisor must be checked non-zero by the caller.
    pub(crate) fn div_int(d: TimeDelta, k: i64) -> TimeDelta {
        from_nanos(nanos(d).wrapping_div(k))
    }

    /// Divisor must be checked non-zero by the caller.
    pub(crate) fn div_float(d: TimeDelta, k: f64) -> TimeDelta {
        from_nanos((nanos(d) as f64 / k) as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_type_of() {
        let expectations: Vec<(Value, ValueType)> = vec![
            (Value::Float(0.0), ValueType::Float),
            (Value::Int(0), ValueType::Int),
            (Value::String("rill rulz".into()), ValueType::String),
            (Value::Bool(true), ValueType::Bool),
            (
                Value::Regex(Arc::new(Regex::new(r"\d").unwrap())),
                ValueType::Regex,
            ),
            (Value::Duration(TimeDelta::nanoseconds(5)), ValueType::Duration),
            (Value::Time(DateTime::UNIX_EPOCH), ValueType::Time),
        ];

        for (value, expected) in expectations {
            assert_eq!(value.value_type(), expected, "value_type of {value}");
        }
    }

    #[test]
    fn zero_values() {
        assert_eq!(ValueType::Float.zero().unwrap(), Value::Float(0.0));
        assert_eq!(ValueType::Int.zero().unwrap(), Value::Int(0));
        assert_eq!(
            ValueType::String.zero().unwrap(),
            Value::String(String::new())
        );
        assert_eq!(ValueType::Bool.zero().unwrap(), Value::Bool(false));
        assert_eq!(
            ValueType::Time.zero().unwrap(),
            Value::Time(DateTime::UNIX_EPOCH)
        );
        assert_eq!(
            ValueType::Duration.zero().unwrap(),
            Value::Duration(TimeDelta::zero())
        );
        assert!(matches!(
            ValueType::Regex.zero().unwrap(),
            Value::Regex(re) if re.as_str().is_empty()
        ));
        assert!(ValueType::Invalid.zero().is_err());
        assert!(ValueType::Lambda.zero().is_err());
    }

    #[test]
    fn duration_clamps_to_nanosecond_range() {
        let huge = TimeDelta::try_days(200_000).unwrap();
        assert_eq!(duration::nanos(huge), i64::MAX);
        assert_eq!(duration::nanos(-huge), i64::MIN);
    }

    #[test]
    fn duration_float_scaling_truncates() {
        let d = duration::scale_float(TimeDelta::nanoseconds(3), 0.5);
        assert_eq!(duration::nanos(d), 1);
    }
}
