//! Builtin function registry.
//!
//! Call nodes resolve their target here on first evaluation. The registry is
//! shared read-only through the execution state; the standard registry
//! carries the stdlib helpers.

use std::sync::{Arc, LazyLock};

use hashbrown::HashMap;

use crate::eval::EvalError;
use crate::stdlib;
use crate::value::{Value, ValueType};

/// A function callable from an expression.
pub trait BuiltinFn: Send + Sync {
    /// Number of arguments the function expects.
    fn arity(&self) -> usize;

    /// The kind of value the function returns for the given argument kinds.
    ///
    /// Lets call nodes answer type queries without invoking the function.
    /// Returns [`ValueType::Invalid`] for argument kinds the function does
    /// not accept.
    fn return_type(&self, args: &[ValueType]) -> ValueType;

    /// Invoke the function. Arity has already been checked by the caller;
    /// argument kinds are the function's own responsibility.
    fn call(&self, args: &[Value]) -> Result<Value, EvalError>;
}

/// A builtin defined by plain function pointers.
pub struct NativeFunction {
    arity: usize,
    return_type: fn(&[ValueType]) -> ValueType,
    call: fn(&[Value]) -> Result<Value, EvalError>,
}

impl NativeFunction {
    pub fn new(
        arity: usize,
        return_type: fn(&[ValueType]) -> ValueType,
        call: fn(&[Value]) -> Result<Value, EvalError>,
    ) -> Arc<Self> {
        Arc::new(NativeFunction {
            arity,
            return_type,
            call,
        })
    }
}

impl BuiltinFn for NativeFunction {
    fn arity(&self) -> usize {
        self.arity
    }

    fn return_type(&self, args: &[ValueType]) -> ValueType {
        (self.return_type)(args)
    }

    fn call(&self, args: &[Value]) -> Result<Value, EvalError> {
        (self.call)(args)
    }
}

#[derive(Default)]
pub struct FunctionRegistry {
    funcs: HashMap<String, Arc<dyn BuiltinFn>>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        FunctionRegistry::default()
    }

    pub fn register(&mut self, name: impl Into<String>, f: Arc<dyn BuiltinFn>) {
        self.funcs.insert(name.into(), f);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn BuiltinFn>> {
        self.funcs.get(name).cloned()
    }

    /// The shared registry of stdlib builtins.
    pub fn standard() -> Arc<FunctionRegistry> {
        static STANDARD: LazyLock<Arc<FunctionRegistry>> =
            LazyLock::new(|| Arc::new(stdlib::standard()));
        STANDARD.clone()
    }
}
