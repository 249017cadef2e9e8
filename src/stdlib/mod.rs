//! Standard builtin functions.
//!
//! These populate the default [`FunctionRegistry`] used by
//! `ExecutionState::default()`. Engines embedding the evaluator can start
//! from [`standard`] and register their own builtins on top.

pub mod math;
pub mod string;

use crate::eval::FunctionRegistry;

/// A registry with the math and string packages installed.
pub fn standard() -> FunctionRegistry {
    let mut registry = FunctionRegistry::new();
    math::install(&mut registry);
    string::install(&mut registry);
    registry
}
