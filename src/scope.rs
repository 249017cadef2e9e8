//! Runtime binding environment for reference lookups.
//!
//! A scope maps names to values for one evaluation tick. Nested scopes (used
//! by callers that introduce local bindings) form an immutable snapshot
//! chain: a child holds an `Arc` to its parent and lookups walk child to
//! parent. A shared `&Scope` doubles as the read-only view handed to type
//! queries.

use std::sync::Arc;

use hashbrown::HashMap;

use crate::value::Value;

#[derive(Debug, Clone, Default)]
pub struct Scope {
    bindings: HashMap<String, Value>,
    parent: Option<Arc<Scope>>,
}

impl Scope {
    pub fn new() -> Self {
        Scope::default()
    }

    /// A child scope whose lookups fall through to `parent`.
    pub fn child(parent: Arc<Scope>) -> Self {
        Scope {
            bindings: HashMap::new(),
            parent: Some(parent),
        }
    }

    /// Bind `name` in this scope, shadowing any parent binding.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.insert(name.into(), value);
    }

    /// Look up `name`, searching this scope first and then the parent chain.
    pub fn get(&self, name: &str) -> Option<&Value> {
        match self.bindings.get(name) {
            Some(value) => Some(value),
            None => self.parent.as_deref().and_then(|parent| parent.get(name)),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Names bound directly in this scope (parent bindings excluded).
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }
}
