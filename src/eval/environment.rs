//! Variable bindings for one procedure invocation.
//!
//! Scoping is function-level, matching the semantics of the synthesized
//! procedures: a loop variable stays visible after its loop, and every
//! assignment binds in the single call frame. Each invocation allocates a
//! fresh environment, so compiled templates share no state across calls.

use rustc_hash::FxHashMap;

use super::value::Value;

/// The call frame for one invocation.
#[derive(Debug, Default)]
pub struct Environment {
    bindings: FxHashMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Environment::default()
    }

    /// Bind or rebind a variable.
    pub fn assign(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.insert(name.into(), value);
    }

    /// Look up a variable, cloning its value.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.bindings.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_and_lookup() {
        let mut env = Environment::new();
        assert_eq!(env.lookup("x"), None);
        env.assign("x", Value::Int(1));
        assert_eq!(env.lookup("x"), Some(Value::Int(1)));
        env.assign("x", Value::str("two"));
        assert_eq!(env.lookup("x"), Some(Value::str("two")));
    }
}
