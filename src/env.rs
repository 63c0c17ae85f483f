// ABOUTME: Lexically-scoped environment with const-flag bindings

use crate::error::EvalError;
use crate::value::Value;
use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::Rc;

struct Binding {
    value: Value,
    is_const: bool,
}

#[derive(Default)]
pub struct Environment {
    bindings: RefCell<IndexMap<String, Binding>>,
    parent: Option<Rc<Environment>>,
}

impl Environment {
    /// Creates the global environment; it has no parent.
    pub fn new() -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(IndexMap::new()),
            parent: None,
        })
    }

    /// Creates a child scope of `parent` (function call frames, loop bodies,
    /// catch blocks).
    pub fn child(parent: Rc<Environment>) -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(IndexMap::new()),
            parent: Some(parent),
        })
    }

    /// Binds `name` in this scope, overwriting any existing binding of the
    /// same name in this scope (shadowing bindings in outer scopes).
    pub fn define(&self, name: impl Into<String>, value: Value, is_const: bool) {
        self.bindings
            .borrow_mut()
            .insert(name.into(), Binding { value, is_const });
    }

    /// Walks this scope and its parents looking for `name`.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(b) = self.bindings.borrow().get(name) {
            return Some(b.value.clone());
        }
        self.parent.as_ref().and_then(|p| p.get(name))
    }

    /// Walks the chain to find an existing binding and mutate it. If none
    /// exists anywhere in the chain, a new (non-const) binding is created
    /// in the *current* scope -- not the global one -- per the language's
    /// assignment semantics.
    pub fn assign(&self, name: &str, value: Value) -> Result<(), EvalError> {
        if self.assign_existing(name, value.clone())? {
            return Ok(());
        }
        self.define(name.to_string(), value, false);
        Ok(())
    }

    /// Returns `Ok(true)` if an existing binding was found and mutated,
    /// `Ok(false)` if no binding exists anywhere in the chain, and `Err` if
    /// the matching binding is const.
    fn assign_existing(&self, name: &str, value: Value) -> Result<bool, EvalError> {
        {
            let mut bindings = self.bindings.borrow_mut();
            if let Some(binding) = bindings.get_mut(name) {
                if binding.is_const {
                    return Err(EvalError::ConstAssignment(name.to_string()));
                }
                binding.value = value;
                return Ok(true);
            }
        }
        match &self.parent {
            Some(p) => p.assign_existing(name, value),
            None => Ok(false),
        }
    }

    /// Bindings declared directly in this scope, in insertion order; used
    /// by the REPL's `vars` command.
    pub fn own_bindings(&self) -> Vec<(String, Value)> {
        self.bindings
            .borrow()
            .iter()
            .map(|(k, b)| (k.clone(), b.value.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn define_and_get() {
        let env = Environment::new();
        env.define("x", Value::Number(42.0), false);
        match env.get("x") {
            Some(Value::Number(n)) => assert_eq!(n, 42.0),
            _ => panic!("expected Number(42.0)"),
        }
    }

    #[test]
    fn undefined_symbol_is_none() {
        let env = Environment::new();
        assert!(env.get("missing").is_none());
    }

    #[test]
    fn child_sees_parent_bindings() {
        let parent = Environment::new();
        parent.define("x", Value::Number(1.0), false);
        let child = Environment::child(parent);
        assert!(matches!(child.get("x"), Some(Value::Number(n)) if n == 1.0));
    }

    #[test]
    fn child_shadows_parent() {
        let parent = Environment::new();
        parent.define("x", Value::Number(1.0), false);
        let child = Environment::child(parent);
        child.define("x", Value::Number(2.0), false);
        assert!(matches!(child.get("x"), Some(Value::Number(n)) if n == 2.0));
    }

    #[test]
    fn assign_mutates_outer_binding_not_global() {
        let global = Environment::new();
        let mid = Environment::child(global.clone());
        mid.define("x", Value::Number(1.0), false);
        let inner = Environment::child(mid.clone());
        inner.assign("x", Value::Number(2.0)).unwrap();
        assert!(matches!(mid.get("x"), Some(Value::Number(n)) if n == 2.0));
        assert!(global.get("x").is_none());
    }

    #[test]
    fn assign_with_no_existing_binding_creates_in_current_scope() {
        let global = Environment::new();
        let inner = Environment::child(global.clone());
        inner.assign("y", Value::Number(5.0)).unwrap();
        assert!(global.get("y").is_none());
        assert!(matches!(inner.get("y"), Some(Value::Number(n)) if n == 5.0));
    }

    #[test]
    fn const_binding_rejects_assignment() {
        let env = Environment::new();
        env.define("x", Value::Number(1.0), true);
        let err = env.assign("x", Value::Number(2.0)).unwrap_err();
        assert!(matches!(err, EvalError::ConstAssignment(name) if name == "x"));
        assert!(matches!(env.get("x"), Some(Value::Number(n)) if n == 1.0));
    }
}
