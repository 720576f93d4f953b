//! Lexical environments (spec.md §3, §4.4).
//!
//! Grounded on the teacher's `interpreter::Scope` chain in
//! `src/interpreter/mod.rs` (`Rc<RefCell<..>>` scopes with an optional
//! parent link, `HashMap`-backed bindings) generalized to the three-verb
//! contract (`Define`/`Assign`/`Get`) spec.md names explicitly.

use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

pub type EnvRef = Rc<RefCell<Environment>>;

pub struct Environment {
    bindings: HashMap<String, Value>,
    parent: Option<EnvRef>,
}

impl Environment {
    pub fn root() -> EnvRef {
        Rc::new(RefCell::new(Environment {
            bindings: HashMap::new(),
            parent: None,
        }))
    }

    pub fn child(parent: &EnvRef) -> EnvRef {
        Rc::new(RefCell::new(Environment {
            bindings: HashMap::new(),
            parent: Some(Rc::clone(parent)),
        }))
    }

    /// Introduces `name` in *this* scope. Fails if `name` is already bound
    /// here (spec.md §4.4: re-declaring in the same scope is an error;
    /// shadowing an outer scope's binding is fine).
    pub fn define(&mut self, name: &str, value: Value) -> Result<(), String> {
        if self.bindings.contains_key(name) {
            return Err(format!("'{name}' is already defined in this scope"));
        }
        self.bindings.insert(name.to_string(), value);
        Ok(())
    }

    /// Like [`Environment::define`] but overwrites a same-scope binding
    /// instead of failing. Used for implicit declaration on first
    /// assignment (spec.md §4.4) and for binding call parameters, where a
    /// fresh scope can never already hold the name but the distinction
    /// still matters for clarity at call sites.
    pub fn bind(&mut self, name: &str, value: Value) {
        self.bindings.insert(name.to_string(), value);
    }

    /// Updates the nearest enclosing scope (this one or a parent) that
    /// already defines `name`. Fails if no such scope exists.
    pub fn assign(env: &EnvRef, name: &str, value: Value) -> Result<(), String> {
        if env.borrow().bindings.contains_key(name) {
            env.borrow_mut().bindings.insert(name.to_string(), value);
            return Ok(());
        }
        let parent = env.borrow().parent.clone();
        match parent {
            Some(parent) => Environment::assign(&parent, name, value),
            None => Err(format!("'{name}' is not defined")),
        }
    }

    /// Looks up `name` starting in this scope and walking parents.
    pub fn get(env: &EnvRef, name: &str) -> Option<Value> {
        if let Some(v) = env.borrow().bindings.get(name) {
            return Some(v.clone());
        }
        let parent = env.borrow().parent.clone();
        match parent {
            Some(parent) => Environment::get(&parent, name),
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redefining_in_same_scope_fails() {
        let env = Environment::root();
        env.borrow_mut().define("x", Value::Number(1.0)).unwrap();
        assert!(env.borrow_mut().define("x", Value::Number(2.0)).is_err());
    }

    #[test]
    fn child_scope_can_shadow() {
        let parent = Environment::root();
        parent.borrow_mut().define("x", Value::Number(1.0)).unwrap();
        let child = Environment::child(&parent);
        child.borrow_mut().define("x", Value::Number(2.0)).unwrap();
        assert_eq!(Environment::get(&child, "x").unwrap().as_number(), Some(2.0));
        assert_eq!(Environment::get(&parent, "x").unwrap().as_number(), Some(1.0));
    }

    #[test]
    fn assign_updates_enclosing_scope() {
        let parent = Environment::root();
        parent.borrow_mut().define("x", Value::Number(1.0)).unwrap();
        let child = Environment::child(&parent);
        Environment::assign(&child, "x", Value::Number(9.0)).unwrap();
        assert_eq!(Environment::get(&parent, "x").unwrap().as_number(), Some(9.0));
    }

    #[test]
    fn assign_to_undefined_name_fails() {
        let env = Environment::root();
        assert!(Environment::assign(&env, "missing", Value::Nil).is_err());
    }

    #[test]
    fn get_searches_parents() {
        let parent = Environment::root();
        parent.borrow_mut().define("x", Value::Number(5.0)).unwrap();
        let child = Environment::child(&parent);
        assert_eq!(Environment::get(&child, "x").unwrap().as_number(), Some(5.0));
    }
}
