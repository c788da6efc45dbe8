use std::{cell::RefCell, collections::HashMap, rc::{Rc, Weak}};

use log::trace;

use crate::value::Value;

pub type EnvironmentRef = Rc<RefCell<Environment>>;

/// A scope mapping symbol names to values, chained to its enclosing scope.
///
/// Scopes are shared through [`EnvironmentRef`] because several lambdas
/// (and their in-flight calls) can hold the same scope. The link to the
/// enclosing scope does not own it: only the global scope is ever a parent,
/// and it is owned by the evaluation context.
#[derive(Debug, Default)]
pub struct Environment {
    bindings: HashMap<String, Value>,
    parent: Option<Weak<RefCell<Environment>>>,
}

impl Environment {
    pub fn root() -> EnvironmentRef {
        Rc::new(RefCell::new(Self::default()))
    }

    pub fn with_parent(parent: &EnvironmentRef) -> EnvironmentRef {
        Rc::new(RefCell::new(Self {
            bindings: HashMap::new(),
            parent: Some(Rc::downgrade(parent)),
        }))
    }

    fn parent(env: &EnvironmentRef) -> Option<EnvironmentRef> {
        env.borrow().parent.as_ref().and_then(Weak::upgrade)
    }

    /// A fresh scope holding copies of the local bindings of `env`, linked
    /// to the same parent. Calls bind into a fork so that re-entrant calls
    /// never see each other's arguments.
    pub fn fork(env: &EnvironmentRef) -> EnvironmentRef {
        let env = env.borrow();
        Rc::new(RefCell::new(Self {
            bindings: env.bindings.clone(),
            parent: env.parent.clone(),
        }))
    }

    /// The scope a lambda written in `env` closes over: a copy of every
    /// binding visible from `env` short of the global scope, linked to the
    /// global scope. The copy is taken when the lambda is made, later
    /// rebinding in `env` is not seen.
    pub fn capture(env: &EnvironmentRef) -> EnvironmentRef {
        let mut bindings = HashMap::new();
        let mut current = env.clone();
        while let Some(parent) = Self::parent(&current) {
            for (name, value) in current.borrow().bindings.iter() {
                bindings.entry(name.clone()).or_insert_with(|| value.clone());
            }
            current = parent;
        }

        Rc::new(RefCell::new(Self {
            bindings,
            parent: Some(Rc::downgrade(&current)),
        }))
    }

    /// Looks `name` up in this scope, then in each enclosing scope in turn.
    pub fn get(env: &EnvironmentRef, name: &str) -> Value {
        if let Some(value) = env.borrow().bindings.get(name) {
            return value.clone();
        }
        match Self::parent(env) {
            Some(parent) => Self::get(&parent, name),
            None => Value::error(format!("Unbound symbol: '{}'", name)),
        }
    }

    /// Binds `name` in this scope only, replacing any previous binding.
    pub fn put(env: &EnvironmentRef, name: &str, value: Value) {
        trace!("binding '{}' to {}", name, value);
        env.borrow_mut().bindings.insert(name.to_owned(), value);
    }

    /// Binds `name` in the outermost scope of the chain.
    pub fn define(env: &EnvironmentRef, name: &str, value: Value) {
        match Self::parent(env) {
            Some(parent) => Self::define(&parent, name, value),
            None => Self::put(env, name, value),
        }
    }

    /// Whether `name` is bound in this scope itself, ignoring parents
    pub fn is_local(env: &EnvironmentRef, name: &str) -> bool {
        env.borrow().bindings.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_walks_the_parent_chain() {
        let global = Environment::root();
        Environment::put(&global, "x", Value::Number(1));
        let local = Environment::with_parent(&global);

        assert_eq!(Environment::get(&local, "x").to_string(), "1");
        assert_eq!(Environment::get(&local, "y").to_string(), "Error: Unbound symbol: 'y'");
    }

    #[test]
    fn put_shadows_locally() {
        let global = Environment::root();
        Environment::put(&global, "x", Value::Number(1));
        let local = Environment::with_parent(&global);
        Environment::put(&local, "x", Value::Number(2));

        assert_eq!(Environment::get(&local, "x").to_string(), "2");
        assert_eq!(Environment::get(&global, "x").to_string(), "1");
    }

    #[test]
    fn define_reaches_the_root() {
        let global = Environment::root();
        let middle = Environment::with_parent(&global);
        let inner = Environment::with_parent(&middle);
        Environment::define(&inner, "x", Value::Number(3));

        assert!(Environment::is_local(&global, "x"));
        assert!(!Environment::is_local(&middle, "x"));
        assert!(!Environment::is_local(&inner, "x"));
    }

    #[test]
    fn fork_copies_without_aliasing() {
        let global = Environment::root();
        let scope = Environment::with_parent(&global);
        Environment::put(&scope, "a", Value::Number(1));

        let call = Environment::fork(&scope);
        Environment::put(&call, "a", Value::Number(2));
        Environment::put(&call, "b", Value::Number(3));

        assert_eq!(Environment::get(&scope, "a").to_string(), "1");
        assert!(!Environment::is_local(&scope, "b"));

        Environment::put(&global, "g", Value::Number(4));
        assert_eq!(Environment::get(&call, "g").to_string(), "4");
    }

    #[test]
    fn capture_flattens_onto_the_global_scope() {
        let global = Environment::root();
        Environment::put(&global, "g", Value::Number(0));
        let outer = Environment::with_parent(&global);
        Environment::put(&outer, "a", Value::Number(1));
        Environment::put(&outer, "b", Value::Number(2));
        let inner = Environment::with_parent(&outer);
        Environment::put(&inner, "a", Value::Number(3));

        let captured = Environment::capture(&inner);
        assert_eq!(Environment::get(&captured, "a").to_string(), "3");
        assert_eq!(Environment::get(&captured, "b").to_string(), "2");
        assert!(!Environment::is_local(&captured, "g"));
        assert!(Rc::ptr_eq(&Environment::parent(&captured).unwrap(), &global));

        Environment::put(&outer, "b", Value::Number(5));
        assert_eq!(Environment::get(&captured, "b").to_string(), "2");

        let at_root = Environment::capture(&global);
        Environment::define(&at_root, "h", Value::Number(6));
        assert!(Environment::is_local(&global, "h"));
    }

    #[test]
    fn parent_links_do_not_keep_the_parent_alive() {
        let global = Environment::root();
        let local = Environment::with_parent(&global);
        assert_eq!(Rc::strong_count(&global), 1);

        drop(global);
        assert_eq!(Environment::get(&local, "x").to_string(), "Error: Unbound symbol: 'x'");
    }
}
