//! Function registry for calls in format strings.
//!
//! Functions receive their argument fields unevaluated together with the
//! live scope, so each function decides which arguments to evaluate and in
//! what order. The registry is built once and shared by every scope.

use std::collections::HashMap;
use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::sync::Arc;

use serde::Serialize;

use crate::interpreter::builtins;
use crate::interpreter::error::EvalResult;
use crate::interpreter::scope::Scope;
use crate::parser::Field;

/// The number of arguments a function accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Arity {
    /// Exactly this many arguments.
    Exact(usize),
    /// This many arguments or more.
    AtLeast(usize),
    /// Any number of arguments, including none.
    Variadic,
}

impl Arity {
    /// Returns true if a call with `count` arguments is allowed.
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => count == n,
            Arity::AtLeast(n) => count >= n,
            Arity::Variadic => true,
        }
    }

    /// The smallest accepted argument count.
    pub fn min(self) -> usize {
        match self {
            Arity::Exact(n) | Arity::AtLeast(n) => n,
            Arity::Variadic => 0,
        }
    }
}

impl Display for Arity {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Arity::Exact(n) => write!(f, "{n}"),
            Arity::AtLeast(n) => write!(f, "at least {n}"),
            Arity::Variadic => write!(f, "any number of"),
        }
    }
}

/// A function callable from a format string as `<name(args)>`.
///
/// Arity is checked by the evaluator before `call` runs, so implementations
/// may index `args` up to the declared count.
pub trait Callable: Send + Sync {
    /// The accepted argument count.
    fn arity(&self) -> Arity;

    /// Invoke the function with unevaluated arguments.
    fn call(&self, args: &[Field], scope: &mut Scope) -> EvalResult;
}

/// Function signature accepted by [`FunctionRegistry::register_fn`].
pub type NativeFn = dyn Fn(&[Field], &mut Scope) -> EvalResult + Send + Sync;

/// A closure paired with its arity.
struct FnCallable {
    arity: Arity,
    f: Box<NativeFn>,
}

impl Callable for FnCallable {
    fn arity(&self) -> Arity {
        self.arity
    }

    fn call(&self, args: &[Field], scope: &mut Scope) -> EvalResult {
        (self.f)(args, scope)
    }
}

/// Registry mapping function names to callables.
///
/// Registering a name that already exists replaces the previous function,
/// which is how host functions override the defaults.
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, Arc<dyn Callable>>,
}

impl FunctionRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry containing the built-in functions.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        builtins::register_defaults(&mut registry);
        registry
    }

    /// Register a callable under `name`.
    pub fn register(&mut self, name: impl Into<String>, function: impl Callable + 'static) {
        self.functions.insert(name.into(), Arc::new(function));
    }

    /// Register a closure under `name`.
    pub fn register_fn<F>(&mut self, name: impl Into<String>, arity: Arity, f: F)
    where
        F: Fn(&[Field], &mut Scope) -> EvalResult + Send + Sync + 'static,
    {
        self.register(
            name,
            FnCallable {
                arity,
                f: Box::new(f),
            },
        );
    }

    /// Add every function from `other`, replacing functions with the same name.
    pub fn extend(&mut self, other: FunctionRegistry) {
        self.functions.extend(other.functions);
    }

    /// Get a function by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Callable>> {
        self.functions.get(name)
    }

    /// Check if a function exists.
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// All registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.functions.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl Debug for FunctionRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_set().entries(self.names()).finish()
    }
}
