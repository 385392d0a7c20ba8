//! Evaluation scope carrying variables and functions for one item.

use std::collections::HashMap;
use std::sync::Arc;

use bon::Builder;

use crate::interpreter::functions::FunctionRegistry;

/// Mutable evaluation context threaded through a render.
///
/// A variable that is not defined reads as the empty string; that is a
/// normal state, not an error. Functions such as `set` mutate the variables
/// in place, so one scope must not be shared between concurrent renders.
///
/// # Example
///
/// ```
/// use alto_dsl::Scope;
/// use std::collections::HashMap;
///
/// let mut scope = Scope::builder()
///     .variables(HashMap::from([("artist".to_string(), "Low".to_string())]))
///     .build();
///
/// assert_eq!(scope.get("artist"), "Low");
/// assert_eq!(scope.get("album"), "");
///
/// scope.set("album", "Things We Lost in the Fire");
/// assert!(scope.contains("album"));
/// ```
#[derive(Debug, Clone, Builder)]
pub struct Scope {
    /// Variables visible to `%name%` references.
    #[builder(default)]
    variables: HashMap<String, String>,

    /// Functions visible to `<name(...)>` calls.
    #[builder(default = Arc::new(FunctionRegistry::with_defaults()))]
    functions: Arc<FunctionRegistry>,
}

impl Scope {
    /// Create a scope with no variables and the given functions.
    pub fn new(functions: Arc<FunctionRegistry>) -> Self {
        Self {
            variables: HashMap::new(),
            functions,
        }
    }

    /// Get a variable, or the empty string if it is not defined.
    pub fn get(&self, name: &str) -> &str {
        self.variables.get(name).map_or("", String::as_str)
    }

    /// Check if a variable is defined.
    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Define or overwrite a variable, returning the previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.variables.insert(name.into(), value.into())
    }

    /// Remove a variable, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.variables.remove(name)
    }

    /// Replace all variables, keeping the functions.
    ///
    /// Hosts call this between items so one scope can serve a whole run.
    pub fn reset(&mut self, variables: HashMap<String, String>) {
        self.variables = variables;
    }

    pub fn variables(&self) -> &HashMap<String, String> {
        &self.variables
    }

    pub fn functions(&self) -> &Arc<FunctionRegistry> {
        &self.functions
    }
}
