//! Format interpreter.
//!
//! This module provides the evaluation engine that walks a parsed format
//! against a [`Scope`], resolving variables, falling back through groups, and
//! dispatching calls to the functions in the scope's registry.

mod builtins;
mod error;
mod evaluator;
mod functions;
mod scope;

pub use builtins::register_defaults;
pub use error::{EvalError, EvalResult, Interrupt, compute_suggestions};
pub use evaluator::{eval_call, eval_field, eval_group, eval_node, eval_nodes};
pub use functions::{Arity, Callable, FunctionRegistry, NativeFn};
pub use scope::Scope;
