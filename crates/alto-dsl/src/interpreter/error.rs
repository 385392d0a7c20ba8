//! Error types for the format interpreter.

use std::error::Error as StdError;

use thiserror::Error;

use crate::interpreter::functions::Arity;
use crate::types::Control;

/// The result of evaluating a node or calling a function.
pub type EvalResult<T = String> = Result<T, Interrupt>;

/// An error that occurred while evaluating a format for one item.
#[derive(Debug, Error)]
pub enum EvalError {
    /// Call to a function that is not in the registry.
    #[error("unknown function '{name}'{}", did_you_mean(suggestions))]
    UnknownFunction {
        name: String,
        suggestions: Vec<String>,
    },

    /// Wrong number of arguments passed to a function.
    #[error(
        "function '{function}' expects {expected} argument(s), got {got} ({})",
        arity_direction(*got, *expected)
    )]
    Arity {
        function: String,
        expected: Arity,
        got: usize,
    },

    /// An integer comparison received a non-integer operand.
    #[error("function '{function}' expects integers, got '{value}'")]
    NotAnInteger { function: String, value: String },

    /// A `must` argument evaluated empty or failed.
    #[error("required field at argument {index} is {}", missing_reason(source.as_deref()))]
    RequiredFieldMissing {
        index: usize,
        #[source]
        source: Option<Box<EvalError>>,
    },

    /// `set` on a variable that already exists.
    #[error("variable '{name}' is already defined")]
    VariableAlreadyDefined { name: String },

    /// A host-supplied function failed.
    #[error("function '{function}' failed: {source}")]
    Host {
        function: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl EvalError {
    /// Wrap a host function failure.
    pub fn host(
        function: impl Into<String>,
        source: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        EvalError::Host {
            function: function.into(),
            source: source.into(),
        }
    }

    /// Returns true if this is an arity error with too few arguments.
    pub fn is_too_few_arguments(&self) -> bool {
        matches!(self, EvalError::Arity { expected, got, .. } if *got < expected.min())
    }
}

fn did_you_mean(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(", did you mean: {}?", suggestions.join(", "))
    }
}

fn missing_reason(source: Option<&EvalError>) -> &'static str {
    if source.is_some() { "invalid" } else { "empty" }
}

fn arity_direction(got: usize, expected: Arity) -> &'static str {
    if got < expected.min() { "too few" } else { "too many" }
}

/// The non-value path out of an evaluation: a control signal or an error.
#[derive(Debug, Error)]
pub enum Interrupt {
    #[error("{0}")]
    Control(Control),

    #[error(transparent)]
    Error(#[from] EvalError),
}

impl From<Control> for Interrupt {
    fn from(control: Control) -> Self {
        Interrupt::Control(control)
    }
}

/// Compute "did you mean?" suggestions for a name.
///
/// Returns up to three names from `available` within edit distance 1 (for
/// names of three characters or fewer) or 2 (otherwise), closest first.
pub fn compute_suggestions(name: &str, available: &[String]) -> Vec<String> {
    let max_distance = if name.chars().count() <= 3 { 1 } else { 2 };

    let mut candidates: Vec<(usize, &String)> = available
        .iter()
        .map(|candidate| (strsim::levenshtein(name, candidate), candidate))
        .filter(|(distance, _)| *distance <= max_distance)
        .collect();
    candidates.sort();

    candidates
        .into_iter()
        .take(3)
        .map(|(_, candidate)| candidate.clone())
        .collect()
}
