//! Parsed format strings ready for repeated rendering.

use std::str::FromStr;

use serde::Serialize;

use crate::interpreter::{EvalError, Interrupt, Scope, eval_nodes};
use crate::parser::{Node, ParseError, parse_str};
use crate::types::Outcome;

/// A parsed format string.
///
/// Parse once, then render against a fresh or reset [`Scope`] for each item.
/// The AST is never modified by rendering, so a `Format` can be shared
/// between threads that each own their scope.
///
/// # Example
///
/// ```
/// use alto_dsl::{Format, Outcome, Scope};
/// use std::collections::HashMap;
///
/// let format = Format::parse("{%artist% - %title%|%filename%}.mp3").unwrap();
///
/// let mut scope = Scope::builder()
///     .variables(HashMap::from([("filename".to_string(), "track01".to_string())]))
///     .build();
///
/// assert_eq!(
///     format.render(&mut scope).unwrap(),
///     Outcome::Value("track01.mp3".to_string())
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Format {
    source: String,
    nodes: Vec<Node>,
}

impl Format {
    /// Tokenize and parse a format string.
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        Ok(Self {
            source: source.to_string(),
            nodes: parse_str(source)?,
        })
    }

    /// The format string this was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The root nodes.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Returns true if the format has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Render the format against `scope`.
    ///
    /// # Errors
    ///
    /// Returns the first [`EvalError`] not absorbed by a group. Control
    /// signals are not errors and come back as [`Outcome::Control`].
    pub fn render(&self, scope: &mut Scope) -> Result<Outcome, EvalError> {
        match eval_nodes(&self.nodes, scope) {
            Ok(text) => Ok(Outcome::Value(text)),
            Err(Interrupt::Control(control)) => Ok(Outcome::Control(control)),
            Err(Interrupt::Error(error)) => Err(error),
        }
    }
}

impl FromStr for Format {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Format::parse(s)
    }
}
