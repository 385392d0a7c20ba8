use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::Serialize;

/// A control signal raised by a function instead of a value.
///
/// Control signals are not errors: they tell the host how to proceed with
/// the current item. Groups never swallow them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    /// Skip the current item and continue with the next one.
    Skip,
    /// Abort processing altogether (`<exit()>`).
    Exit,
}

impl Display for Control {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Control::Skip => write!(f, "skip requested"),
            Control::Exit => write!(f, "user requested exit"),
        }
    }
}

/// The result of rendering a format for one item.
///
/// # Example
///
/// ```
/// use alto_dsl::{Control, Format, Outcome, Scope};
///
/// let format = Format::parse("{<exit()>|unreachable}").unwrap();
/// let mut scope = Scope::builder().build();
///
/// match format.render(&mut scope).unwrap() {
///     Outcome::Value(path) => println!("{path}"),
///     Outcome::Control(control) => assert_eq!(control, Control::Exit),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The rendered string.
    Value(String),
    /// A function asked the host to skip or exit.
    Control(Control),
}

impl Outcome {
    /// Get the rendered string, if rendering produced one.
    pub fn as_value(&self) -> Option<&str> {
        match self {
            Outcome::Value(s) => Some(s),
            Outcome::Control(_) => None,
        }
    }

    /// Get the control signal, if one was raised.
    pub fn as_control(&self) -> Option<Control> {
        match self {
            Outcome::Control(c) => Some(*c),
            Outcome::Value(_) => None,
        }
    }
}
