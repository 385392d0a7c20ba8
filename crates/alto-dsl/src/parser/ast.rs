//! Public AST types for format strings.
//!
//! The tree is immutable once parsed and owns all of its children. It is
//! serializable so external tooling can inspect a parsed format.

use serde::Serialize;

/// A node in a parsed format string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    /// Constant text.
    Literal(String),
    /// A variable reference: `%name%`. Only valid inside a group or call.
    Variable(String),
    /// A concatenation unit.
    Field(Field),
    /// A fallback chain: `{a|b|c}`.
    Group(Group),
    /// A function call: `<name(arg|arg)>`.
    Call(Call),
}

/// An ordered sequence of nodes evaluated as one string.
///
/// If any variable reference in the field evaluates to an empty string, the
/// whole field is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Field {
    pub nodes: Vec<Node>,
}

impl Field {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// Returns true if the field has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// A group of fields; the first non-empty field wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    pub fields: Vec<Field>,
}

/// A call to a function in the scope's registry.
///
/// Arguments are fields and are passed to the function unevaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Call {
    /// Function name, trimmed of surrounding whitespace.
    pub name: String,
    pub args: Vec<Field>,
}

/// Returns true if `c` may appear in a variable or function name.
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Returns true if `s` is a non-empty run of word characters.
pub fn is_word(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_word_char)
}
