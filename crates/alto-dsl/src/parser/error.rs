//! Parse error types for format strings.

use thiserror::Error;

use super::lexer::TokenKind;

/// An error that occurred while tokenizing or parsing a format string.
///
/// Every variant carries the byte offset in the format string where the
/// problem was detected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The format string ends with a lone backslash.
    #[error("unterminated escape sequence at offset {offset}")]
    UnterminatedEscape { offset: usize },

    /// A structural error in the token stream.
    #[error("syntax error at offset {offset}: {kind}")]
    Syntax { offset: usize, kind: SyntaxErrorKind },
}

impl ParseError {
    /// Byte offset of the error in the format string.
    pub fn offset(&self) -> usize {
        match self {
            ParseError::UnterminatedEscape { offset } | ParseError::Syntax { offset, .. } => *offset,
        }
    }

    /// The syntax error kind, if this is a syntax error.
    pub fn syntax_kind(&self) -> Option<&SyntaxErrorKind> {
        match self {
            ParseError::Syntax { kind, .. } => Some(kind),
            ParseError::UnterminatedEscape { .. } => None,
        }
    }
}

/// The structural problem behind a [`ParseError::Syntax`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxErrorKind {
    /// A `{` without a matching `}`.
    #[error("unterminated group")]
    UnterminatedGroup,

    /// A call that does not follow `<name(args)>`.
    #[error("unterminated call, expected {expected}")]
    UnterminatedCall { expected: &'static str },

    /// A `%` inside a group or call without a name and closing `%`.
    #[error("unterminated variable")]
    UnterminatedVariable,

    /// A variable name containing non-word characters.
    #[error("invalid variable name '{0}'")]
    InvalidVariableName(String),

    /// A function name containing non-word characters.
    #[error("invalid function name '{0}'")]
    InvalidFunctionName(String),

    /// A token that cannot start a node here.
    #[error("unexpected {0}")]
    UnexpectedToken(TokenKind),
}
