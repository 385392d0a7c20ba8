//! Format string tokenizer using winnow.
//!
//! Splits a format string into reserved single-character tokens and merged
//! runs of literal text. A backslash makes the following code point literal.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::Serialize;
use winnow::combinator::{alt, preceded};
use winnow::prelude::*;
use winnow::token::{any, none_of};

use super::error::ParseError;

/// Code points with a meaning in the format language.
const RESERVED: [char; 8] = ['%', '{', '}', '|', '<', '>', '(', ')'];

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    /// A run of literal text.
    StringLiteral,
    /// `%`
    VarDelimiter,
    /// `{`
    LGroup,
    /// `}`
    RGroup,
    /// `|`
    GroupSeparator,
    /// `<`
    LCall,
    /// `>`
    RCall,
    /// `(`
    LArgs,
    /// `)`
    RArgs,
}

impl TokenKind {
    /// The token kind for a reserved code point, if it is one.
    pub fn reserved(c: char) -> Option<TokenKind> {
        match c {
            '%' => Some(TokenKind::VarDelimiter),
            '{' => Some(TokenKind::LGroup),
            '}' => Some(TokenKind::RGroup),
            '|' => Some(TokenKind::GroupSeparator),
            '<' => Some(TokenKind::LCall),
            '>' => Some(TokenKind::RCall),
            '(' => Some(TokenKind::LArgs),
            ')' => Some(TokenKind::RArgs),
            _ => None,
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            TokenKind::StringLiteral => write!(f, "text"),
            TokenKind::VarDelimiter => write!(f, "'%'"),
            TokenKind::LGroup => write!(f, "'{{'"),
            TokenKind::RGroup => write!(f, "'}}'"),
            TokenKind::GroupSeparator => write!(f, "'|'"),
            TokenKind::LCall => write!(f, "'<'"),
            TokenKind::RCall => write!(f, "'>'"),
            TokenKind::LArgs => write!(f, "'('"),
            TokenKind::RArgs => write!(f, "')'"),
        }
    }
}

/// A token produced from a format string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Literal text with escapes resolved.
    pub text: String,
    /// Byte offset of the token's first code point in the format string.
    pub offset: usize,
}

/// Tokenize a format string.
///
/// Adjacent literal code points, escaped or not, are merged into a single
/// [`TokenKind::StringLiteral`] token. An empty input produces no tokens.
///
/// # Errors
///
/// Returns [`ParseError::UnterminatedEscape`] if the input ends with a
/// backslash.
pub fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    let mut remaining = input;
    let mut tokens: Vec<Token> = Vec::new();

    while !remaining.is_empty() {
        let offset = input.len() - remaining.len();
        let (kind, c) = lexeme(&mut remaining)
            .map_err(|_| ParseError::UnterminatedEscape { offset })?;
        push_token(&mut tokens, kind, c, offset);
    }

    Ok(tokens)
}

/// Append a code point, extending the previous literal token when possible.
fn push_token(tokens: &mut Vec<Token>, kind: TokenKind, c: char, offset: usize) {
    if kind == TokenKind::StringLiteral
        && let Some(prev) = tokens.last_mut()
        && prev.kind == TokenKind::StringLiteral
    {
        prev.text.push(c);
        return;
    }
    tokens.push(Token {
        kind,
        text: c.to_string(),
        offset,
    });
}

/// Parse a single code point (escape, reserved, or literal).
fn lexeme(input: &mut &str) -> ModalResult<(TokenKind, char)> {
    alt((escaped, reserved, literal_char)).parse_next(input)
}

/// Parse an escape: `\` followed by any code point.
fn escaped(input: &mut &str) -> ModalResult<(TokenKind, char)> {
    preceded('\\', any)
        .map(|c: char| (TokenKind::StringLiteral, c))
        .parse_next(input)
}

/// Parse a reserved code point.
fn reserved(input: &mut &str) -> ModalResult<(TokenKind, char)> {
    any.verify_map(|c: char| TokenKind::reserved(c).map(|kind| (kind, c)))
        .parse_next(input)
}

/// Parse a plain literal code point.
fn literal_char(input: &mut &str) -> ModalResult<(TokenKind, char)> {
    none_of(|c: char| c == '\\' || RESERVED.contains(&c))
        .map(|c: char| (TokenKind::StringLiteral, c))
        .parse_next(input)
}
