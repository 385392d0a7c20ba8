//! Format string tokenizer and parser.
//!
//! This module turns a format string into tokens and then into an AST that
//! the interpreter evaluates. The AST is public so tooling can inspect it.

pub mod ast;
pub mod error;
mod grammar;
mod lexer;

pub use ast::*;
pub use error::{ParseError, SyntaxErrorKind};
pub use grammar::parse;
pub use lexer::{Token, TokenKind, tokenize};

/// Tokenize and parse a format string into root nodes.
pub fn parse_str(input: &str) -> Result<Vec<Node>, ParseError> {
    parse(&tokenize(input)?)
}
