//! Miette diagnostic wrapper for format string parse errors.
//!
//! Note: This module has an exception for `unused_assignments` because miette
//! derive macros read struct fields in generated code that rustc cannot track.
#![allow(unused_assignments)]

use alto_dsl::{ParseError, SyntaxErrorKind};
use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// A miette-compatible diagnostic for format string parse errors.
///
/// Note: Fields are read by miette derive macros, not directly by code.
#[derive(Debug, Error, Diagnostic)]
#[error("invalid format string: {message}")]
#[diagnostic(code(alto::format))]
pub struct FormatDiagnostic {
    #[source_code]
    src: NamedSource<String>,

    #[label("error here")]
    span: SourceSpan,

    message: String,

    #[help]
    help: Option<String>,
}

impl FormatDiagnostic {
    /// Create a diagnostic from a ParseError with the format string as source.
    pub fn from_parse_error(name: &str, format: &str, err: &ParseError) -> Self {
        let message = match err {
            ParseError::UnterminatedEscape { .. } => "unterminated escape sequence".to_string(),
            ParseError::Syntax { kind, .. } => kind.to_string(),
        };

        // Clamp offset to content length to avoid miette panic on out-of-bounds
        let offset = err.offset().min(format.len());
        let width = format[offset..].chars().next().map_or(0, char::len_utf8);

        FormatDiagnostic {
            src: NamedSource::new(name, format.to_string()),
            span: (offset, width).into(),
            message,
            help: help_for(err),
        }
    }
}

/// Suggest a fix for common mistakes.
fn help_for(err: &ParseError) -> Option<String> {
    let help = match err {
        ParseError::UnterminatedEscape { .. } => "escape a backslash as \\\\",
        ParseError::Syntax { kind, .. } => match kind {
            SyntaxErrorKind::UnterminatedGroup => "close the group with '}'",
            SyntaxErrorKind::UnterminatedCall { .. } => "calls are written <name(arg|arg)>",
            SyntaxErrorKind::UnterminatedVariable => "variables are written %name%",
            SyntaxErrorKind::InvalidVariableName(_) | SyntaxErrorKind::InvalidFunctionName(_) => {
                "names may only contain letters, digits and '_'"
            }
            SyntaxErrorKind::UnexpectedToken(_) => {
                "escape reserved characters with a backslash, e.g. \\( or \\|"
            }
        },
    };
    Some(help.to_string())
}
