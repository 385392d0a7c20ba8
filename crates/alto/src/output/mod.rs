//! Terminal output: diagnostics and tables.

mod diagnostic;
pub mod table;

pub use diagnostic::FormatDiagnostic;
