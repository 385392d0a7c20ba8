//! Implementation of the `alto check` command.

use alto_dsl::Format;
use miette::{IntoDiagnostic, Report};
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::output::FormatDiagnostic;

/// Arguments for the check command.
#[derive(Debug, clap::Args)]
pub struct CheckArgs {
    /// Format string to check
    pub format: String,

    /// Output the parsed syntax tree as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output for parse errors.
#[derive(Serialize)]
struct CheckError {
    error: String,
    offset: usize,
}

/// Run the check command.
pub fn run_check(args: CheckArgs) -> miette::Result<i32> {
    match Format::parse(&args.format) {
        Ok(format) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&format).into_diagnostic()?);
            } else if format.is_empty() {
                println!("{}", "format is valid but produces no output".yellow());
            } else {
                println!(
                    "{} ({} top-level node(s))",
                    "format is valid".green(),
                    format.nodes().len()
                );
            }
            Ok(exitcode::OK)
        }
        Err(e) => {
            if args.json {
                let output = CheckError {
                    error: e.to_string(),
                    offset: e.offset(),
                };
                eprintln!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
            } else {
                let diagnostic = FormatDiagnostic::from_parse_error("format", &args.format, &e);
                eprintln!("{:?}", Report::new(diagnostic));
            }
            Ok(exitcode::DATAERR)
        }
    }
}
