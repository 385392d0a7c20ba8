//! Implementation of the `alto eval` command.

use std::collections::HashMap;
use std::sync::Arc;

use alto_dsl::{Control, Format, FunctionRegistry, Outcome, Scope};
use miette::{IntoDiagnostic, Report};

use crate::functions::{register_host_functions, FileSystem};
use crate::output::FormatDiagnostic;

/// Arguments for the eval command.
#[derive(Debug, clap::Args)]
pub struct EvalArgs {
    /// Format string to evaluate
    pub format: String,

    /// Variables in name=value format (repeatable)
    #[arg(short = 'v', long = "var", value_parser = parse_key_val)]
    pub vars: Vec<(String, String)>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Parse a name=value variable string.
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid variable format '{}': expected name=value", s))?;
    Ok((name.to_string(), value.to_string()))
}

/// Run the eval command.
///
/// Host functions resolve relative paths against the current directory.
pub fn run_eval(args: EvalArgs) -> miette::Result<i32> {
    let format = match Format::parse(&args.format) {
        Ok(format) => format,
        Err(e) => {
            let diagnostic = FormatDiagnostic::from_parse_error("format", &args.format, &e);
            eprintln!("{:?}", Report::new(diagnostic));
            return Ok(exitcode::DATAERR);
        }
    };

    let mut registry = FunctionRegistry::with_defaults();
    register_host_functions(&mut registry, Arc::new(FileSystem::new(".")));
    let variables: HashMap<String, String> = args.vars.into_iter().collect();
    let mut scope = Scope::builder()
        .functions(Arc::new(registry))
        .variables(variables)
        .build();

    match format.render(&mut scope) {
        Ok(outcome) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&outcome).into_diagnostic()?);
            } else {
                match &outcome {
                    Outcome::Value(value) => println!("{}", value),
                    Outcome::Control(control) => eprintln!("{}", control),
                }
            }
            match outcome {
                Outcome::Control(Control::Exit) => Ok(exitcode::DATAERR),
                Outcome::Value(_) | Outcome::Control(Control::Skip) => Ok(exitcode::OK),
            }
        }
        Err(e) => {
            if args.json {
                let output = serde_json::json!({
                    "error": e.to_string()
                });
                eprintln!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
            } else {
                eprintln!("Evaluation error: {}", e);
            }
            Ok(exitcode::DATAERR)
        }
    }
}
