//! alto CLI entry point.
//!
//! Copies audio files into a library whose layout is computed from each
//! file's metadata by a format string:
//! - `alto run` - Index, evaluate, and copy
//! - `alto check` - Validate a format string
//! - `alto eval` - Evaluate a format string against given variables

mod commands;
mod config;
mod functions;
mod metadata;
mod output;
mod report;
mod scan;

use std::io::stderr;
use std::process::exit;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use commands::{run_check, run_eval, run_files, CheckArgs, EvalArgs, RunArgs};
use tracing_subscriber::EnvFilter;

/// Copy audio files into a library laid out by a format string.
#[derive(Debug, Parser)]
#[command(name = "alto")]
#[command(about = "Copy audio files into a library laid out by a format string", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Color output control
    #[arg(long, value_enum, default_value_t = ColorWhen::Auto, global = true)]
    pub color: ColorWhen,

    /// Enable verbose output (repeat for more)
    #[arg(long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// When to use colored output.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorWhen {
    Auto,
    Always,
    Never,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Index the source directory and copy files to their formatted paths
    Run(RunArgs),
    /// Check format string syntax
    Check(CheckArgs),
    /// Evaluate a format string
    Eval(EvalArgs),
}

/// Set up color output based on user preference.
fn setup_colors(color_when: ColorWhen) {
    match color_when {
        ColorWhen::Auto => {
            // owo-colors automatically checks TTY, NO_COLOR, FORCE_COLOR
        }
        ColorWhen::Always => {
            owo_colors::set_override(true);
        }
        ColorWhen::Never => {
            owo_colors::set_override(false);
        }
    }
}

/// Send log events to stderr. `RUST_LOG` takes precedence over `--verbose`.
fn setup_logging(verbose: u8, color_when: ColorWhen) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let ansi = !matches!(color_when, ColorWhen::Never);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(stderr)
        .with_ansi(ansi)
        .with_target(verbose > 0)
        .without_time()
        .init();
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    setup_colors(cli.color);
    setup_logging(cli.verbose, cli.color);

    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))?;

    let result = match cli.command {
        Commands::Run(args) => run_files(args),
        Commands::Check(args) => run_check(args),
        Commands::Eval(args) => run_eval(args),
    };

    match result {
        Ok(code) => exit(code),
        Err(e) => {
            eprintln!("{:?}", e);
            exit(exitcode::SOFTWARE);
        }
    }
}
