//! Implementation of the `alto run` command.

use std::collections::HashMap;
use std::error::Error;
use std::fs::{create_dir_all, symlink_metadata, File};
use std::io::{copy, Error as IoError, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use alto_dsl::{Control, Format, FunctionRegistry, Outcome, Scope};
use clap::Args;
use miette::{miette, IntoDiagnostic, Report, Result};
use owo_colors::OwoColorize;
use tempfile::NamedTempFile;
use tracing::{error, info, warn};

use crate::config::{Config, Settings};
use crate::functions::{register_host_functions, FileSystem, PathProbe, Planned};
use crate::metadata::{path_variables, read_tag_variables};
use crate::output::table::{format_bytes, format_summary_table};
use crate::output::FormatDiagnostic;
use crate::report::{ItemReport, ItemStatus, RunReport};
use crate::scan::index_sources;

/// Arguments for the run command.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Config file to use instead of <config dir>/alto/config.json.
    #[arg(long, env = "ALTO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Format string that computes each destination path.
    #[arg(long, env = "ALTO_PATH")]
    pub path: Option<String>,

    /// Directory to index audio files from. Defaults to the current directory.
    #[arg(long, env = "ALTO_SOURCE")]
    pub source: Option<PathBuf>,

    /// Directory to copy files into.
    #[arg(long, env = "ALTO_DESTINATION")]
    pub destination: Option<PathBuf>,

    /// Compute destinations without copying anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Record failing files and continue with the rest.
    #[arg(long)]
    pub keep_going: bool,

    /// Output the run report as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Options that change how items are processed.
#[derive(Debug, Clone, Copy)]
struct RunOptions {
    dry_run: bool,
    keep_going: bool,
}

/// Run the run command.
pub fn run_files(args: RunArgs) -> Result<i32> {
    let overrides = Config {
        path: args.path,
        source: args.source,
        destination: args.destination,
    };
    let settings = match Config::load(args.config.as_deref())
        .and_then(|config| config.merge(overrides).resolve())
    {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{:?}", miette!("{e}"));
            return Ok(exitcode::CONFIG);
        }
    };

    let format = match Format::parse(&settings.format) {
        Ok(format) => format,
        Err(e) => {
            let diagnostic = FormatDiagnostic::from_parse_error("path", &settings.format, &e);
            eprintln!("{:?}", Report::new(diagnostic));
            return Ok(exitcode::DATAERR);
        }
    };
    if format.is_empty() {
        eprintln!("{:?}", miette!("format string produces no output"));
        return Ok(exitcode::DATAERR);
    }

    let sources = match index_sources(&settings.source) {
        Ok(sources) => sources,
        Err(e) => {
            eprintln!("{:?}", miette!("cannot index {}: {e}", settings.source.display()));
            return Ok(exitcode::IOERR);
        }
    };
    info!(count = sources.len(), source = %settings.source.display(), "indexed audio files");

    let options = RunOptions {
        dry_run: args.dry_run,
        keep_going: args.keep_going,
    };
    if !options.dry_run {
        if let Err(e) = create_dir_all(&settings.destination) {
            eprintln!("{:?}", miette!("cannot create {}: {e}", settings.destination.display()));
            return Ok(exitcode::CANTCREAT);
        }
    }

    let (report, code) = process(&format, &settings, &sources, options);

    if args.json {
        let json_output = serde_json::to_string_pretty(&report).into_diagnostic()?;
        println!("{}", json_output);
    } else {
        println!("{}", format_summary_table(&report));
        if report.has_failures() {
            for item in report.items.iter().filter(|i| i.status == ItemStatus::Failed) {
                let reason = item.error.as_deref().unwrap_or("unknown error");
                println!("{} {}: {}", "failed".red(), item.source.display(), reason);
            }
        }
        if report.exited {
            println!("{}", "stopped early: the format requested exit".yellow());
        }
    }

    Ok(code)
}

/// Render and copy every source file, returning the report and exit code.
fn process(
    format: &Format,
    settings: &Settings,
    sources: &[PathBuf],
    options: RunOptions,
) -> (RunReport, i32) {
    let probe = Arc::new(Planned::new(FileSystem::new(&settings.destination)));
    let mut registry = FunctionRegistry::with_defaults();
    register_host_functions(&mut registry, probe.clone());
    let mut scope = Scope::new(Arc::new(registry));

    let mut report = RunReport::default();
    let mut code = exitcode::OK;
    let total = sources.len();

    for (index, source) in sources.iter().enumerate() {
        let progress = format!("[{}/{}]", index + 1, total);
        info!("{progress} opening {}", source.display());
        scope.reset(item_variables(source, index, settings));

        let item = match format.render(&mut scope) {
            Ok(Outcome::Control(Control::Skip)) => {
                info!("{progress} skip requested");
                skipped(source)
            }
            Ok(Outcome::Control(Control::Exit)) => {
                warn!("{progress} exit requested, stopping");
                report.exited = true;
                code = exitcode::DATAERR;
                break;
            }
            Ok(Outcome::Value(output)) if output.is_empty() => {
                failed(source, None, "format produced an empty path".to_string())
            }
            Ok(Outcome::Value(output)) => {
                let destination = settings.destination.join(&output);
                if options.dry_run {
                    match probe.exists(Path::new(&output)) {
                        Ok(false) => {
                            probe.claim(&output);
                            info!("{progress} would copy to {}", destination.display());
                            planned(source, destination)
                        }
                        Ok(true) => {
                            code = first_failure(code, exitcode::IOERR);
                            let e = already_exists();
                            let message = format!("cannot copy to {}: {e}", destination.display());
                            failed(source, Some(destination), message)
                        }
                        Err(e) => {
                            code = first_failure(code, exitcode::IOERR);
                            let message = format!("cannot copy to {}: {e}", destination.display());
                            failed(source, Some(destination), message)
                        }
                    }
                } else {
                    match copy_new(source, &destination) {
                        Ok(written) => {
                            info!("{progress} copied to {}", destination.display());
                            info!("{progress} wrote {}", format_bytes(written));
                            ItemReport {
                                source: source.clone(),
                                destination: Some(destination),
                                status: ItemStatus::Copied,
                                bytes: Some(written),
                                error: None,
                            }
                        }
                        Err(e) => {
                            code = first_failure(code, exitcode::IOERR);
                            let message = format!("cannot copy to {}: {e}", destination.display());
                            failed(source, Some(destination), message)
                        }
                    }
                }
            }
            Err(e) => failed(source, None, error_chain(&e)),
        };

        let is_failure = item.status == ItemStatus::Failed;
        if is_failure {
            code = first_failure(code, exitcode::DATAERR);
            error!(
                "{progress} {}: {}",
                source.display(),
                item.error.as_deref().unwrap_or_default()
            );
        }
        report.items.push(item);

        if is_failure && !options.keep_going {
            break;
        }
    }

    (report, code)
}

/// Variables for one item: tags, path-derived values, and run context.
fn item_variables(source: &Path, index: usize, settings: &Settings) -> HashMap<String, String> {
    let mut vars = match read_tag_variables(source) {
        Ok(vars) => vars,
        Err(e) => {
            warn!("metadata may not be present in {}: {e}", source.display());
            HashMap::new()
        }
    };
    vars.extend(path_variables(source));
    vars.insert("alto_index".to_string(), index.to_string());
    vars.insert(
        "alto_source".to_string(),
        settings.source.display().to_string(),
    );
    vars.insert(
        "alto_dest".to_string(),
        settings.destination.display().to_string(),
    );
    vars
}

/// Keep the exit code of the first failure.
fn first_failure(code: i32, failure: i32) -> i32 {
    if code == exitcode::OK {
        failure
    } else {
        code
    }
}

/// An error message followed by each of its sources.
fn error_chain(error: &dyn Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.ends_with(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

fn already_exists() -> IoError {
    IoError::new(ErrorKind::AlreadyExists, "destination already exists")
}

/// Copy `source` to a new file at `destination`, creating parent
/// directories. An existing destination is never overwritten.
///
/// The data is written to a temporary file beside the destination and moved
/// into place only once complete, so a failed copy leaves nothing behind.
fn copy_new(source: &Path, destination: &Path) -> Result<u64, IoError> {
    if symlink_metadata(destination).is_ok() {
        return Err(already_exists());
    }
    let parent = destination.parent().unwrap_or_else(|| Path::new("."));
    create_dir_all(parent)?;

    let mut input = File::open(source)?;
    let mut output = NamedTempFile::new_in(parent)?;
    let written = copy(&mut input, &mut output)?;
    output.persist_noclobber(destination).map_err(|e| {
        if e.error.kind() == ErrorKind::AlreadyExists {
            already_exists()
        } else {
            e.error
        }
    })?;
    Ok(written)
}

fn skipped(source: &Path) -> ItemReport {
    ItemReport {
        source: source.to_path_buf(),
        destination: None,
        status: ItemStatus::Skipped,
        bytes: None,
        error: None,
    }
}

fn planned(source: &Path, destination: PathBuf) -> ItemReport {
    ItemReport {
        source: source.to_path_buf(),
        destination: Some(destination),
        status: ItemStatus::Planned,
        bytes: None,
        error: None,
    }
}

fn failed(source: &Path, destination: Option<PathBuf>, error: String) -> ItemReport {
    ItemReport {
        source: source.to_path_buf(),
        destination,
        status: ItemStatus::Failed,
        bytes: None,
        error: Some(error),
    }
}
