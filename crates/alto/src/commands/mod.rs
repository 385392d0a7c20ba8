//! CLI command implementations.

mod check;
mod eval;
mod run;

pub use check::{run_check, CheckArgs};
pub use eval::{run_eval, EvalArgs};
pub use run::{run_files, RunArgs};
