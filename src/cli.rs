//! CLI domain: parse, route and output only.
//! The route hands a single run to the orchestrator.

mod output;
mod parse;
mod route;

pub use output::{exit_code, format_error, format_outcome, format_warning, map_error};
pub use parse::{Cli, ModeArg};
pub use route::{run_input, RunContext};
