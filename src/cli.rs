//! CLI domain: parse, route, output, and presentation only.
//! No domain orchestration; single route table dispatches to the controller.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands};
pub use presentation::{
    format_run_report, format_status, format_validation, StatusView, ValidationView,
};
pub use route::RunContext;
