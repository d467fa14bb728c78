//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `render` | Derive and print the schedule for a chart file |
//! | `check` | Validate a chart file and report its size |
//! | `search` | Find tasks whose names contain a pattern |
//!
//! All commands support `--format text|json` and `--verbose`. Call
//! [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod chart_file;
mod output;

pub use app::{run, Cli, Commands};
pub use chart_file::{build_chart, load_chart, ChartFile};
pub use output::{Output, OutputFormat};
