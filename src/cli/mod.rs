//! CLI module
//!
//! Command-line interface for querying the API.
//!
//! # Commands
//!
//! - `master` - Look up one security in the equities master
//! - `master-all` - Dump the whole equities master for a date
//! - `statements` - Fetch financial statement summaries

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
