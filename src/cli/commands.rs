//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// J-Quants API client
#[derive(Parser, Debug)]
#[command(name = "jquants")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// API key (overrides JQUANTS_API_KEY)
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// API root (overrides JQUANTS_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Write output to a file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Look up one security in the equities master
    Master {
        /// Security code (e.g. 72030)
        #[arg(long)]
        code: String,

        /// Date (YYYYMMDD or YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },

    /// Dump the whole equities master for a date
    MasterAll {
        /// Date (YYYYMMDD or YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },

    /// Fetch financial statement summaries
    Statements {
        /// Security code
        #[arg(long)]
        code: Option<String>,

        /// Disclosure date (YYYYMMDD or YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON
    Json,
    /// Human-readable JSON
    Pretty,
    /// YAML
    Yaml,
}
