//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// DataArts Studio listing CLI
#[derive(Parser, Debug)]
#[command(name = "dataarts")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Settings file (YAML)
    #[arg(short, long, global = true)]
    pub settings: Option<PathBuf>,

    /// Catalog name or path to a catalog YAML file
    #[arg(short, long, global = true, default_value = "dataarts")]
    pub catalog: String,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the endpoints of the catalog
    Endpoints,

    /// List every record of an endpoint
    List {
        /// Endpoint name
        endpoint: String,

        /// Endpoint argument (repeatable)
        #[arg(short = 'a', long = "arg", value_name = "KEY=VALUE", value_parser = parse_argument)]
        args: Vec<(String, String)>,
    },

    /// Fetch one record by ID
    Get {
        /// Endpoint name
        endpoint: String,

        /// Record ID
        id: String,

        /// Endpoint argument (repeatable)
        #[arg(short = 'a', long = "arg", value_name = "KEY=VALUE", value_parser = parse_argument)]
        args: Vec<(String, String)>,
    },

    /// Search the listing of an endpoint for one ID
    Find {
        /// Endpoint name
        endpoint: String,

        /// Record ID
        id: String,

        /// Endpoint argument (repeatable)
        #[arg(short = 'a', long = "arg", value_name = "KEY=VALUE", value_parser = parse_argument)]
        args: Vec<(String, String)>,
    },

    /// Validate the catalog and, when given, the settings
    Validate,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one document per line)
    Json,
    /// Human-readable output
    Pretty,
}

/// Parse a `key=value` argument; the value may be empty
fn parse_argument(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}
