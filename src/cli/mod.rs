//! CLI module
//!
//! Command-line interface over the DataArts Studio catalog.
//!
//! # Commands
//!
//! - `endpoints` - List catalog endpoints
//! - `list` - List every record of an endpoint
//! - `get` - Fetch one record by ID
//! - `find` - Search a listing for one ID
//! - `validate` - Validate catalog and settings

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
