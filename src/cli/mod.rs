//! CLI definitions for layered-config
//!
//! The fixed options live on the `Cli` struct. Configuration flags are not
//! declared here: they are registered on the command from the binding
//! registry so every flag maps to exactly one canonical key.

use crate::config::flags::{FlagLayer, register_flags};
use crate::config::Binding;
use crate::format::OutputFormat;
use clap::{CommandFactory, FromArgMatches, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

/// Resolve the application configuration from flags, environment and file
///
/// Sources are applied in priority order:
/// 1. Command-line flags (highest priority)
/// 2. Environment variables (MYAPP_*)
/// 3. Configuration file (lowest priority)
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (default: ./config.yaml)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(long, default_value = "2")]
    pub log: String,

    /// Output format for the resolved configuration
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub output: OutputFormat,

    /// Also print which layer each resolved key came from
    #[arg(long)]
    pub explain: bool,
}

/// The full command: fixed options plus one flag per binding.
pub fn command(bindings: &[Binding]) -> clap::Command {
    register_flags(Cli::command(), bindings)
}

/// Parse `args` into the fixed options and the flag layer.
pub fn try_parse_from<I, T>(bindings: &[Binding], args: I) -> Result<(Cli, FlagLayer), clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = command(bindings).try_get_matches_from(args)?;
    let cli = Cli::from_arg_matches(&matches)?;
    let flags = FlagLayer::from_matches(&matches, bindings);
    Ok((cli, flags))
}

/// Parse the process arguments, exiting with clap's usage message on error.
pub fn parse(bindings: &[Binding]) -> (Cli, FlagLayer) {
    try_parse_from(bindings, std::env::args_os()).unwrap_or_else(|e| e.exit())
}
