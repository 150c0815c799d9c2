//! Output formatting for the resolved configuration.

use crate::config::{Config, ConfigTree};
use anyhow::Result;
use clap::ValueEnum;
use std::fmt::Write;

/// Output format for the resolved configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

/// Render `config` as an indented document.
pub fn render_config(config: &Config, format: OutputFormat) -> Result<String> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(config)?,
        OutputFormat::Yaml => serde_yaml::to_string(config)?,
    };
    Ok(rendered)
}

/// One `key <- layer` line per resolved key.
pub fn render_provenance(tree: &ConfigTree) -> String {
    let width = tree
        .iter()
        .map(|(key, _)| key.to_string().len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for (key, layer) in tree.provenance() {
        let _ = writeln!(out, "{:width$}  <- {}", key.to_string(), layer, width = width);
    }
    out
}
