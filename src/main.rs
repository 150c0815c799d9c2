//! layered-config
//!
//! Resolves the application configuration from command-line flags,
//! `MYAPP_*` environment variables and a config file, validates it and
//! prints the result.

use anyhow::Result;
use layered_config::cli;
use layered_config::config::{
    EnvLayer, FileLayer, FileLocation, Resolver, SourceLayer, StdEnv,
};
use layered_config::error::ConfigError;
use layered_config::format::{render_config, render_provenance};
use layered_config::logging::{self, LogTarget};
use std::process::ExitCode;
use tracing::debug;

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let resolver = Resolver::standard()?;
    let (cli, flags) = cli::parse(resolver.bindings());

    logging::init(&LogTarget::parse(&cli.log), cli.verbose)?;

    let env = EnvLayer::new(resolver.keys().clone(), StdEnv);
    let location = FileLocation::resolve(cli.config.as_deref(), env.source(), resolver.keys());
    debug!(?location, "Config file location");
    let file = FileLayer::open(&location)?;
    eprintln!("{}\n", file.status());

    let layers: [&dyn SourceLayer; 3] = [&flags, &env, &file];
    match resolver.resolve(&layers) {
        Ok(resolution) => {
            if cli.explain {
                eprint!("{}", render_provenance(&resolution.tree));
                eprintln!();
            }
            println!("{}", render_config(&resolution.config, cli.output)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(ConfigError::Validation(violations)) => {
            eprint!("{}", resolver.formatter().render(&violations));
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e.into()),
    }
}
