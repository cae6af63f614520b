//! Mimizuku CLI main entry point

use anyhow::Result;
use clap::Parser;
use mimizuku_cli::{Cli, CliConfig, CommandExecutor};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = CliConfig::load(cli.config.as_deref())?;

    // --log-level > config file > RUST_LOG > warn
    let filter = match cli.log_level.as_deref().or(config.log_level.as_deref()) {
        Some(level) => EnvFilter::try_new(level)?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let executor = CommandExecutor::new(config);
    let result = executor.execute(cli.command)?;
    info!("{}", result.message);

    if !result.output.is_empty() {
        println!("{}", result.output);
    }

    // Exit with appropriate code
    if result.success {
        std::process::exit(0);
    } else {
        std::process::exit(1);
    }
}
