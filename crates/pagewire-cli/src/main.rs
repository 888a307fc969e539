//! The `pagewire` binary.

use std::process::ExitCode;

use anyhow::Context;
use pagewire_cli::commands::register_builtin_commands;
use pagewire_cli::{exit_code, load_settings, CommandRegistry};
use pagewire_core::logging::setup_logging;

#[tokio::main]
async fn main() -> ExitCode {
    let mut registry = CommandRegistry::new();
    register_builtin_commands(&mut registry);
    let matches = registry.build_cli().get_matches();

    match run(&registry, &matches).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}

async fn run(registry: &CommandRegistry, matches: &clap::ArgMatches) -> anyhow::Result<()> {
    let settings = load_settings(matches).context("loading settings")?;
    setup_logging(&settings);

    let command = matches.subcommand_name().unwrap_or_default().to_string();
    registry
        .execute(matches, &settings)
        .await
        .with_context(|| format!("'{command}' failed"))?;
    Ok(())
}
