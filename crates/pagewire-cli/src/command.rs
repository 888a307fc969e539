//! Commands and the registry that dispatches them.
//!
//! Every subcommand of the `pagewire` binary is a [`ManagementCommand`]
//! trait object. [`CommandRegistry`] turns the registered set into a clap
//! command tree and routes parsed arguments back to the right handler.
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use pagewire_cli::command::ManagementCommand;
//! use pagewire_core::{PagewireError, Settings};
//!
//! struct Latency;
//!
//! #[async_trait]
//! impl ManagementCommand for Latency {
//!     fn name(&self) -> &str { "latency" }
//!     fn help(&self) -> &str { "Print the simulated load latency" }
//!
//!     async fn handle(
//!         &self,
//!         _matches: &clap::ArgMatches,
//!         settings: &Settings,
//!     ) -> Result<(), PagewireError> {
//!         println!("{}ms", settings.load_latency_ms);
//!         Ok(())
//!     }
//! }
//! ```

use std::collections::BTreeMap;

use async_trait::async_trait;
use pagewire_core::{settings_loader, PagewireError, PagewireResult, Settings};

/// One subcommand of the `pagewire` binary.
#[async_trait]
pub trait ManagementCommand: Send + Sync {
    /// The word typed on the command line.
    fn name(&self) -> &str;

    /// One line shown in `--help`.
    fn help(&self) -> &str;

    /// Declares the command's own flags and positionals. None by default.
    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd
    }

    /// Runs the command. `matches` holds this subcommand's arguments only.
    async fn handle(
        &self,
        matches: &clap::ArgMatches,
        settings: &Settings,
    ) -> Result<(), PagewireError>;
}

/// Commands keyed by name, kept in name order.
///
/// Also declares the global `--settings` and `--log-level` flags.
#[derive(Default)]
pub struct CommandRegistry {
    commands: BTreeMap<String, Box<dyn ManagementCommand>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `command`, replacing any command with the same name.
    pub fn register(&mut self, command: Box<dyn ManagementCommand>) {
        self.commands.insert(command.name().to_string(), command);
    }

    pub fn get(&self, name: &str) -> Option<&dyn ManagementCommand> {
        self.commands.get(name).map(AsRef::as_ref)
    }

    /// Names of all registered commands, alphabetically.
    pub fn list_commands(&self) -> Vec<&str> {
        self.commands.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Builds the top-level clap `Command` with every registered subcommand
    /// and the global flags.
    pub fn build_cli(&self) -> clap::Command {
        let mut app = clap::Command::new("pagewire")
            .about("Inspect and exercise pagewire route tables")
            .subcommand_required(true)
            .arg(
                clap::Arg::new("settings")
                    .long("settings")
                    .value_name("FILE")
                    .global(true)
                    .help("Load settings from a TOML or .json file (environment overrides still apply)"),
            )
            .arg(
                clap::Arg::new("log-level")
                    .long("log-level")
                    .value_name("FILTER")
                    .global(true)
                    .help("Log filter directive, e.g. \"debug\" or \"pagewire_router=trace\""),
            );

        for (name, cmd) in &self.commands {
            // Registration happens once per process, so leaking the name is bounded.
            let name: &'static str = Box::leak(name.clone().into_boxed_str());
            let subcmd = clap::Command::new(name).about(cmd.help().to_string());
            app = app.subcommand(cmd.add_arguments(subcmd));
        }
        app
    }

    /// Executes the subcommand selected in `matches`.
    pub async fn execute(
        &self,
        matches: &clap::ArgMatches,
        settings: &Settings,
    ) -> Result<(), PagewireError> {
        let (name, sub_matches) = matches.subcommand().ok_or_else(|| {
            PagewireError::ConfigurationError("No subcommand specified".to_string())
        })?;

        let cmd = self.get(name).ok_or_else(|| {
            PagewireError::ConfigurationError(format!("Unknown command: {name}"))
        })?;

        tracing::debug!(command = name, "executing command");
        cmd.handle(sub_matches, settings).await
    }
}

/// Resolves settings from the global flags.
///
/// `--settings` selects a TOML file, or JSON when it ends in `.json`;
/// without it settings come from defaults and the environment. `--log-level` overrides whatever was loaded.
pub fn load_settings(matches: &clap::ArgMatches) -> PagewireResult<Settings> {
    let mut settings = match matches.get_one::<String>("settings") {
        Some(path) => settings_loader::from_file_with_env(path)?,
        None => settings_loader::from_env(),
    };
    if let Some(level) = matches.get_one::<String>("log-level") {
        settings.log_level.clone_from(level);
    }
    Ok(settings)
}

/// Maps a failed run to the process exit code.
///
/// Pagewire errors use their sysexits code; anything else exits with 1.
/// Route wiring defects are also logged at error level.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    let Some(pagewire_err) = err.downcast_ref::<PagewireError>() else {
        return 1;
    };
    if pagewire_err.is_defect() {
        tracing::error!(error = %pagewire_err, "route table is wired incorrectly");
    }
    u8::try_from(pagewire_err.exit_code()).unwrap_or(1)
}
