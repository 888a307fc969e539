//! Built-in commands.
//!
//! Each command implements the
//! [`ManagementCommand`](crate::command::ManagementCommand) trait and works
//! against the marketing site configured by the loaded settings.

pub mod check;
pub mod navigate;
pub mod render;
pub mod resolve;
pub mod routes;

pub use check::CheckCommand;
pub use navigate::NavigateCommand;
pub use render::RenderCommand;
pub use resolve::ResolveCommand;
pub use routes::RoutesCommand;

use crate::command::CommandRegistry;

/// Registers all built-in commands into the given registry.
pub fn register_builtin_commands(registry: &mut CommandRegistry) {
    registry.register(Box::new(RoutesCommand));
    registry.register(Box::new(ResolveCommand));
    registry.register(Box::new(RenderCommand));
    registry.register(Box::new(NavigateCommand));
    registry.register(Box::new(CheckCommand));
}

/// Adds the `--json` output flag.
fn json_flag(cmd: clap::Command) -> clap::Command {
    cmd.arg(
        clap::Arg::new("json")
            .long("json")
            .action(clap::ArgAction::SetTrue)
            .help("Print JSON instead of text"),
    )
}

/// Adds a required positional `path` argument.
fn path_arg(cmd: clap::Command) -> clap::Command {
    cmd.arg(
        clap::Arg::new("path")
            .required(true)
            .value_name("PATH")
            .help("The path to look up, e.g. /blog/my-first-post"),
    )
}
