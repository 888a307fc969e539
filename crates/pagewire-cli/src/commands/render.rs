//! The `render` command.

use async_trait::async_trait;
use pagewire_core::{PagewireError, Settings};
use pagewire_router::ViewOutput;

use crate::command::ManagementCommand;

/// Loads the page for a path and prints what it renders.
///
/// Waits for the page module instead of showing the loading placeholder.
pub struct RenderCommand;

/// Renders `path` against the site configured by `settings`.
pub async fn render_page(settings: &Settings, path: &str) -> Result<ViewOutput, PagewireError> {
    let dispatcher = pagewire_site::dispatcher(settings)?;
    dispatcher.render_resolved(path).await
}

#[async_trait]
impl ManagementCommand for RenderCommand {
    fn name(&self) -> &'static str {
        "render"
    }

    fn help(&self) -> &'static str {
        "Load a page and print its output"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        super::json_flag(super::path_arg(cmd))
    }

    async fn handle(
        &self,
        matches: &clap::ArgMatches,
        settings: &Settings,
    ) -> Result<(), PagewireError> {
        let path = matches
            .get_one::<String>("path")
            .ok_or_else(|| PagewireError::ConfigurationError("missing path".to_string()))?;
        let output = render_page(settings, path).await?;

        if matches.get_flag("json") {
            let json = serde_json::json!({
                "view_id": output.view_id.as_str(),
                "title": output.title,
                "body": output.body,
            });
            println!("{json:#}");
        } else {
            println!("{output}");
        }
        Ok(())
    }
}
