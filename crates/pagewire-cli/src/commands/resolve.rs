//! The `resolve` command.

use async_trait::async_trait;
use pagewire_core::{PagewireError, Settings};
use pagewire_router::RouteMatch;

use crate::command::ManagementCommand;

/// Shows which view a path selects and the parameters it extracts.
pub struct ResolveCommand;

/// Describes a match as `view-id key=value ...`, parameters sorted.
pub fn describe_match(route: &RouteMatch) -> String {
    let mut params: Vec<_> = route.params().iter().collect();
    params.sort_unstable();

    let mut parts = vec![route.view_id().to_string()];
    parts.extend(params.into_iter().map(|(key, value)| format!("{key}={value}")));
    if route.is_not_found() {
        parts.push("(no route matched)".to_string());
    }
    parts.join(" ")
}

fn match_json(route: &RouteMatch) -> serde_json::Value {
    serde_json::json!({
        "path": route.path(),
        "view_id": route.view_id().as_str(),
        "params": route.params(),
        "not_found": route.is_not_found(),
    })
}

#[async_trait]
impl ManagementCommand for ResolveCommand {
    fn name(&self) -> &'static str {
        "resolve"
    }

    fn help(&self) -> &'static str {
        "Show which view a path selects"
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
        let table = pagewire_site::site_routes(settings.case_sensitive)?;
        let route = table.match_path(path);

        if matches.get_flag("json") {
            println!("{:#}", match_json(&route));
        } else {
            println!("{}", describe_match(&route));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_blog_post() {
        let table = pagewire_site::site_routes(false).unwrap();
        let route = table.match_path("/blog/my-first-post");
        assert_eq!(describe_match(&route), "blog-post slug=my-first-post");
    }

    #[test]
    fn test_describe_unmatched() {
        let table = pagewire_site::site_routes(false).unwrap();
        let route = table.match_path("/nonexistent");
        assert_eq!(describe_match(&route), "not-found (no route matched)");
    }

    #[test]
    fn test_match_json_uses_normalized_path() {
        let table = pagewire_site::site_routes(false).unwrap();
        let json = match_json(&table.match_path("/contact/"));
        assert_eq!(json["path"], "/contact");
        assert_eq!(json["view_id"], "contact");
        assert_eq!(json["not_found"], false);
        assert!(json["params"].as_object().unwrap().is_empty());
    }
}
