//! The `routes` command.

use async_trait::async_trait;
use pagewire_core::{PagewireError, Settings};
use pagewire_router::RouteTable;

use crate::command::ManagementCommand;

/// Prints the site's route table in declaration order.
pub struct RoutesCommand;

/// Formats one line per entry: pattern, view id and reverse name.
pub fn format_routes(table: &RouteTable) -> Vec<String> {
    let width = table
        .entries()
        .map(|entry| entry.pattern().route().len())
        .max()
        .unwrap_or(0);
    table
        .entries()
        .map(|entry| {
            let line = format!("{:<width$}  {}", entry.pattern().route(), entry.view_id());
            match entry.name() {
                Some(name) if name != entry.view_id().as_str() => format!("{line} (name: {name})"),
                _ => line,
            }
        })
        .collect()
}

/// Serializes the table as a JSON array.
pub fn routes_json(table: &RouteTable) -> serde_json::Value {
    table
        .entries()
        .map(|entry| {
            serde_json::json!({
                "pattern": entry.pattern().route(),
                "view_id": entry.view_id().as_str(),
                "name": entry.name(),
            })
        })
        .collect()
}

#[async_trait]
impl ManagementCommand for RoutesCommand {
    fn name(&self) -> &'static str {
        "routes"
    }

    fn help(&self) -> &'static str {
        "Print the route table"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        super::json_flag(cmd)
    }

    async fn handle(
        &self,
        matches: &clap::ArgMatches,
        settings: &Settings,
    ) -> Result<(), PagewireError> {
        let table = pagewire_site::site_routes(settings.case_sensitive)?;
        if matches.get_flag("json") {
            println!("{:#}", routes_json(&table));
        } else {
            for line in format_routes(&table) {
                println!("{line}");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_site_routes() {
        let table = pagewire_site::site_routes(false).unwrap();
        let lines = format_routes(&table);
        assert_eq!(lines.len(), pagewire_site::ROUTES.len());
        assert!(lines[0].starts_with("/ "));
        assert!(lines[0].ends_with("home"));
        assert!(lines.iter().any(|l| l.starts_with("/blog/:slug") && l.ends_with("blog-post")));
        assert!(lines.last().unwrap().starts_with('*'));
    }

    #[test]
    fn test_format_shows_custom_names() {
        let table = RouteTable::builder()
            .named_route("/posts/:id", "post", "post-detail")
            .route("*", "not-found")
            .build()
            .unwrap();
        let lines = format_routes(&table);
        assert_eq!(lines[0], "/posts/:id  post (name: post-detail)");
        assert_eq!(lines[1], "*           not-found");
    }

    #[test]
    fn test_routes_json() {
        let table = pagewire_site::site_routes(false).unwrap();
        let json = routes_json(&table);
        let entries = json.as_array().unwrap();
        assert_eq!(entries[0]["pattern"], "/");
        assert_eq!(entries[0]["view_id"], "home");
        assert_eq!(entries.last().unwrap()["name"], serde_json::Value::Null);
    }
}
