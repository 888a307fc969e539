//! The `check` command.
//!
//! Runs system checks against the loaded settings and the site's route
//! table, reporting anything that would make navigation misbehave.

use async_trait::async_trait;
use pagewire_core::{PagewireError, Settings};

use crate::command::ManagementCommand;

/// Latency above which the loader check warns, in milliseconds.
const SLOW_LOAD_MS: u64 = 5_000;

/// Validates settings and the route table.
pub struct CheckCommand;

/// The result of a single system check.
#[derive(Debug, Clone)]
pub struct CheckMessage {
    /// The severity level of this check result.
    pub level: CheckLevel,
    /// A human-readable description of the issue.
    pub msg: String,
    /// An optional hint for how to resolve the issue.
    pub hint: Option<String>,
    /// A unique identifier for this check (e.g. "transition.W001").
    pub id: String,
}

impl CheckMessage {
    fn new(level: CheckLevel, id: &str, msg: impl Into<String>, hint: Option<&str>) -> Self {
        Self {
            level,
            msg: msg.into(),
            hint: hint.map(ToString::to_string),
            id: id.to_string(),
        }
    }
}

impl std::fmt::Display for CheckMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.level, self.id, self.msg)?;
        if let Some(hint) = &self.hint {
            write!(f, "\n\tHINT: {hint}")?;
        }
        Ok(())
    }
}

/// Severity levels for system check results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CheckLevel {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for CheckLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARNING"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Runs system checks against the given settings.
pub fn run_checks(settings: &Settings) -> Vec<CheckMessage> {
    let mut messages = Vec::new();

    match pagewire_site::site_routes(settings.case_sensitive) {
        Ok(table) => {
            for view_id in table.view_ids() {
                if pagewire_site::views::view_for(view_id.as_str()).is_none() {
                    messages.push(CheckMessage::new(
                        CheckLevel::Error,
                        "views.E001",
                        format!("View '{view_id}' is routed but has no implementation"),
                        Some("Add the page to the site's views or remove its route"),
                    ));
                }
            }
        }
        Err(err) => messages.push(CheckMessage::new(
            CheckLevel::Critical,
            "routes.E001",
            format!("The route table does not build: {err}"),
            None,
        )),
    }

    if settings.fallback_title.trim().is_empty() {
        messages.push(CheckMessage::new(
            CheckLevel::Warning,
            "routing.W001",
            "fallback_title is empty",
            Some("The loading placeholder will render without a title"),
        ));
    }

    let transition = &settings.transition;
    if transition.exit_timeout_ms < transition.exit_ms {
        messages.push(CheckMessage::new(
            CheckLevel::Warning,
            "transition.W001",
            format!(
                "exit_timeout_ms ({}) is shorter than exit_ms ({})",
                transition.exit_timeout_ms, transition.exit_ms
            ),
            Some("Every exit animation will be cut short; raise exit_timeout_ms"),
        ));
    }
    if transition.exit_ms == 0 && transition.enter_ms == 0 {
        messages.push(CheckMessage::new(
            CheckLevel::Info,
            "transition.I001",
            "Page transitions are disabled",
            None,
        ));
    }

    if settings.load_latency_ms > SLOW_LOAD_MS {
        messages.push(CheckMessage::new(
            CheckLevel::Warning,
            "loader.W001",
            format!("load_latency_ms is {}", settings.load_latency_ms),
            Some("Pages will show the loading placeholder for several seconds"),
        ));
    }

    if pagewire_core::logging::parse_filter(&settings.log_level).is_err() {
        messages.push(CheckMessage::new(
            CheckLevel::Error,
            "logging.E001",
            format!("log_level '{}' is not a valid filter", settings.log_level),
            Some("Use a level such as \"info\" or a directive such as \"pagewire_router=debug\""),
        ));
    }

    messages
}

#[async_trait]
impl ManagementCommand for CheckCommand {
    fn name(&self) -> &'static str {
        "check"
    }

    fn help(&self) -> &'static str {
        "Validate settings and the route table"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(
            clap::Arg::new("fail-level")
                .long("fail-level")
                .value_parser(["warning", "error"])
                .default_value("error")
                .help("Exit with an error at or above this level"),
        )
    }

    async fn handle(
        &self,
        matches: &clap::ArgMatches,
        settings: &Settings,
    ) -> Result<(), PagewireError> {
        let messages = run_checks(settings);

        if messages.is_empty() {
            println!("System check identified no issues");
            return Ok(());
        }

        for msg in &messages {
            println!("{msg}");
        }

        let errors = messages.iter().filter(|m| m.level >= CheckLevel::Error).count();
        let warnings = messages.iter().filter(|m| m.level == CheckLevel::Warning).count();
        println!(
            "System check identified {} issue(s) ({errors} error(s), {warnings} warning(s))",
            messages.len()
        );

        let fail_level = match matches.get_one::<String>("fail-level").map(String::as_str) {
            Some("warning") => CheckLevel::Warning,
            _ => CheckLevel::Error,
        };
        let failing = messages.iter().filter(|m| m.level >= fail_level).count();
        if failing > 0 {
            return Err(PagewireError::ConfigurationError(format!(
                "System check found {failing} issue(s) at or above {fail_level}"
            )));
        }

        Ok(())
    }
}
