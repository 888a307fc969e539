//! Settings loading from configuration files.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Load from a TOML or JSON file (overriding defaults); the extension
//!    picks the format.
//! 3. Apply environment variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `PAGEWIRE_DEBUG` | `debug` |
//! | `PAGEWIRE_LOG_LEVEL` | `log_level` |
//! | `PAGEWIRE_CASE_SENSITIVE` | `case_sensitive` |
//! | `PAGEWIRE_FALLBACK_TITLE` | `fallback_title` |
//! | `PAGEWIRE_LOAD_LATENCY_MS` | `load_latency_ms` |
//! | `PAGEWIRE_EXIT_MS` | `transition.exit_ms` |
//! | `PAGEWIRE_ENTER_MS` | `transition.enter_ms` |
//! | `PAGEWIRE_EXIT_TIMEOUT_MS` | `transition.exit_timeout_ms` |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use pagewire_core::settings_loader;
//!
//! let settings = settings_loader::from_toml_file_with_env("pagewire.toml").unwrap();
//! ```

use std::path::Path;

use crate::error::PagewireError;
use crate::settings::Settings;

/// Loads settings from a TOML string.
///
/// Fields not present in the TOML keep their default values, including
/// individual keys inside nested tables such as `[transition]`.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or cannot be deserialized.
pub fn from_toml_str(toml_str: &str) -> Result<Settings, PagewireError> {
    let toml_value: toml::Value = toml::from_str(toml_str)
        .map_err(|e| PagewireError::ConfigurationError(format!("Failed to parse TOML: {e}")))?;

    merge_over_defaults(toml_to_json(toml_value), "TOML")
}

/// Loads settings from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the TOML is malformed.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Settings, PagewireError> {
    let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
        PagewireError::ConfigurationError(format!(
            "Failed to read TOML file '{}': {e}",
            path.as_ref().display()
        ))
    })?;
    from_toml_str(&content)
}

/// Loads settings from a TOML file and then applies environment variable overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the TOML is malformed.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> Result<Settings, PagewireError> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from a JSON string.
///
/// # Errors
///
/// Returns an error if the JSON is malformed or cannot be deserialized.
pub fn from_json_str(json_str: &str) -> Result<Settings, PagewireError> {
    let json_value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| PagewireError::ConfigurationError(format!("Failed to parse JSON: {e}")))?;

    merge_over_defaults(json_value, "JSON")
}

/// Loads settings from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the JSON is malformed.
pub fn from_json_file(path: impl AsRef<Path>) -> Result<Settings, PagewireError> {
    let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
        PagewireError::ConfigurationError(format!(
            "Failed to read JSON file '{}': {e}",
            path.as_ref().display()
        ))
    })?;
    from_json_str(&content)
}

/// Loads settings from a file, then applies environment variable overrides.
///
/// A `.json` extension selects JSON; anything else is read as TOML.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn from_file_with_env(path: impl AsRef<Path>) -> Result<Settings, PagewireError> {
    let path = path.as_ref();
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let mut settings = if is_json {
        from_json_file(path)?
    } else {
        from_toml_file(path)?
    };
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from just environment variables (starting from defaults).
pub fn from_env() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies `PAGEWIRE_*` environment variable overrides to a settings struct.
///
/// Boolean values accept "true"/"1"/"yes"; numeric values that fail to
/// parse are ignored.
pub fn apply_env_overrides(settings: &mut Settings) {
    apply_overrides(settings, |key| std::env::var(key).ok());
}

fn apply_overrides(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    let flag = |val: String| matches!(val.to_lowercase().as_str(), "true" | "1" | "yes");
    let millis = |key: &str| var(key).and_then(|val| val.trim().parse::<u64>().ok());

    if let Some(val) = var("PAGEWIRE_DEBUG") {
        settings.debug = flag(val);
    }

    if let Some(val) = var("PAGEWIRE_LOG_LEVEL") {
        settings.log_level = val;
    }

    if let Some(val) = var("PAGEWIRE_CASE_SENSITIVE") {
        settings.case_sensitive = flag(val);
    }

    if let Some(val) = var("PAGEWIRE_FALLBACK_TITLE") {
        settings.fallback_title = val;
    }

    if let Some(ms) = millis("PAGEWIRE_LOAD_LATENCY_MS") {
        settings.load_latency_ms = ms;
    }

    if let Some(ms) = millis("PAGEWIRE_EXIT_MS") {
        settings.transition.exit_ms = ms;
    }

    if let Some(ms) = millis("PAGEWIRE_ENTER_MS") {
        settings.transition.enter_ms = ms;
    }

    if let Some(ms) = millis("PAGEWIRE_EXIT_TIMEOUT_MS") {
        settings.transition.exit_timeout_ms = ms;
    }
}

// ============================================================
// Helpers
// ============================================================

fn merge_over_defaults(
    value: serde_json::Value,
    format: &str,
) -> Result<Settings, PagewireError> {
    let default_json = serde_json::to_value(Settings::default()).map_err(|e| {
        PagewireError::ConfigurationError(format!("Failed to serialize default settings: {e}"))
    })?;

    let merged = merge_json(default_json, value);
    serde_json::from_value(merged).map_err(|e| {
        PagewireError::ConfigurationError(format!(
            "Failed to deserialize settings from {format}: {e}"
        ))
    })
}

/// Converts a TOML value to a `serde_json::Value`.
fn toml_to_json(value: toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) => serde_json::Value::String(s),
        toml::Value::Integer(i) => serde_json::json!(i),
        toml::Value::Float(f) => serde_json::json!(f),
        toml::Value::Boolean(b) => serde_json::Value::Bool(b),
        toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        toml::Value::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(toml_to_json).collect())
        }
        toml::Value::Table(table) => {
            let map: serde_json::Map<String, serde_json::Value> = table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect();
            serde_json::Value::Object(map)
        }
    }
}

/// Deep-merges two JSON values. The `override_val` takes precedence.
fn merge_json(base: serde_json::Value, override_val: serde_json::Value) -> serde_json::Value {
    match (base, override_val) {
        (serde_json::Value::Object(mut base_map), serde_json::Value::Object(override_map)) => {
            for (key, override_v) in override_map {
                let merged = if let Some(base_v) = base_map.remove(&key) {
                    merge_json(base_v, override_v)
                } else {
                    override_v
                };
                base_map.insert(key, merged);
            }
            serde_json::Value::Object(base_map)
        }
        (_, override_val) => override_val,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    // ── TOML loading ────────────────────────────────────────────────

    #[test]
    fn test_from_toml_str_basic() {
        let toml = r#"
            debug = false
            log_level = "pagewire_router=debug"
            case_sensitive = true
        "#;

        let settings = from_toml_str(toml).unwrap();
        assert!(!settings.debug);
        assert_eq!(settings.log_level, "pagewire_router=debug");
        assert!(settings.case_sensitive);
        // Defaults preserved
        assert_eq!(settings.fallback_title, "Loading");
    }

    #[test]
    fn test_from_toml_str_partial_transition_table() {
        let toml = r"
            [transition]
            exit_ms = 90
        ";

        let settings = from_toml_str(toml).unwrap();
        assert_eq!(settings.transition.exit_ms, 90);
        assert_eq!(settings.transition.enter_ms, 300);
        assert_eq!(settings.transition.exit_timeout_ms, 500);
    }

    #[test]
    fn test_from_toml_str_empty() {
        let settings = from_toml_str("").unwrap();
        assert!(settings.debug);
        assert_eq!(settings.load_latency_ms, 50);
    }

    #[test]
    fn test_from_toml_str_invalid() {
        assert!(from_toml_str("[[invalid toml content").is_err());
    }

    #[test]
    fn test_from_toml_str_wrong_type() {
        let err = from_toml_str("load_latency_ms = \"soon\"").unwrap_err();
        assert!(err.to_string().contains("TOML"));
    }

    #[test]
    fn test_from_toml_file_missing() {
        let err = from_toml_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, PagewireError::ConfigurationError(_)));
    }

    // ── JSON loading ────────────────────────────────────────────────

    #[test]
    fn test_from_json_str_basic() {
        let json = r#"{ "fallback_title": "Please wait", "transition": { "enter_ms": 10 } }"#;
        let settings = from_json_str(json).unwrap();
        assert_eq!(settings.fallback_title, "Please wait");
        assert_eq!(settings.transition.enter_ms, 10);
        assert_eq!(settings.transition.exit_ms, 200);
    }

    #[test]
    fn test_from_json_str_invalid() {
        assert!(from_json_str("{not json").is_err());
    }

    // ── Files ───────────────────────────────────────────────────────

    #[test]
    fn test_from_file_picks_format_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("pagewire.json");
        std::fs::write(&json_path, r#"{ "load_latency_ms": 7 }"#).unwrap();
        assert_eq!(from_file_with_env(&json_path).unwrap().load_latency_ms, 7);

        let toml_path = dir.path().join("pagewire.toml");
        std::fs::write(&toml_path, "load_latency_ms = 8").unwrap();
        assert_eq!(from_file_with_env(&toml_path).unwrap().load_latency_ms, 8);

        // JSON content under a TOML name is a TOML parse error.
        let wrong = dir.path().join("pagewire.conf");
        std::fs::write(&wrong, r#"{ "load_latency_ms": 9 }"#).unwrap();
        let err = from_file_with_env(&wrong).unwrap_err();
        assert!(err.to_string().contains("TOML"));
    }

    #[test]
    fn test_from_json_file_missing() {
        let err = from_json_file("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("JSON file"));
    }

    // ── Environment overrides ───────────────────────────────────────

    #[test]
    fn test_apply_overrides() {
        let env: HashMap<&str, &str> = [
            ("PAGEWIRE_DEBUG", "0"),
            ("PAGEWIRE_LOG_LEVEL", "warn"),
            ("PAGEWIRE_CASE_SENSITIVE", "yes"),
            ("PAGEWIRE_LOAD_LATENCY_MS", "5"),
            ("PAGEWIRE_EXIT_MS", "11"),
            ("PAGEWIRE_ENTER_MS", "12"),
            ("PAGEWIRE_EXIT_TIMEOUT_MS", "13"),
        ]
        .into_iter()
        .collect();

        let mut settings = Settings::default();
        apply_overrides(&mut settings, |key| env.get(key).map(|v| (*v).to_string()));

        assert!(!settings.debug);
        assert_eq!(settings.log_level, "warn");
        assert!(settings.case_sensitive);
        assert_eq!(settings.load_latency_ms, 5);
        assert_eq!(settings.transition.exit_ms, 11);
        assert_eq!(settings.transition.enter_ms, 12);
        assert_eq!(settings.transition.exit_timeout_ms, 13);
    }

    #[test]
    fn test_apply_overrides_ignores_bad_numbers() {
        let mut settings = Settings::default();
        apply_overrides(&mut settings, |key| {
            (key == "PAGEWIRE_EXIT_MS").then(|| "fast".to_string())
        });
        assert_eq!(settings.transition.exit_ms, 200);
    }

    // ── Helpers ─────────────────────────────────────────────────────

    #[test]
    fn test_merge_json_deep() {
        let base = serde_json::json!({"a": 1, "b": {"c": 2, "d": 3}});
        let over = serde_json::json!({"b": {"c": 99}, "e": 5});
        let merged = merge_json(base, over);
        assert_eq!(merged, serde_json::json!({"a": 1, "b": {"c": 99, "d": 3}, "e": 5}));
    }
}
