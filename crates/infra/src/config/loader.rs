//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. If `CYCLARC_EVENT_STORE_URL` is set, configuration comes from the
//!    environment
//! 2. Otherwise probes multiple paths for a config file
//! 3. With no file either, the built-in defaults are used
//!
//! Every result is checked with [`Config::validate`].
//!
//! ## Environment Variables
//! - `CYCLARC_EVENT_STORE_URL`: Event store base URL (required for env loading)
//! - `CYCLARC_EVENT_STORE_USER_AGENT`: User agent sent to the event store
//! - `CYCLARC_EVENT_STORE_TIMEOUT_SECS`: Request timeout in seconds
//! - `CYCLARC_VIEW_DAY_START_HOUR`: First hour row of week/day grids
//! - `CYCLARC_VIEW_DAY_END_HOUR`: Last hour row of week/day grids
//! - `CYCLARC_VIEW_DEFAULT_GRANULARITY`: `month`, `week` or `day`
//! - `CYCLARC_LOG_LEVEL`: Default log filter
//! - `CYCLARC_LOG_JSON`: Emit JSON logs (true/false)
//!
//! Credentials are never read here; the bearer token goes straight into the
//! session object.
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./cyclarc.toml` or `./cyclarc.json` (current working directory)
//! 2. `./config.toml` or `./config.json` (current working directory)
//! 3. The same names one and two directories up
//! 4. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use cyclarc_domain::{Config, CyclarcError, Granularity, Result};

const CONFIG_FILE_NAMES: &[&str] = &["cyclarc.toml", "cyclarc.json", "config.toml", "config.json"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `CyclarcError::Config` if a source is present but invalid.
pub fn load() -> Result<Config> {
    if std::env::var_os("CYCLARC_EVENT_STORE_URL").is_some() {
        let config = load_from_env()?;
        tracing::info!("Configuration loaded from environment variables");
        return Ok(config);
    }

    match probe_config_paths() {
        Some(path) => load_from_file(Some(path)),
        None => {
            tracing::info!("No configuration file found, using defaults");
            let config = Config::default();
            config.validate()?;
            Ok(config)
        }
    }
}

/// Load configuration from environment variables
///
/// `CYCLARC_EVENT_STORE_URL` is required; every other variable falls back to
/// its default.
///
/// # Errors
/// Returns `CyclarcError::Config` if the URL is missing or a variable has an
/// invalid value.
pub fn load_from_env() -> Result<Config> {
    let mut config = Config::default();

    config.event_store.base_url = env_var("CYCLARC_EVENT_STORE_URL")?;
    if let Ok(agent) = std::env::var("CYCLARC_EVENT_STORE_USER_AGENT") {
        config.event_store.user_agent = agent;
    }
    config.event_store.timeout_secs =
        env_parse::<u64>("CYCLARC_EVENT_STORE_TIMEOUT_SECS", "event store timeout")?;

    if let Some(hour) = env_parse::<u32>("CYCLARC_VIEW_DAY_START_HOUR", "day start hour")? {
        config.view.day_start_hour = hour;
    }
    if let Some(hour) = env_parse::<u32>("CYCLARC_VIEW_DAY_END_HOUR", "day end hour")? {
        config.view.day_end_hour = hour;
    }
    if let Some(granularity) =
        env_parse::<Granularity>("CYCLARC_VIEW_DEFAULT_GRANULARITY", "default granularity")?
    {
        config.view.default_granularity = granularity;
    }

    if let Ok(level) = std::env::var("CYCLARC_LOG_LEVEL") {
        config.logging.level = level;
    }
    config.logging.json = env_bool("CYCLARC_LOG_JSON", false);

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `CyclarcError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - A value fails validation
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(CyclarcError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            CyclarcError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| CyclarcError::Config(format!("Failed to read config file: {}", e)))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| CyclarcError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| CyclarcError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(CyclarcError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.extend([exe_dir.to_path_buf(), exe_dir.join(".."), exe_dir.join("../..")]);
        }
    }

    probe_in(&dirs)
}

fn probe_in(dirs: &[PathBuf]) -> Option<PathBuf> {
    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.is_file())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        CyclarcError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Parse an optional environment variable.
fn env_parse<T>(key: &str, what: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| CyclarcError::Config(format!("Invalid {}: {}", what, e))),
        Err(_) => Ok(None),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use tempfile::TempDir;

    use super::*;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const ENV_KEYS: &[&str] = &[
        "CYCLARC_EVENT_STORE_URL",
        "CYCLARC_EVENT_STORE_USER_AGENT",
        "CYCLARC_EVENT_STORE_TIMEOUT_SECS",
        "CYCLARC_VIEW_DAY_START_HOUR",
        "CYCLARC_VIEW_DAY_END_HOUR",
        "CYCLARC_VIEW_DEFAULT_GRANULARITY",
        "CYCLARC_LOG_LEVEL",
        "CYCLARC_LOG_JSON",
    ];

    fn clear_env() {
        for key in ENV_KEYS {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_env_bool_parsing() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

        std::env::set_var("CYCLARC_TEST_BOOL_YES", "YES");
        std::env::set_var("CYCLARC_TEST_BOOL_OFF", "off");
        assert!(env_bool("CYCLARC_TEST_BOOL_YES", false));
        assert!(!env_bool("CYCLARC_TEST_BOOL_OFF", true));

        std::env::remove_var("CYCLARC_TEST_BOOL_MISSING");
        assert!(env_bool("CYCLARC_TEST_BOOL_MISSING", true));

        std::env::remove_var("CYCLARC_TEST_BOOL_YES");
        std::env::remove_var("CYCLARC_TEST_BOOL_OFF");
    }

    #[test]
    fn test_load_from_env_all_vars_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("CYCLARC_EVENT_STORE_URL", "https://store.example.org/api");
        std::env::set_var("CYCLARC_EVENT_STORE_TIMEOUT_SECS", "15");
        std::env::set_var("CYCLARC_VIEW_DAY_START_HOUR", "7");
        std::env::set_var("CYCLARC_VIEW_DAY_END_HOUR", "20");
        std::env::set_var("CYCLARC_VIEW_DEFAULT_GRANULARITY", "Week");
        std::env::set_var("CYCLARC_LOG_JSON", "true");

        let result = load_from_env();
        clear_env();

        let config = result.expect("config from env");
        assert_eq!(config.event_store.base_url, "https://store.example.org/api");
        assert_eq!(config.event_store.timeout_secs, Some(15));
        assert_eq!(config.view.day_start_hour, 7);
        assert_eq!(config.view.day_end_hour, 20);
        assert_eq!(config.view.default_granularity, Granularity::Week);
        assert!(config.logging.json);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_from_env_missing_url() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        let err = load_from_env().unwrap_err();
        assert!(matches!(err, CyclarcError::Config(_)), "Should be a Config error");
    }

    #[test]
    fn test_load_from_env_invalid_values() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("CYCLARC_EVENT_STORE_URL", "http://localhost:9000");
        std::env::set_var("CYCLARC_VIEW_DEFAULT_GRANULARITY", "fortnight");
        let granularity = load_from_env();

        std::env::set_var("CYCLARC_VIEW_DEFAULT_GRANULARITY", "day");
        std::env::set_var("CYCLARC_VIEW_DAY_START_HOUR", "23");
        let hours = load_from_env();
        clear_env();

        assert!(matches!(granularity, Err(CyclarcError::Config(_))));
        assert!(matches!(hours, Err(CyclarcError::Config(_))));
    }

    #[test]
    fn test_parse_config_unknown_extension() {
        let result = parse_config("", Path::new("cyclarc.yaml"));
        assert!(matches!(result, Err(CyclarcError::Config(msg)) if msg.contains("yaml")));
    }

    #[test]
    fn test_probe_prefers_cyclarc_file() {
        let dir = TempDir::new().expect("temp dir");
        std::fs::write(dir.path().join("config.json"), "{}").unwrap();
        std::fs::write(dir.path().join("cyclarc.toml"), "").unwrap();

        let found = probe_in(&[dir.path().to_path_buf()]).expect("config file");
        assert_eq!(found.file_name().and_then(|n| n.to_str()), Some("cyclarc.toml"));
    }

    #[test]
    fn test_probe_ignores_directories() {
        let dir = TempDir::new().expect("temp dir");
        std::fs::create_dir(dir.path().join("config.json")).unwrap();
        assert!(probe_in(&[dir.path().to_path_buf()]).is_none());
    }
}
