//! Configuration loading and discovery for `crosswalk.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::CrosswalkConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name searched for during discovery
pub const CONFIG_FILE_NAME: &str = "crosswalk.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse crosswalk.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override the statistics endpoint
    pub base_url: Option<String>,
    /// Override the polling interval in seconds
    pub poll_interval_secs: Option<u64>,
    /// Override the trailing window in days
    pub timeframe_days: Option<u32>,
    /// Override the canvas width
    pub width: Option<u32>,
    /// Override the canvas height
    pub height: Option<u32>,
    /// Override the device pixel ratio
    pub device_pixel_ratio: Option<f64>,
}

/// Find crosswalk.toml by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory looking for crosswalk.toml
/// 2. Check XDG_CONFIG_HOME/crosswalk/crosswalk.toml (or ~/.config/crosswalk/crosswalk.toml)
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Find crosswalk.toml in the XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("crosswalk").join(CONFIG_FILE_NAME);
    if config_path.exists() {
        Some(config_path)
    } else {
        None
    }
}

/// Find crosswalk.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from a crosswalk.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses `find_config()`
/// to locate the config file. If no config file is found, returns the
/// default configuration.
///
/// # Example
/// ```ignore
/// let config = load_config(None)?;
/// let config = load_config(Some(Path::new("site/crosswalk.toml")))?;
/// ```
pub fn load_config(path: Option<&Path>) -> Result<CrosswalkConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => {
            tracing::debug!(path = %p.display(), "loading config");
            load_config_file(&p)
        }
        None => Ok(CrosswalkConfig::default()),
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<CrosswalkConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parse and validate configuration text.
pub fn parse_config(contents: &str) -> Result<CrosswalkConfig, ConfigError> {
    let config: CrosswalkConfig = toml::from_str(contents)?;
    validated(config)
}

fn validated(config: CrosswalkConfig) -> Result<CrosswalkConfig, ConfigError> {
    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }
    Ok(config)
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values. The merged
/// configuration is validated again.
pub fn merge_cli_overrides(config: CrosswalkConfig, overrides: &CliOverrides) -> Result<CrosswalkConfig, ConfigError> {
    let mut config = config;

    if let Some(ref base_url) = overrides.base_url {
        config.feed.base_url = base_url.clone();
    }
    if let Some(interval) = overrides.poll_interval_secs {
        config.feed.poll_interval_secs = interval;
    }
    if let Some(timeframe) = overrides.timeframe_days {
        config.feed.timeframe_days = timeframe;
    }
    if let Some(width) = overrides.width {
        config.viewport.width = width;
    }
    if let Some(height) = overrides.height {
        config.viewport.height = height;
    }
    if let Some(dpr) = overrides.device_pixel_ratio {
        config.viewport.device_pixel_ratio = dpr;
    }

    validated(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(dir: &Path, contents: &[u8]) -> PathBuf {
        let config_path = dir.join(CONFIG_FILE_NAME);
        File::create(&config_path)
            .expect("should create config file")
            .write_all(contents)
            .expect("should write config content");
        config_path
    }

    #[test]
    fn test_find_config_in_current_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), b"[viewport]\nwidth = 100");

        let found = find_config_from(temp.path().to_path_buf());
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_in_parent_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), b"");

        let subdir = temp.path().join("site").join("assets");
        fs::create_dir_all(&subdir).expect("should create subdirectories");

        let found = find_config_from(subdir);
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_not_found() {
        let temp = TempDir::new().expect("should create temp dir");
        assert_eq!(find_config_from(temp.path().to_path_buf()), None);
    }

    #[test]
    fn test_load_config_from_file() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(
            temp.path(),
            br#"
[feed]
base_url = "http://localhost:3000/api/trpc"
poll_interval_secs = 30

[lanes.human]
prepopulate = 100
"#,
        );

        let config = load_config(Some(&config_path)).expect("should load valid config");
        assert_eq!(config.feed.base_url, "http://localhost:3000/api/trpc");
        assert_eq!(config.feed.poll_interval_secs, 30);
        assert_eq!(config.lanes.human.prepopulate, Some(100));
        assert_eq!(config.viewport.height, 240);
    }

    #[test]
    fn test_load_config_missing_file_errors() {
        let temp = TempDir::new().expect("should create temp dir");
        let result = load_config(Some(&temp.path().join("nonexistent.toml")));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), b"this is not valid toml {{{");
        assert!(matches!(load_config(Some(&config_path)), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_validation_error() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), b"[viewport]\nwidth = 0\n[style]\nroad = \"#GGG\"\n");

        match load_config(Some(&config_path)) {
            Err(ConfigError::Validation(errors)) => {
                assert_eq!(errors.len(), 2);
                assert!(errors[0].contains("viewport.width"));
                assert!(errors[1].contains("style.road"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_merge_cli_overrides() {
        let overrides = CliOverrides {
            width: Some(320),
            poll_interval_secs: Some(5),
            ..Default::default()
        };
        let config = merge_cli_overrides(CrosswalkConfig::default(), &overrides).expect("valid overrides");
        assert_eq!(config.viewport.width, 320);
        assert_eq!(config.viewport.height, 240);
        assert_eq!(config.feed.poll_interval_secs, 5);
    }

    #[test]
    fn test_merge_cli_overrides_revalidates() {
        let overrides = CliOverrides { device_pixel_ratio: Some(0.0), ..Default::default() };
        let result = merge_cli_overrides(CrosswalkConfig::default(), &overrides);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}
