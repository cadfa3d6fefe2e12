//! Configuration management for quiltro.
//!
//! Parses `quiltro.toml` with serde and provides auto-discovery of the file
//! in the current directory and its parents. CLI settings passed through
//! [`CliSettings`] take precedence over file values.
//!
//! ```toml
//! [render]
//! heading_level = 2
//! gateway = "${GEMINI_GATEWAY:-http://portal.mozz.us/gemini}"
//! show_link_urls = false
//! ```
//!
//! `render.gateway` supports `${VAR}` and `${VAR:-default}` expansion.

mod expand;

use std::path::{Path, PathBuf};

use quiltro_gemtext::{DEFAULT_GATEWAY, RenderOptions};
use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "quiltro.toml";

/// Deepest heading level HTML supports.
const MAX_HEADING_LEVEL: u8 = 6;

/// CLI settings that override configuration file values.
///
/// Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the output level of H1 nodes.
    pub heading_level: Option<u8>,
    /// Override the gemini gateway prefix.
    pub gateway: Option<String>,
    /// Override whether raw URLs follow link text.
    pub show_link_urls: Option<bool>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTML rendering configuration.
    pub render: RenderConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// HTML rendering configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Output level of H1 nodes (1-6).
    pub heading_level: u8,
    /// HTTP gateway prefix for `gemini://` links.
    pub gateway: String,
    /// Show the raw URL after link text that differs from it.
    pub show_link_urls: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            heading_level: 1,
            gateway: DEFAULT_GATEWAY.to_owned(),
            show_link_urls: false,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`render.gateway`").
        field: String,
        /// Error message (e.g., "${`GEMINI_GATEWAY`} not set").
        message: String,
    },
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise searches
    /// for `quiltro.toml` in the current directory and its parents, falling
    /// back to defaults.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting values (after CLI overrides) are invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Renderer options for the core.
    #[must_use]
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            heading_level: self.render.heading_level,
            gateway: self.render.gateway.clone(),
            show_link_urls: self.render.show_link_urls,
        }
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(level) = settings.heading_level {
            self.render.heading_level = level;
        }
        if let Some(gateway) = &settings.gateway {
            self.render.gateway.clone_from(gateway);
        }
        if let Some(show) = settings.show_link_urls {
            self.render.show_link_urls = show;
        }
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let level = self.render.heading_level;
        if !(1..=MAX_HEADING_LEVEL).contains(&level) {
            return Err(ConfigError::Validation(format!(
                "render.heading_level must be between 1 and {MAX_HEADING_LEVEL}, got {level}"
            )));
        }

        let gateway = &self.render.gateway;
        if gateway.is_empty() {
            return Err(ConfigError::Validation(
                "render.gateway cannot be empty".to_owned(),
            ));
        }
        if !gateway.starts_with("http://") && !gateway.starts_with("https://") {
            return Err(ConfigError::Validation(
                "render.gateway must start with http:// or https://".to_owned(),
            ));
        }

        Ok(())
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.render.gateway = expand::expand_env(&config.render.gateway, "render.gateway")?;
        config.config_path = Some(path.to_path_buf());
        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn write_config(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.render.heading_level, 1);
        assert_eq!(config.render.gateway, DEFAULT_GATEWAY);
        assert!(!config.render.show_link_urls);
        assert!(config.config_path.is_none());
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.render.heading_level, 1);
        assert_eq!(config.render.gateway, DEFAULT_GATEWAY);
    }

    #[test]
    fn test_parse_render_config() {
        let toml = r#"
[render]
heading_level = 2
gateway = "https://gw.example/gemini"
show_link_urls = true
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.render.heading_level, 2);
        assert_eq!(config.render.gateway, "https://gw.example/gemini");
        assert!(config.render.show_link_urls);
    }

    #[test]
    fn test_render_options() {
        let toml = r"
[render]
heading_level = 3
";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(
            config.render_options(),
            RenderOptions {
                heading_level: 3,
                gateway: DEFAULT_GATEWAY.to_owned(),
                show_link_urls: false,
            }
        );
    }

    #[test]
    fn test_load_explicit_path() {
        let (_dir, path) = write_config("[render]\nheading_level = 2\n");
        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.render.heading_level, 2);
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_path() {
        let err = Config::load(Some(Path::new("/nonexistent/quiltro.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_parse_error() {
        let (_dir, path) = write_config("[render\n");
        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_rejects_invalid_file_values() {
        let (_dir, path) = write_config("[render]\nheading_level = 7\n");
        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(err.to_string().contains("render.heading_level"));
    }

    #[test]
    fn test_load_expands_gateway() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("QUILTRO_LOAD_GATEWAY", "https://proxy.example");
        }
        let (_dir, path) = write_config("[render]\ngateway = \"${QUILTRO_LOAD_GATEWAY}/g\"\n");
        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.render.gateway, "https://proxy.example/g");
        unsafe {
            std::env::remove_var("QUILTRO_LOAD_GATEWAY");
        }
    }

    #[test]
    fn test_cli_settings_override_file() {
        let (_dir, path) = write_config("[render]\nheading_level = 2\nshow_link_urls = true\n");
        let settings = CliSettings {
            heading_level: Some(3),
            gateway: Some("https://cli.example".to_owned()),
            show_link_urls: None,
        };
        let config = Config::load(Some(&path), Some(&settings)).unwrap();
        assert_eq!(config.render.heading_level, 3);
        assert_eq!(config.render.gateway, "https://cli.example");
        assert!(config.render.show_link_urls);
    }

    #[test]
    fn test_cli_settings_validated() {
        let (_dir, path) = write_config("");
        let settings = CliSettings {
            heading_level: Some(0),
            ..Default::default()
        };
        let err = Config::load(Some(&path), Some(&settings)).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings::default());
        assert_eq!(config.render.heading_level, 1);
        assert_eq!(config.render.gateway, DEFAULT_GATEWAY);
    }

    #[test]
    fn test_validate_gateway_empty() {
        let mut config = Config::default();
        config.render.gateway = String::new();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("cannot be empty"));
    }

    #[test]
    fn test_validate_gateway_scheme() {
        let mut config = Config::default();
        config.render.gateway = "gemini://loop".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("http://"));
    }
}
