//! Configuration loading and resolution
//!
//! Settings come from, highest priority first:
//! 1. Command-line arguments (clap also fills these from `IRIS_*` variables)
//! 2. TOML config file
//! 3. Compiled defaults
//!
//! The TOML file itself is located via `--config`, then the `IRIS_CONFIG`
//! environment variable, then `<config dir>/iris/iris-web.toml`. A missing
//! platform config file never stops startup: compiled defaults are used.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{Error, Result};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "IRIS_CONFIG";

/// Bootstrap configuration read from TOML; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Serialized classifier artifact (JSON)
    #[serde(default)]
    pub model_path: Option<PathBuf>,

    /// Feature schema asset (JSON with a `columns` list)
    #[serde(default)]
    pub schema_path: Option<PathBuf>,

    /// Species catalog (TOML); built-in iris catalog when absent
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,

    #[serde(default)]
    pub host: Option<String>,

    #[serde(default)]
    pub port: Option<u16>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default)]
    pub level: Option<String>,
}

/// Values used when neither CLI nor TOML provide one
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledDefaults {
    pub model_path: PathBuf,
    pub schema_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

impl Default for CompiledDefaults {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("model/model.json"),
            schema_path: PathBuf::from("model/columns.json"),
            host: "127.0.0.1".to_string(),
            port: 5000,
            log_level: "info".to_string(),
        }
    }
}

/// Command-line overrides (highest priority)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub model_path: Option<PathBuf>,
    pub schema_path: Option<PathBuf>,
    pub catalog_path: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
}

/// Fully resolved, immutable settings
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub model_path: PathBuf,
    pub schema_path: PathBuf,
    pub catalog_path: Option<PathBuf>,
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

impl Settings {
    /// Merge overrides, TOML values, and compiled defaults
    pub fn resolve(overrides: Overrides, toml: TomlConfig) -> Self {
        let defaults = CompiledDefaults::default();
        Self {
            model_path: overrides
                .model_path
                .or(toml.model_path)
                .unwrap_or(defaults.model_path),
            schema_path: overrides
                .schema_path
                .or(toml.schema_path)
                .unwrap_or(defaults.schema_path),
            catalog_path: overrides.catalog_path.or(toml.catalog_path),
            host: overrides.host.or(toml.host).unwrap_or(defaults.host),
            port: overrides.port.or(toml.port).unwrap_or(defaults.port),
            log_level: overrides
                .log_level
                .or(toml.logging.level)
                .unwrap_or(defaults.log_level),
        }
    }

    /// `host:port` for the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Platform default config file (`~/.config/iris/iris-web.toml` on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("iris").join("iris-web.toml"))
}

/// Where the loaded configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    CommandLine(PathBuf),
    Environment(PathBuf),
    PlatformDefault(PathBuf),
    /// No config file; compiled defaults only
    Defaults,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CommandLine(path) => write!(f, "{} (command line)", path.display()),
            ConfigSource::Environment(path) => {
                write!(f, "{} ({})", path.display(), CONFIG_ENV_VAR)
            }
            ConfigSource::PlatformDefault(path) => write!(f, "{}", path.display()),
            ConfigSource::Defaults => f.write_str("compiled defaults"),
        }
    }
}

/// Locate and load the config file
///
/// An explicitly named file (argument or environment) must exist and parse.
/// The platform default is optional. Nothing is logged here since this runs
/// before the tracing subscriber is installed; callers report the source.
pub fn load_config(cli_path: Option<&Path>) -> Result<(TomlConfig, ConfigSource)> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_path {
        let config = load_toml_config(path)?;
        return Ok((config, ConfigSource::CommandLine(path.to_path_buf())));
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            let path = PathBuf::from(path);
            let config = load_toml_config(&path)?;
            return Ok((config, ConfigSource::Environment(path)));
        }
    }

    // Priority 3: Platform config directory
    match default_config_path() {
        Some(path) if path.exists() => {
            let config = load_toml_config(&path)?;
            Ok((config, ConfigSource::PlatformDefault(path)))
        }
        _ => Ok((TomlConfig::default(), ConfigSource::Defaults)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_defaults() {
        let settings = Settings::resolve(Overrides::default(), TomlConfig::default());
        assert_eq!(settings.host, "127.0.0.1");
        assert_eq!(settings.port, 5000);
        assert_eq!(settings.model_path, PathBuf::from("model/model.json"));
        assert_eq!(settings.schema_path, PathBuf::from("model/columns.json"));
        assert!(settings.catalog_path.is_none());
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.bind_addr(), "127.0.0.1:5000");
    }

    #[test]
    fn test_override_beats_toml() {
        let toml = TomlConfig {
            port: Some(8080),
            host: Some("0.0.0.0".to_string()),
            ..Default::default()
        };
        let overrides = Overrides {
            port: Some(9090),
            ..Default::default()
        };
        let settings = Settings::resolve(overrides, toml);
        assert_eq!(settings.port, 9090);
        assert_eq!(settings.host, "0.0.0.0");
    }

    #[test]
    fn test_parse_full_toml() {
        let config: TomlConfig = toml::from_str(
            r#"
            model_path = "/srv/iris/model.json"
            schema_path = "/srv/iris/columns.json"
            catalog_path = "/srv/iris/species.toml"
            host = "0.0.0.0"
            port = 8000

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.port, Some(8000));
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
        assert_eq!(
            config.catalog_path,
            Some(PathBuf::from("/srv/iris/species.toml"))
        );
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(toml::from_str::<TomlConfig>("bogus = 1").is_err());
    }
}
