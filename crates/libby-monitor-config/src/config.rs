use crate::error::ConfigError;
use crate::paths::PathManager;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub const DEFAULT_LIBRARY: &str = "telaviv";
pub const DEFAULT_LIBRARY_NAME: &str = "Israel Digital";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Library code used by `watch` when `--library` is omitted
    #[serde(default = "default_library")]
    pub default_library: String,
    /// Library code -> display name. Informational only.
    #[serde(default = "default_libraries")]
    pub libraries: BTreeMap<String, String>,
    #[serde(default)]
    pub catalogue: CatalogueSettings,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

/// Remote catalogue API settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogueSettings {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Pause between consecutive watchlist queries during `check`
    #[serde(default = "default_rate_limit_ms")]
    pub rate_limit_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SchedulerConfig {
    /// Cron expression with a seconds field, evaluated in UTC
    #[serde(default = "default_schedule")]
    pub schedule: String,
    #[serde(default = "default_true")]
    pub run_on_startup: bool,
}

/// Shape of the `config.json` written by earlier releases
#[derive(Debug, Deserialize)]
struct LegacyConfig {
    default_library: Option<String>,
    #[serde(default)]
    libraries: BTreeMap<String, String>,
}

fn default_library() -> String {
    DEFAULT_LIBRARY.to_string()
}

fn default_libraries() -> BTreeMap<String, String> {
    let mut libraries = BTreeMap::new();
    libraries.insert(DEFAULT_LIBRARY.to_string(), DEFAULT_LIBRARY_NAME.to_string());
    libraries
}

fn default_api_base() -> String {
    "https://thunder.api.overdrive.com/v2/libraries".to_string()
}

fn default_user_agent() -> String {
    format!("libby-book-monitor/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_rate_limit_ms() -> u64 {
    1000
}

fn default_schedule() -> String {
    "0 0 */6 * * *".to_string() // Every 6 hours
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_library: default_library(),
            libraries: default_libraries(),
            catalogue: CatalogueSettings::default(),
            scheduler: SchedulerConfig::default(),
        }
    }
}

impl Default for CatalogueSettings {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            rate_limit_ms: default_rate_limit_ms(),
        }
    }
}

impl CatalogueSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn rate_limit(&self) -> Duration {
        Duration::from_millis(self.rate_limit_ms)
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            schedule: default_schedule(),
            run_on_startup: default_true(),
        }
    }
}

impl Config {
    /// Load the config from the data directory, creating it on first use.
    ///
    /// A `config.json` left by an earlier release is imported when no
    /// `config.toml` exists yet.
    pub fn load_or_create(paths: &PathManager) -> Result<Self, ConfigError> {
        paths.ensure_directories()?;
        let config_file = paths.config_file();

        if config_file.exists() {
            let config = Self::load_from_file(&config_file)?;
            config.validate()?;
            return Ok(config);
        }

        let legacy_file = paths.legacy_config_file();
        let config = if legacy_file.exists() {
            let config = Self::load_legacy(&legacy_file)?;
            info!(
                operation = "config_import",
                from = %legacy_file.display(),
                to = %config_file.display(),
                "Imported legacy JSON config"
            );
            config
        } else {
            info!(operation = "config_create", path = %config_file.display(), "Creating default config");
            Self::default()
        };

        config.validate()?;
        config.save_to_file(&config_file)?;
        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn load_legacy(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        let legacy: LegacyConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::LegacyParse {
                path: path.to_path_buf(),
                source,
            })?;

        let mut config = Self::default();
        if let Some(library) = legacy.default_library {
            config.default_library = library;
        }
        if !legacy.libraries.is_empty() {
            config.libraries = legacy.libraries;
        }
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::io(parent, e))?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::io(path, e))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_library.trim().is_empty() {
            return Err(ConfigError::Invalid("default_library cannot be empty".to_string()));
        }
        if !self.catalogue.api_base.starts_with("http://")
            && !self.catalogue.api_base.starts_with("https://")
        {
            return Err(ConfigError::Invalid(format!(
                "catalogue.api_base must be an http(s) URL, got '{}'",
                self.catalogue.api_base
            )));
        }
        if self.catalogue.timeout_secs == 0 {
            return Err(ConfigError::Invalid("catalogue.timeout_secs must be positive".to_string()));
        }
        Ok(())
    }

    /// Display name for a library code, if one is configured
    pub fn library_name(&self, code: &str) -> Option<&str> {
        self.libraries.get(code).map(String::as_str)
    }

    pub fn add_library(&mut self, code: impl Into<String>, name: impl Into<String>) {
        self.libraries.insert(code.into(), name.into());
    }

    pub fn set_default_library(&mut self, code: impl Into<String>) {
        self.default_library = code.into();
    }
}
