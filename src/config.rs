//! Configuration system for mxtgen.
//!
//! Configuration is loaded from multiple sources with the following precedence:
//! 1. Environment variables (highest priority)
//! 2. `mxtgen.toml` file
//! 3. Default values (lowest priority)
//!
//! # Environment Variables
//!
//! - `MXTGEN_BASE_URL` - Origin the relative request target is resolved against
//! - `MXTGEN_RESET_DELAY_MS` - Delay before the busy indicator clears
//! - `MXTGEN_DEFAULT_LOCALE` - Locale used when no preference is stored (`zh` or `en`)
//! - `MXTGEN_STORAGE_PATH` - Preference file location
//! - `MXTGEN_LOGGING_ENABLED` - Enable log output
//! - `MXTGEN_LOG_LEVEL` - Log level (trace, debug, info, warn, error)

use config::Config;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;

use crate::errors::{GenError, GenResult};
use crate::locale::Locale;

/// Global configuration singleton.
static CONFIG: OnceLock<MxtgenConfig> = OnceLock::new();

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MxtgenConfig {
    /// Generation endpoint configuration
    pub endpoint: EndpointConfig,
    /// Form defaults and bounds
    pub form: FormConfig,
    /// Transient UI behaviour
    pub ui: UiConfig,
    /// Preference storage
    pub storage: StorageConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Where submissions are sent and how the result is named.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Base URL the relative target is resolved against
    pub base_url: String,
    /// Relative path of the generation endpoint
    pub path: String,
    /// Suggested file name for the downloaded artifact
    pub filename: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080/".to_string(),
            path: "./gen".to_string(),
            filename: "Custom.mxtpro".to_string(),
        }
    }
}

/// Initial field values and seat bounds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    pub default_version: String,
    pub default_count: String,
    pub min_count: u32,
    pub max_count: u32,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            default_version: "25.2".to_string(),
            default_count: "1".to_string(),
            min_count: 1,
            max_count: 999,
        }
    }
}

/// UI timing and locale defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Milliseconds between the trigger and the loading flag reset
    pub reset_delay_ms: u64,
    /// Locale token used when nothing valid is stored
    pub default_locale: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            reset_delay_ms: 1000,
            default_locale: Locale::default().token().to_string(),
        }
    }
}

impl UiConfig {
    pub fn reset_delay(&self) -> Duration {
        Duration::from_millis(self.reset_delay_ms)
    }

    /// Parsed default locale, falling back to the built-in default.
    pub fn default_locale(&self) -> Locale {
        Locale::from_token(&self.default_locale).unwrap_or_default()
    }
}

/// Preference storage configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Explicit preference file; empty means the platform data directory
    pub path: String,
}

impl StorageConfig {
    /// Resolve the preference file location.
    ///
    /// - Linux: `~/.local/share/mxtgen/prefs.json`
    /// - macOS: `~/Library/Application Support/mxtgen/prefs.json`
    /// - Windows: `%APPDATA%\mxtgen\prefs.json`
    pub fn resolve_path(&self) -> Option<PathBuf> {
        if !self.path.is_empty() {
            return Some(PathBuf::from(&self.path));
        }
        dirs::data_dir().map(|p| p.join("mxtgen").join("prefs.json"))
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Enable logging
    pub enabled: bool,
    /// Log level: trace, debug, info, warn, error
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: "info".to_string(),
        }
    }
}

fn config_err(e: config::ConfigError) -> GenError {
    GenError::ConfigError(e.to_string())
}

impl MxtgenConfig {
    /// Load configuration from file and environment.
    ///
    /// Later sources override earlier ones:
    /// 1. Default values
    /// 2. `mxtgen.toml` file (optional)
    /// 3. Environment variables
    pub fn load() -> GenResult<Self> {
        let builder = Config::builder()
            .set_default("endpoint.base_url", "http://127.0.0.1:8080/")
            .map_err(config_err)?
            .set_default("endpoint.path", "./gen")
            .map_err(config_err)?
            .set_default("endpoint.filename", "Custom.mxtpro")
            .map_err(config_err)?
            .set_default("form.default_version", "25.2")
            .map_err(config_err)?
            .set_default("form.default_count", "1")
            .map_err(config_err)?
            .set_default("form.min_count", 1)
            .map_err(config_err)?
            .set_default("form.max_count", 999)
            .map_err(config_err)?
            .set_default("ui.reset_delay_ms", 1000)
            .map_err(config_err)?
            .set_default("ui.default_locale", Locale::default().token())
            .map_err(config_err)?
            .set_default("storage.path", "")
            .map_err(config_err)?
            .set_default("logging.enabled", false)
            .map_err(config_err)?
            .set_default("logging.level", "info")
            .map_err(config_err)?
            .add_source(config::File::with_name("mxtgen").required(false))
            .set_override_option("endpoint.base_url", env::var("MXTGEN_BASE_URL").ok())
            .map_err(config_err)?
            .set_override_option(
                "ui.reset_delay_ms",
                env::var("MXTGEN_RESET_DELAY_MS")
                    .ok()
                    .and_then(|v| v.parse::<i64>().ok()),
            )
            .map_err(config_err)?
            .set_override_option(
                "ui.default_locale",
                env::var("MXTGEN_DEFAULT_LOCALE").ok(),
            )
            .map_err(config_err)?
            .set_override_option("storage.path", env::var("MXTGEN_STORAGE_PATH").ok())
            .map_err(config_err)?
            .set_override_option(
                "logging.enabled",
                env::var("MXTGEN_LOGGING_ENABLED")
                    .ok()
                    .and_then(|v| v.parse::<bool>().ok()),
            )
            .map_err(config_err)?
            .set_override_option("logging.level", env::var("MXTGEN_LOG_LEVEL").ok())
            .map_err(config_err)?;

        let settings = builder
            .build()
            .map_err(|e| GenError::ConfigError(format!("failed to build config: {e}")))?;

        settings
            .try_deserialize()
            .map_err(|e| GenError::ConfigError(format!("failed to deserialize config: {e}")))
    }

    /// Validate the configuration.
    pub fn validate(&self) -> GenResult<()> {
        if url::Url::parse(&self.endpoint.base_url).is_err() {
            return Err(GenError::ConfigError(format!(
                "endpoint.base_url is not a valid URL: '{}'",
                self.endpoint.base_url
            )));
        }
        if self.endpoint.path.is_empty() {
            return Err(GenError::ConfigError(
                "endpoint.path cannot be empty".to_string(),
            ));
        }
        if self.endpoint.filename.is_empty() {
            return Err(GenError::ConfigError(
                "endpoint.filename cannot be empty".to_string(),
            ));
        }

        if self.form.min_count == 0 {
            return Err(GenError::ConfigError(
                "form.min_count must be greater than 0".to_string(),
            ));
        }
        if self.form.min_count > self.form.max_count {
            return Err(GenError::ConfigError(format!(
                "form.min_count ({}) exceeds form.max_count ({})",
                self.form.min_count, self.form.max_count
            )));
        }

        if Locale::from_token(&self.ui.default_locale).is_none() {
            return Err(GenError::ConfigError(format!(
                "ui.default_locale must be 'zh' or 'en', got '{}'",
                self.ui.default_locale
            )));
        }

        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(GenError::ConfigError(format!(
                    "logging.level must be one of: trace, debug, info, warn, error. Got '{other}'"
                )));
            }
        }

        Ok(())
    }
}

/// Get the global configuration.
///
/// Loads on first access and caches the validated result.
pub fn get_config() -> GenResult<&'static MxtgenConfig> {
    if let Some(config) = CONFIG.get() {
        return Ok(config);
    }

    let config = MxtgenConfig::load()?;
    config.validate()?;

    // Another thread may have won the race; either value is valid.
    let _ = CONFIG.set(config);

    CONFIG
        .get()
        .ok_or_else(|| GenError::ConfigError("configuration was not initialised".to_string()))
}

/// Initialize configuration explicitly.
///
/// Call this early to surface configuration errors at startup.
pub fn init_config() -> GenResult<&'static MxtgenConfig> {
    get_config()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = MxtgenConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.endpoint.path, "./gen");
        assert_eq!(config.endpoint.filename, "Custom.mxtpro");
        assert_eq!(config.ui.reset_delay(), Duration::from_secs(1));
        assert_eq!(config.ui.default_locale(), Locale::Zh);
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let mut config = MxtgenConfig::default();
        config.form.min_count = 10;
        config.form.max_count = 5;
        assert!(matches!(config.validate(), Err(GenError::ConfigError(_))));
    }

    #[test]
    fn unknown_locale_is_rejected() {
        let mut config = MxtgenConfig::default();
        config.ui.default_locale = "fr".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn bad_base_url_is_rejected() {
        let mut config = MxtgenConfig::default();
        config.endpoint.base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn explicit_storage_path_wins() {
        let storage = StorageConfig {
            path: "/tmp/prefs.json".to_string(),
        };
        assert_eq!(storage.resolve_path(), Some(PathBuf::from("/tmp/prefs.json")));
    }
}
