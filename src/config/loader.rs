//! Configuration loader with file resolution and environment override support.

use super::error::{ConfigError, ConfigResult};
use super::schema::{Config, LogFormat};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Environment variable prefix for overrides
const ENV_PREFIX: &str = "KEYPAD_LOCK";

/// Config file name inside the platform config directory
const CONFIG_FILE_NAME: &str = "config.toml";

/// Config file name looked up in the current directory
const LOCAL_CONFIG_FILE_NAME: &str = "keypad-lock.toml";

/// Environment variable for explicit config path
const CONFIG_PATH_ENV: &str = "KEYPAD_LOCK_CONFIG";

/// Configuration loader with resolution and override logic.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Resolved config file path (if any)
    pub config_path: Option<PathBuf>,
    /// The loaded configuration
    pub config: Config,
}

impl ConfigLoader {
    /// Load configuration using standard resolution order.
    ///
    /// Resolution priority (highest to lowest):
    /// 1. `explicit` path (from `--config`), which must exist
    /// 2. `KEYPAD_LOCK_CONFIG` environment variable, which must exist
    /// 3. `./keypad-lock.toml` (current directory)
    /// 4. `<platform config dir>/keypad-lock-monitor/config.toml`
    /// 5. Built-in defaults (no file required)
    ///
    /// Environment variables then override individual values.
    pub fn load(explicit: Option<&Path>) -> ConfigResult<Self> {
        let config_path = resolve_config_path(explicit)?;

        let mut config = match config_path {
            Some(ref path) => load_from_file(path)?,
            None => Config::default(),
        };

        apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
        config.validate()?;

        Ok(Self {
            config_path,
            config,
        })
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: impl AsRef<Path>) -> ConfigResult<Self> {
        Self::load(Some(path.as_ref()))
    }

    /// Create a loader with default configuration (no file).
    pub fn with_defaults() -> Self {
        let mut config = Config::default();
        // Still apply env overrides even with defaults
        if apply_env_overrides(&mut config, |key| std::env::var(key).ok()).is_err()
            || config.validate().is_err()
        {
            config = Config::default();
        }

        Self {
            config_path: None,
            config,
        }
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The file the configuration was read from, if any.
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Consume the loader and return the configuration.
    pub fn into_config(self) -> Config {
        self.config
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(&self.config)?)
    }
}

/// Resolve the configuration file path using standard locations.
pub fn resolve_config_path(explicit: Option<&Path>) -> ConfigResult<Option<PathBuf>> {
    if let Some(path) = explicit {
        return existing(path.to_path_buf()).map(Some);
    }

    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        return existing(PathBuf::from(path)).map(Some);
    }

    let cwd_config = PathBuf::from(LOCAL_CONFIG_FILE_NAME);
    if cwd_config.exists() {
        return Ok(Some(cwd_config));
    }

    if let Some(app_config) = get_default_config_path() {
        if app_config.exists() {
            return Ok(Some(app_config));
        }
    }

    Ok(None)
}

fn existing(path: PathBuf) -> ConfigResult<PathBuf> {
    if path.exists() {
        Ok(path)
    } else {
        Err(ConfigError::NotFound(path))
    }
}

/// Get the platform config directory for this application.
pub fn get_default_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "keypad-lock-monitor").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the default config file path.
pub fn get_default_config_path() -> Option<PathBuf> {
    get_default_config_dir().map(|d| d.join(CONFIG_FILE_NAME))
}

/// Load configuration from a file.
fn load_from_file(path: &Path) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&content).map_err(ConfigError::ParseError)
}

fn env_key(suffix: &str) -> String {
    format!("{}_{}", ENV_PREFIX, suffix)
}

/// Apply environment variable overrides to the configuration.
///
/// Variables follow the pattern `KEYPAD_LOCK_<SECTION>_<KEY>`, for example
/// `KEYPAD_LOCK_SERIAL_PREFERRED_PORT=/dev/ttyACM0` or
/// `KEYPAD_LOCK_TUI_THEME=nord`.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> ConfigResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    // Serial overrides
    if let Some(val) = lookup(&env_key("SERIAL_PREFERRED_PORT")) {
        config.serial.preferred_port = Some(val).filter(|v| !v.is_empty());
    }
    if let Some(val) = lookup(&env_key("SERIAL_READ_BUFFER_SIZE")) {
        config.serial.read_buffer_size = val.parse().map_err(|_| {
            ConfigError::env_parse(env_key("SERIAL_READ_BUFFER_SIZE"), "Invalid buffer size")
        })?;
    }

    // TUI overrides
    if let Some(val) = lookup(&env_key("TUI_THEME")) {
        config.tui.theme = val;
    }
    if let Some(val) = lookup(&env_key("TUI_REFRESH_RATE_HZ")) {
        config.tui.refresh_rate_hz = val.parse().map_err(|_| {
            ConfigError::env_parse(env_key("TUI_REFRESH_RATE_HZ"), "Invalid refresh rate")
        })?;
    }

    // Logging overrides
    if let Some(val) = lookup(&env_key("LOGGING_FILE")) {
        config.logging.file = Some(PathBuf::from(val)).filter(|p| !p.as_os_str().is_empty());
    }
    if let Some(val) = lookup(&env_key("LOGGING_LEVEL")) {
        config.logging.level = val;
    }
    if let Some(val) = lookup(&env_key("LOGGING_FORMAT")) {
        config.logging.format = match val.to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            "pretty" => LogFormat::Pretty,
            "compact" => LogFormat::Compact,
            _ => {
                return Err(ConfigError::env_parse(
                    env_key("LOGGING_FORMAT"),
                    "Expected json, pretty or compact",
                ))
            }
        };
    }

    Ok(())
}
