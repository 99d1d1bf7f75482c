//! Configuration module.
//!
//! TOML-based configuration with environment variable overrides.
//!
//! # Configuration Resolution
//!
//! 1. `--config <path>` on the command line
//! 2. `KEYPAD_LOCK_CONFIG` environment variable (explicit path)
//! 3. `./keypad-lock.toml` (current directory)
//! 4. `<platform config dir>/keypad-lock-monitor/config.toml`
//! 5. Built-in defaults (no file required)
//!
//! # Environment Overrides
//!
//! The pattern is `KEYPAD_LOCK_<SECTION>_<KEY>`, e.g.
//! `KEYPAD_LOCK_TUI_THEME=dracula` or `KEYPAD_LOCK_LOGGING_FILE=/tmp/lock.log`.
//!
//! # Example
//!
//! ```rust,ignore
//! use keypad_lock_monitor::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load(None)?;
//! println!("Theme: {}", loader.config().tui.theme);
//! ```

mod error;
mod loader;
mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{
    apply_env_overrides, get_default_config_dir, get_default_config_path, resolve_config_path,
    ConfigLoader,
};
pub use schema::{Config, LogFormat, LoggingConfig, SerialConfig, TuiConfig};
