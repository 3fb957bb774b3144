//! Settings loader with layered sources
//!
//! Loads settings from multiple sources with the following precedence
//! (highest to lowest):
//! 1. Environment variables (SCOPEGATE__*)
//! 2. `SCOPEGATE_AUTH` and `SCOPEGATE_AUTH_ADDR` shorthands
//! 3. Configuration file (TOML)
//! 4. Default values
//!
//! Environment values are taken as strings, so a password like `007` keeps
//! its leading zeros. `auth.addr` is a comma-separated list in either form.
//!
//! Loading validates everything the gatekeeper depends on, so a process that
//! gets settings back can start serving.

use crate::admission::NetworkAllowList;
use crate::config::types::Settings;
use crate::error::ConfigError;
use config::{Config, Environment, File, FileFormat};
use std::env;
use std::path::Path;
use tracing::debug;

/// Default configuration file paths to check (in order)
const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "scopegate.toml",
    ".scopegate.toml",
    "~/.config/scopegate/config.toml",
    "/etc/scopegate/config.toml",
];

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Nested variables that outrank the `SCOPEGATE_AUTH` shorthand
const NESTED_AUTH_VARS: &[&str] = &[
    "SCOPEGATE__AUTH__AUTH",
    "SCOPEGATE__AUTH__USER",
    "SCOPEGATE__AUTH__PASS",
];

/// Load settings from a TOML string (useful for testing)
pub fn load_settings_from_str(toml_str: &str) -> Result<Settings, ConfigError> {
    let config = Config::builder()
        .add_source(File::from_str(toml_str, FileFormat::Toml))
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let settings: Settings = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_settings(&settings)?;

    Ok(settings)
}

/// Load settings from files and environment
pub fn load_settings(config_path: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    if let Some(path) = config_path {
        // Explicit path provided - must exist
        if !Path::new(path).exists() {
            return Err(ConfigError::Load(format!(
                "Configuration file not found: {}",
                path
            )));
        }
        builder = builder.add_source(File::new(path, FileFormat::Toml));
    } else {
        // Try default paths (first existing one wins)
        for path in DEFAULT_CONFIG_PATHS {
            let expanded = shellexpand::tilde(path);
            if Path::new(expanded.as_ref()).exists() {
                debug!(path = %expanded, "Using configuration file");
                builder = builder.add_source(File::new(&expanded, FileFormat::Toml));
                break;
            }
        }
    }

    // e.g., SCOPEGATE__AUTH__USER, SCOPEGATE__LOGGING__LEVEL
    // Double underscore (__) maps to nested keys (auth.user)
    builder = builder.add_source(
        Environment::with_prefix("SCOPEGATE")
            .prefix_separator("__")
            .separator("__"),
    );

    // Combined master credentials, user:pass. Any nested auth variable
    // takes precedence over the shorthand.
    let nested_auth_set = NESTED_AUTH_VARS
        .iter()
        .any(|name| env::var_os(name).is_some());
    if !nested_auth_set && let Ok(auth) = env::var("SCOPEGATE_AUTH") {
        builder = builder
            .set_override("auth.auth", auth)
            .map_err(|e| ConfigError::Load(e.to_string()))?;
    }

    // Comma-separated allow-list, nested form first
    let addr = env::var("SCOPEGATE__AUTH__ADDR").or_else(|_| env::var("SCOPEGATE_AUTH_ADDR"));
    if let Ok(addr) = addr {
        builder = builder
            .set_override("auth.addr", split_list(&addr))
            .map_err(|e| ConfigError::Load(e.to_string()))?;
    }

    let config = builder
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let settings: Settings = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_settings(&settings)?;

    Ok(settings)
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Validate settings values
pub fn validate_settings(settings: &Settings) -> Result<(), ConfigError> {
    // Every allow-list entry must compile
    NetworkAllowList::new(&settings.auth.addr)?;

    // Master credentials are required
    settings.auth.master_credentials()?;

    if !LOG_LEVELS.contains(&settings.logging.level.to_ascii_lowercase().as_str()) {
        return Err(ConfigError::Invalid {
            message: format!(
                "logging.level must be one of {}, got: {}",
                LOG_LEVELS.join(", "),
                settings.logging.level
            ),
        });
    }

    Ok(())
}
