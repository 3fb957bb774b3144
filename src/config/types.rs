//! Configuration types for scopegate
//!
//! This module defines the settings structure that can be loaded from
//! TOML files and/or environment variables.

use crate::error::ConfigError;
use crate::util::SecretString;
use serde::Deserialize;

/// Root settings structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Master credentials and admission allow-list
    pub auth: AuthConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Authentication settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Master username
    pub user: Option<String>,

    /// Master password (prefer env var SCOPEGATE__AUTH__PASS)
    pub pass: Option<SecretString>,

    /// Combined master credentials as `user:pass`. Takes precedence over
    /// `user` and `pass` when set.
    pub auth: Option<SecretString>,

    /// Network ranges allowed to authenticate (CIDR or bare addresses).
    /// Empty means every address may attempt authentication.
    pub addr: Vec<String>,
}

impl AuthConfig {
    /// Resolve the master username and password from either the combined
    /// `auth` value or the separate `user`/`pass` fields
    pub fn master_credentials(&self) -> Result<(String, SecretString), ConfigError> {
        if let Some(combined) = &self.auth {
            let (user, pass) = combined.expose_secret().split_once(':').ok_or_else(|| {
                ConfigError::Invalid {
                    message: "auth.auth must be in the form user:pass".to_string(),
                }
            })?;
            if user.is_empty() {
                return Err(ConfigError::Missing {
                    field: "auth.auth (username part)".to_string(),
                });
            }
            if pass.is_empty() {
                return Err(ConfigError::Missing {
                    field: "auth.auth (password part)".to_string(),
                });
            }
            return Ok((user.to_string(), SecretString::new(pass)));
        }

        let user = self
            .user
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| ConfigError::Missing {
                field: "auth.user (set SCOPEGATE__AUTH__USER or SCOPEGATE_AUTH)".to_string(),
            })?;

        let pass = self
            .pass
            .as_ref()
            .filter(|p| !p.expose_secret().is_empty())
            .ok_or_else(|| ConfigError::Missing {
                field: "auth.pass (set SCOPEGATE__AUTH__PASS or SCOPEGATE_AUTH)".to_string(),
            })?;

        Ok((user.to_string(), pass.clone()))
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Output format (pretty, json)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output
    #[default]
    Pretty,
    /// JSON structured output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth(user: Option<&str>, pass: Option<&str>, combined: Option<&str>) -> AuthConfig {
        AuthConfig {
            user: user.map(str::to_string),
            pass: pass.map(SecretString::new),
            auth: combined.map(SecretString::new),
            addr: Vec::new(),
        }
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(settings.auth.addr.is_empty());
        assert!(settings.auth.user.is_none());
        assert_eq!(settings.logging.level, "info");
        assert_eq!(settings.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_separate_credentials() {
        let (user, pass) = auth(Some("root"), Some("secret"), None)
            .master_credentials()
            .unwrap();
        assert_eq!(user, "root");
        assert_eq!(pass.expose_secret(), "secret");
    }

    #[test]
    fn test_combined_credentials_take_precedence() {
        let (user, pass) = auth(Some("root"), Some("secret"), Some("admin:p:w"))
            .master_credentials()
            .unwrap();
        assert_eq!(user, "admin");
        assert_eq!(pass.expose_secret(), "p:w");
    }

    #[test]
    fn test_missing_credentials() {
        let err = auth(None, Some("secret"), None)
            .master_credentials()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Missing { .. }));

        let err = auth(Some("root"), Some(""), None)
            .master_credentials()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Missing { .. }));
    }

    #[test]
    fn test_malformed_combined_credentials() {
        let err = auth(None, None, Some("no-separator"))
            .master_credentials()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));

        let err = auth(None, None, Some(":pass")).master_credentials().unwrap_err();
        assert!(matches!(err, ConfigError::Missing { .. }));
    }

    #[test]
    fn test_deserialize_log_format() {
        let format: LogFormat = serde_json::from_str(r#""json""#).unwrap();
        assert_eq!(format, LogFormat::Json);
    }
}
