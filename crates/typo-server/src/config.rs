//! Runtime configuration read from environment variables.
//!
//! | Variable              | Default                |
//! |-----------------------|------------------------|
//! | `TYPO_HOST`           | `0.0.0.0`              |
//! | `TYPO_PORT`           | `5000`                 |
//! | `TYPO_DB_PATH`        | `typo_payments.db`     |
//! | `TYPO_DB_POOL_SIZE`   | `8`                    |
//! | `TYPO_SESSION_SECRET` | `dev-secret-change-me` |
//! | `TYPO_SECURE_COOKIES` | `false`                |

use std::path::PathBuf;

use thiserror::Error;

use typo_api::session::SessionConfig;

/// Placeholder secret used when none is configured.
pub const DEFAULT_SESSION_SECRET: &str = "dev-secret-change-me";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub pool_size: u32,
    pub session_secret: String,
    pub secure_cookies: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got {value:?}")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("TYPO_PORT") {
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid {
                var: "TYPO_PORT",
                expected: "a port number",
                value: v,
            })?,
            None => 5000,
        };

        let pool_size = match lookup("TYPO_DB_POOL_SIZE") {
            Some(v) => match v.parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "TYPO_DB_POOL_SIZE",
                        expected: "a positive integer",
                        value: v,
                    });
                }
            },
            None => 8,
        };

        let secure_cookies = match lookup("TYPO_SECURE_COOKIES").as_deref() {
            None | Some("") | Some("0") | Some("false") => false,
            Some("1") | Some("true") => true,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "TYPO_SECURE_COOKIES",
                    expected: "true or false",
                    value: other.to_string(),
                });
            }
        };

        Ok(Self {
            host: lookup("TYPO_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            db_path: lookup("TYPO_DB_PATH")
                .unwrap_or_else(|| "typo_payments.db".into())
                .into(),
            pool_size,
            session_secret: lookup("TYPO_SESSION_SECRET")
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_SESSION_SECRET.into()),
            secure_cookies,
        })
    }

    pub fn uses_default_secret(&self) -> bool {
        self.session_secret == DEFAULT_SESSION_SECRET
    }

    pub fn session(&self) -> SessionConfig {
        SessionConfig {
            secret: self.session_secret.clone(),
            secure_cookies: self.secure_cookies,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = load(&[]).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert_eq!(config.db_path, PathBuf::from("typo_payments.db"));
        assert_eq!(config.pool_size, 8);
        assert!(config.uses_default_secret());
        assert!(!config.secure_cookies);
    }

    #[test]
    fn overrides_are_read() {
        let config = load(&[
            ("TYPO_PORT", "8080"),
            ("TYPO_DB_PATH", "/tmp/demo.db"),
            ("TYPO_SESSION_SECRET", "s3cret"),
            ("TYPO_SECURE_COOKIES", "true"),
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.db_path, PathBuf::from("/tmp/demo.db"));
        assert!(!config.uses_default_secret());
        assert!(config.session().secure_cookies);
    }

    #[test]
    fn bad_numbers_are_rejected() {
        assert!(matches!(
            load(&[("TYPO_PORT", "http")]),
            Err(ConfigError::Invalid { var: "TYPO_PORT", .. })
        ));
        assert!(load(&[("TYPO_DB_POOL_SIZE", "0")]).is_err());
        assert!(load(&[("TYPO_SECURE_COOKIES", "maybe")]).is_err());
    }
}
