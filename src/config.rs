//! Process configuration from the environment.
//!
//! Credentials for the Firebase project are required at startup; the
//! process refuses to serve anything without them. Everything else has
//! a sensible default.

use std::net::SocketAddr;

pub const APP_NAME: &str = "ShambaEye Admin";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Password applied when a create-user request carries none.
pub const DEFAULT_USER_PASSWORD: &str = "tempPassword123";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Default log filter when RUST_LOG is unset.
pub fn default_log_filter() -> &'static str {
    "shambaeye_admin=info,tower_http=info"
}

/// Errors raised while reading configuration. All of them are fatal:
/// `main` logs and exits before binding a socket.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}; check your .env file")]
    MissingVar(&'static str),
    #[error("invalid bind address {0:?}")]
    InvalidBindAddr(String),
}

/// Everything the server needs, resolved once at process start and
/// threaded through explicitly from there.
#[derive(Debug, Clone)]
pub struct Config {
    /// Firebase project id — names the Firestore database to talk to.
    pub project_id: String,
    /// Web API key, accepted by both Firestore REST and Identity Toolkit.
    pub api_key: String,
    pub bind_addr: SocketAddr,
    pub default_user_password: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Seam for tests: resolve variables through a closure instead of
    /// the process environment.
    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let project_id = required(&get, "FIREBASE_PROJECT_ID")?;
        let api_key = required(&get, "FIREBASE_API_KEY")?;

        let raw_addr = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddr(raw_addr))?;

        let default_user_password =
            get("DEFAULT_USER_PASSWORD").unwrap_or_else(|| DEFAULT_USER_PASSWORD.to_string());

        Ok(Self {
            project_id,
            api_key,
            bind_addr,
            default_user_password,
        })
    }
}

fn required(
    get: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<String, ConfigError> {
    match get(name) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            pairs
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn minimal_config_resolves() {
        let cfg = Config::from_lookup(vars(&[
            ("FIREBASE_PROJECT_ID", "shambaeye-test"),
            ("FIREBASE_API_KEY", "AIzaFake"),
        ]))
        .unwrap();

        assert_eq!(cfg.project_id, "shambaeye-test");
        assert_eq!(cfg.api_key, "AIzaFake");
        assert_eq!(cfg.bind_addr.port(), 3000);
        assert_eq!(cfg.default_user_password, DEFAULT_USER_PASSWORD);
    }

    #[test]
    fn missing_project_id_is_fatal() {
        let err = Config::from_lookup(vars(&[("FIREBASE_API_KEY", "AIzaFake")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("FIREBASE_PROJECT_ID")));
    }

    #[test]
    fn missing_api_key_is_fatal() {
        let err =
            Config::from_lookup(vars(&[("FIREBASE_PROJECT_ID", "shambaeye-test")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("FIREBASE_API_KEY")));
    }

    #[test]
    fn blank_credential_counts_as_missing() {
        let err = Config::from_lookup(vars(&[
            ("FIREBASE_PROJECT_ID", "  "),
            ("FIREBASE_API_KEY", "AIzaFake"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("FIREBASE_PROJECT_ID")));
    }

    #[test]
    fn bind_addr_override() {
        let cfg = Config::from_lookup(vars(&[
            ("FIREBASE_PROJECT_ID", "shambaeye-test"),
            ("FIREBASE_API_KEY", "AIzaFake"),
            ("BIND_ADDR", "127.0.0.1:8088"),
        ]))
        .unwrap();
        assert_eq!(cfg.bind_addr.to_string(), "127.0.0.1:8088");
    }

    #[test]
    fn garbage_bind_addr_rejected() {
        let err = Config::from_lookup(vars(&[
            ("FIREBASE_PROJECT_ID", "shambaeye-test"),
            ("FIREBASE_API_KEY", "AIzaFake"),
            ("BIND_ADDR", "not-an-address"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBindAddr(_)));
    }
}
