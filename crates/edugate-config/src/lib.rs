//! Configuration management for edugate
//!
//! Provides hierarchical configuration loading from multiple sources:
//! 1. Environment variables (EDUGATE_* prefix, `__` between nested keys)
//! 2. edugate.local.toml (gitignored, local overrides)
//! 3. edugate.toml (git-tracked, project config)
//! 4. ~/.config/edugate/config.toml (user defaults)
//! 5. Built-in defaults (lowest precedence)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

mod error;
mod loader;
mod paths;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use paths::Paths;

/// Placeholder shown instead of secrets.
pub const REDACTED: &str = "<redacted>";

/// Main edugate configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdugateConfig {
    pub gate: GateConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
}

/// Route gate settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Path prefixes the gate guards. Everything else passes untouched.
    pub protected_prefixes: Vec<String>,
    pub login_path: String,
    /// Landing page for authenticated callers refused by the route table.
    pub unauthorized_path: String,
    pub session_cookie: String,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            protected_prefixes: vec!["/dashboard".to_string()],
            login_path: "/login".to_string(),
            unauthorized_path: "/dashboard".to_string(),
            session_cookie: "session".to_string(),
        }
    }
}

/// Session verification settings.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 secret shared with the session issuer.
    pub jwt_secret: String,
    /// Clock skew tolerated when classifying expiry.
    pub leeway_secs: u64,
}

impl AuthConfig {
    /// Returns the configured secret, or `None` if it is unset.
    pub fn secret(&self) -> Option<&str> {
        (!self.jwt_secret.is_empty()).then_some(self.jwt_secret.as_str())
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secret = if self.jwt_secret.is_empty() { "" } else { REDACTED };
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &secret)
            .field("leeway_secs", &self.leeway_secs)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl EdugateConfig {
    /// Reads a single TOML file, without layering.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Checks invariants the gate relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gate.protected_prefixes.is_empty() {
            return Err(ConfigError::ValidationError(
                "gate.protected_prefixes must not be empty".to_string(),
            ));
        }
        for prefix in &self.gate.protected_prefixes {
            require_absolute("gate.protected_prefixes", prefix)?;
        }
        require_absolute("gate.login_path", &self.gate.login_path)?;
        require_absolute("gate.unauthorized_path", &self.gate.unauthorized_path)?;

        // A login page behind the gate would redirect to itself forever.
        if self
            .gate
            .protected_prefixes
            .iter()
            .any(|prefix| self.gate.login_path.starts_with(prefix.as_str()))
        {
            return Err(ConfigError::ValidationError(format!(
                "gate.login_path '{}' is itself protected",
                self.gate.login_path
            )));
        }

        let cookie = &self.gate.session_cookie;
        if cookie.is_empty()
            || cookie
                .chars()
                .any(|c| c.is_whitespace() || matches!(c, ';' | '=' | ','))
        {
            return Err(ConfigError::ValidationError(format!(
                "gate.session_cookie '{cookie}' is not a valid cookie name"
            )));
        }

        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "logging.level must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Returns a copy safe to print.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if !config.auth.jwt_secret.is_empty() {
            config.auth.jwt_secret = REDACTED.to_string();
        }
        config
    }

    /// Renders the configuration as TOML, with secrets redacted.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(&self.redacted()).context("Failed to serialize configuration")
    }
}

fn require_absolute(key: &str, path: &str) -> Result<(), ConfigError> {
    if path.starts_with('/') {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(format!(
            "{key} '{path}' must start with '/'"
        )))
    }
}
