//! Application settings.
//!
//! ```text
//! strata.toml (optional)
//!     → Settings::load        (read + deserialize, every field defaulted)
//!     → with_env_overrides    (STRATA_BIND, STRATA_ADMIN_KEY)
//!     → validate              (semantic checks, all errors reported)
//!     → immutable Settings handed to app construction
//! ```
//!
//! A minimal file:
//!
//! ```toml
//! bind = "0.0.0.0:8081"
//!
//! [auth]
//! admin_key = "change-me"
//!
//! [users]
//! default_limit = 25
//! ```

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use http::HeaderName;
use serde::{Deserialize, Serialize};

pub const ENV_BIND: &str = "STRATA_BIND";
pub const ENV_ADMIN_KEY: &str = "STRATA_ADMIN_KEY";

/// Sort keys the user listing understands.
pub const SORT_KEYS: [&str; 3] = ["id", "name", "email"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Listen address, `host:port`.
    pub bind: String,

    /// Answer every request with 503 while set.
    pub maintenance: bool,

    pub auth: AuthSettings,
    pub users: UserSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8081".to_owned(),
            maintenance: false,
            auth: AuthSettings::default(),
            users: UserSettings::default(),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthSettings {
    /// Header that must be present on every `/api` request.
    pub api_key_header: String,
    /// Header carrying the admin secret on admin-only routes.
    pub admin_key_header: String,
    pub admin_key: String,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            api_key_header: "X-API-Key".to_owned(),
            admin_key_header: "X-Admin-Key".to_owned(),
            admin_key: "supersecret".to_owned(),
        }
    }
}

impl std::fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSettings")
            .field("api_key_header", &self.api_key_header)
            .field("admin_key_header", &self.admin_key_header)
            .field("admin_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct UserSettings {
    /// `limit` used by `GET /api/users` when the query omits it.
    pub default_limit: u32,
    /// `sort` used by `GET /api/users` when the query omits it.
    pub default_sort: String,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self { default_limit: 10, default_sort: "id".to_owned() }
    }
}

impl Settings {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_owned(), source })?;
        Self::from_toml(&content)
    }

    /// Applies `STRATA_BIND` and `STRATA_ADMIN_KEY` from the process
    /// environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(bind) = lookup(ENV_BIND) {
            self.bind = bind;
        }
        if let Some(key) = lookup(ENV_ADMIN_KEY) {
            self.auth.admin_key = key;
        }
        self
    }

    /// Semantic checks serde cannot express. Reports every problem at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.bind.parse::<SocketAddr>().is_err() {
            errors.push(format!("bind `{}` is not a host:port socket address", self.bind));
        }
        for (field, name) in [
            ("auth.api_key_header", &self.auth.api_key_header),
            ("auth.admin_key_header", &self.auth.admin_key_header),
        ] {
            if HeaderName::from_bytes(name.as_bytes()).is_err() {
                errors.push(format!("{field} `{name}` is not a valid header name"));
            }
        }
        if self.auth.admin_key.trim().is_empty() {
            errors.push("auth.admin_key must not be empty".to_owned());
        }
        if self.users.default_limit == 0 {
            errors.push("users.default_limit must be greater than zero".to_owned());
        }
        if !SORT_KEYS.contains(&self.users.default_sort.as_str()) {
            errors.push(format!(
                "users.default_sort `{}` must be one of {}",
                self.users.default_sort,
                SORT_KEYS.join(", ")
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(ConfigError::Invalid(errors)) }
    }
}
