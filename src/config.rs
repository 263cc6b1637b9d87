//! Settings come from the environment, with defaults good enough for local development.
use std::{env, fmt, net::SocketAddr};

pub const DEFAULT_BIND: &str = "127.0.0.1:8000";
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api";
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@localhost";
pub const DEFAULT_FROM_EMAIL: &str = "noreply@localhost";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Where the server listens. `CONTACTS_BIND`
    pub bind: SocketAddr,
    /// Base URL of the contacts API, as the client sees it. `CONTACTS_API_URL`
    pub api_url: String,
    /// Who hears about new submissions. `CONTACTS_ADMIN_EMAIL`
    pub admin_email: String,
    /// Who those notices come from. `CONTACTS_FROM_EMAIL`
    pub from_email: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    BadBind(String),
    BadApiUrl(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use ConfigError::*;

        match self {
            BadBind(s) => write!(f, "CONTACTS_BIND {:?} isn't a socket address", s),
            BadApiUrl(s) => write!(f, "CONTACTS_API_URL {:?} isn't an http(s) URL", s),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: ([127, 0, 0, 1], 8000).into(),
            api_url: DEFAULT_API_URL.to_string(),
            admin_email: DEFAULT_ADMIN_EMAIL.to_string(),
            from_email: DEFAULT_FROM_EMAIL.to_string(),
        }
    }
}

impl Config {
    /// Reads the configuration out of the process environment.
    ///
    /// # Errors
    ///
    /// Same as [`Config::from_vars`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds a configuration out of whatever `var` returns for each setting,
    /// falling back to the defaults for anything missing or blank.
    ///
    /// # Errors
    ///
    /// A bind address that isn't a socket address, or an API URL that isn't `http(s)://`.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str, default: &str| {
            var(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let bind = get("CONTACTS_BIND", DEFAULT_BIND);
        let bind = bind.parse().map_err(|_| ConfigError::BadBind(bind))?;

        let api_url = get("CONTACTS_API_URL", DEFAULT_API_URL);
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(ConfigError::BadApiUrl(api_url));
        }

        Ok(Self {
            bind,
            api_url: api_url.trim_end_matches('/').to_string(),
            admin_email: get("CONTACTS_ADMIN_EMAIL", DEFAULT_ADMIN_EMAIL),
            from_email: get("CONTACTS_FROM_EMAIL", DEFAULT_FROM_EMAIL),
        })
    }
}
