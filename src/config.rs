use std::{env, fmt};

/// Failure to build a [`Config`] from the environment.
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid { key, value } => {
                write!(f, "{} has invalid value {:?}", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Process-wide settings, read once at startup and injected into the session
/// manager, the CSRF guard and the CORS setup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string. Without it the server runs on the in-memory store.
    pub database_url: Option<String>,
    pub server_port: u16,
    pub server_host: String,
    /// HMAC secret used to sign session tokens.
    pub jwt_secret: String,
    /// Extra origin allowed by CORS next to `http://localhost:3000`.
    pub frontend_url: Option<String>,
    /// `Domain` attribute for the session and CSRF cookies.
    pub cookie_domain: Option<String>,
    pub cookie_secure: bool,
    pub csrf_cookie_http_only: bool,
    pub bcrypt_cost: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Ok(Self {
            database_url: get("DATABASE_URL"),
            server_port: parse_or(get("SERVER_PORT"), "SERVER_PORT", 8080)?,
            server_host: get("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            jwt_secret: get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?,
            frontend_url: get("FE_URL"),
            cookie_domain: get("API_DOMAIN"),
            cookie_secure: parse_or(get("COOKIE_SECURE"), "COOKIE_SECURE", false)?,
            csrf_cookie_http_only: parse_or(
                get("CSRF_COOKIE_HTTP_ONLY"),
                "CSRF_COOKIE_HTTP_ONLY",
                true,
            )?,
            bcrypt_cost: parse_or(get("BCRYPT_COST"), "BCRYPT_COST", 10)?,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn parse_or<T: std::str::FromStr>(
    value: Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}
