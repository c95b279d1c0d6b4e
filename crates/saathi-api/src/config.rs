//! # Service Configuration
//!
//! Built once at process start from environment variables (after `.env`
//! is loaded by `dotenvy`) and passed explicitly into the application
//! state. Request handling never reads the environment.
//!
//! | Variable               | Default                                    |
//! |------------------------|--------------------------------------------|
//! | `PORT`                 | `4000`                                     |
//! | `JWT_SECRET`           | `change_this_secret` (development only)    |
//! | `DATABASE_URL`         | `postgres://localhost:5432/flutter_app_db` (development only) |
//! | `SAATHI_STORAGE`       | `postgres` (`memory` for local runs)       |
//! | `DB_MAX_CONNECTIONS`   | `20`                                       |
//! | `REQUEST_TIMEOUT_SECS` | `30`                                       |
//! | `SAATHI_ENV`           | `development`                              |
//! | `LOG_FORMAT`           | `text` (`json` for JSON lines)             |
//!
//! Empty values are treated as unset.

use std::time::Duration;

use saathi_token::{TokenError, TokenSecret};

/// Development fallback for `JWT_SECRET`.
pub const DEFAULT_JWT_SECRET: &str = "change_this_secret";
/// Development fallback for `DATABASE_URL`.
pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost:5432/flutter_app_db";
/// Default listen port.
pub const DEFAULT_PORT: u16 = 4000;

const DEFAULT_MAX_CONNECTIONS: u32 = 20;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where location records are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// PostgreSQL through a `sqlx` pool.
    Postgres,
    /// Process-local store. Records are lost on exit.
    Memory,
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Development defaults are allowed, with a warning.
    Development,
    /// `JWT_SECRET` and `DATABASE_URL` must be set explicitly.
    Production,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    /// Read `LOG_FORMAT`. Tracing starts before [`AppConfig`] is loaded, so
    /// this is not part of it.
    pub fn from_env() -> Self {
        Self::parse(std::env::var("LOG_FORMAT").ok().as_deref())
    }

    /// `json` (any case) selects JSON lines; anything else is text.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Runtime configuration for the API server.
///
/// Custom `Debug` redacts the token secret and any password in the
/// database URL.
#[derive(Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// HMAC secret shared with the token issuer.
    pub jwt_secret: TokenSecret,
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Selected storage backend.
    pub storage: StorageBackend,
    /// Upper bound on pooled database connections.
    pub db_max_connections: u32,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Deployment environment.
    pub environment: Environment,
    /// Variables that fell back to a development default.
    pub defaults_used: Vec<&'static str>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("jwt_secret", &"[REDACTED]")
            .field("database_url", &redact_url(&self.database_url))
            .field("storage", &self.storage)
            .field("db_max_connections", &self.db_max_connections)
            .field("request_timeout", &self.request_timeout)
            .field("environment", &self.environment)
            .field("defaults_used", &self.defaults_used)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let mut defaults_used = Vec::new();

        let environment = match get("SAATHI_ENV") {
            None => Environment::Development,
            Some(v) => match v.to_ascii_lowercase().as_str() {
                "development" | "dev" => Environment::Development,
                "production" | "prod" => Environment::Production,
                _ => return Err(ConfigError::invalid("SAATHI_ENV", v, "expected development or production")),
            },
        };

        let secret = match get("JWT_SECRET") {
            Some(v) => v,
            None => {
                defaults_used.push("JWT_SECRET");
                DEFAULT_JWT_SECRET.to_string()
            }
        };
        let jwt_secret = TokenSecret::new(secret).map_err(ConfigError::Secret)?;

        let database_url = match get("DATABASE_URL") {
            Some(v) => v,
            None => {
                defaults_used.push("DATABASE_URL");
                DEFAULT_DATABASE_URL.to_string()
            }
        };

        let storage = match get("SAATHI_STORAGE") {
            None => StorageBackend::Postgres,
            Some(v) => match v.to_ascii_lowercase().as_str() {
                "postgres" | "postgresql" => StorageBackend::Postgres,
                "memory" => StorageBackend::Memory,
                _ => return Err(ConfigError::invalid("SAATHI_STORAGE", v, "expected postgres or memory")),
            },
        };

        let port = parse_var(&get, "PORT", DEFAULT_PORT)?;
        let db_max_connections = parse_var(&get, "DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;
        if db_max_connections == 0 {
            return Err(ConfigError::invalid("DB_MAX_CONNECTIONS", "0", "must be at least 1"));
        }
        let timeout_secs = parse_var(&get, "REQUEST_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(ConfigError::invalid("REQUEST_TIMEOUT_SECS", "0", "must be at least 1"));
        }

        if environment == Environment::Production {
            for var in ["JWT_SECRET", "DATABASE_URL"] {
                if defaults_used.contains(&var) {
                    return Err(ConfigError::InsecureDefault(var));
                }
            }
        }

        Ok(Self {
            port,
            jwt_secret,
            database_url,
            storage,
            db_max_connections,
            request_timeout: Duration::from_secs(timeout_secs),
            environment,
            defaults_used,
        })
    }

    /// Emit one warning per variable that fell back to a development default.
    pub fn warn_on_defaults(&self) {
        for var in &self.defaults_used {
            tracing::warn!(variable = %var, "using development default; set it explicitly outside development");
        }
    }
}

fn parse_var<G, T>(get: &G, var: &'static str, default: T) -> Result<T, ConfigError>
where
    G: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match get(var) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::invalid(var, raw.clone(), e.to_string())),
    }
}

/// Replace the password component of a connection URL with `[REDACTED]`.
pub fn redact_url(url: &str) -> String {
    let Some(scheme_end) = url.find("://") else {
        return url.to_string();
    };
    let authority_start = scheme_end + 3;
    let rest = &url[authority_start..];
    let authority_end = rest.find('/').unwrap_or(rest.len());
    let authority = &rest[..authority_end];

    let Some(at) = authority.rfind('@') else {
        return url.to_string();
    };
    let userinfo = &authority[..at];
    let Some(colon) = userinfo.find(':') else {
        return url.to_string();
    };

    format!(
        "{}{}:[REDACTED]{}",
        &url[..authority_start],
        &userinfo[..colon],
        &url[authority_start + at..]
    )
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable is set but cannot be used.
    #[error("invalid value {value:?} for {var}: {reason}")]
    Invalid {
        /// Variable name.
        var: &'static str,
        /// Offending value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A credential fell back to its development default in production.
    #[error("{0} must be set explicitly when SAATHI_ENV=production")]
    InsecureDefault(&'static str),

    /// The token secret is unusable.
    #[error("invalid JWT_SECRET: {0}")]
    Secret(TokenError),
}

impl ConfigError {
    fn invalid(var: &'static str, value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            var,
            value: value.into(),
            reason: reason.into(),
        }
    }
}
