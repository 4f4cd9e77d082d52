use std::time::Duration;

use terrainsight_assessment::bulk::DEFAULT_MAX_CONCURRENCY;

/// A missing or unparseable configuration value.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be set")]
    Missing { name: &'static str },

    #[error("{name} must be {expected}, got {value:?}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Server configuration loaded from environment variables.
///
/// All fields except `database_url` have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long to wait for background tasks after the listener stops
    /// (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Base URL of the scoring oracle (default: `http://localhost:8000`).
    pub scoring_service_url: String,
    /// Per-call scoring timeout in seconds (default: `10`).
    pub scoring_timeout_secs: u64,
    /// Candidates assessed at once during a bulk run (default: `8`, min 1).
    pub bulk_max_concurrency: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                                       |
    /// |-------------------------|-----------------------------------------------|
    /// | `HOST`                  | `0.0.0.0`                                     |
    /// | `PORT`                  | `3000`                                        |
    /// | `CORS_ORIGINS`          | `http://localhost:3000,http://localhost:5000` |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                                          |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                                          |
    /// | `DATABASE_URL`          | required                                      |
    /// | `SCORING_SERVICE_URL`   | `http://localhost:8000`                       |
    /// | `SCORING_TIMEOUT_SECS`  | `10`                                          |
    /// | `BULK_MAX_CONCURRENCY`  | `8`                                           |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = parse_or(&lookup, "PORT", 3000u16, "a valid port number")?;

        let cors_origins: Vec<String> = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000,http://localhost:5000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs =
            parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30u64, "a whole number of seconds")?;
        let shutdown_timeout_secs =
            parse_or(&lookup, "SHUTDOWN_TIMEOUT_SECS", 30u64, "a whole number of seconds")?;

        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing {
                name: "DATABASE_URL",
            })?;

        let scoring_service_url =
            lookup("SCORING_SERVICE_URL").unwrap_or_else(|| "http://localhost:8000".into());
        let scoring_timeout_secs =
            parse_or(&lookup, "SCORING_TIMEOUT_SECS", 10u64, "a whole number of seconds")?;

        let bulk_max_concurrency = parse_or(
            &lookup,
            "BULK_MAX_CONCURRENCY",
            DEFAULT_MAX_CONCURRENCY,
            "a positive integer",
        )?;
        if bulk_max_concurrency == 0 {
            return Err(ConfigError::Invalid {
                name: "BULK_MAX_CONCURRENCY",
                expected: "a positive integer",
                value: "0".into(),
            });
        }

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            database_url,
            scoring_service_url,
            scoring_timeout_secs,
            bulk_max_concurrency,
        })
    }

    pub fn scoring_timeout(&self) -> Duration {
        Duration::from_secs(self.scoring_timeout_secs)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

fn parse_or<F, T>(
    lookup: &F,
    name: &'static str,
    default: T,
    expected: &'static str,
) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            expected,
            value: raw,
        }),
    }
}
