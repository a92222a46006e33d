/// Configuration for the API server
///
/// Loaded from environment variables, with a `.env` file picked up in
/// development.
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `CORS_ORIGINS`: Comma-separated allowed origins, `*` for any (default: *)
/// - `PRODUCTION`: Enables HSTS and Secure cookies (default: false)
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `SESSION_SECRET`: Session signing key, at least 32 characters (required)
/// - `SESSION_TTL_HOURS`: Session lifetime (default: 720)
/// - `UPLOAD_MAX_BYTES`: Upload body limit (default: 26214400)
///
/// # Example
///
/// ```no_run
/// use docportal_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use anyhow::Context;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::env;

/// Minimum length of the session signing secret
pub const MIN_SECRET_LEN: usize = 32;

/// Longest accepted session lifetime (ten years)
pub const MAX_SESSION_TTL_HOURS: i64 = 10 * 365 * 24;

/// Default upload limit: 25 MiB
pub const DEFAULT_UPLOAD_MAX_BYTES: usize = 25 * 1024 * 1024;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub session: SessionConfig,
    pub upload: UploadConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,

    /// Allowed CORS origins; empty means any origin
    pub cors_origins: Vec<String>,

    /// Production mode (HSTS, Secure cookie flag)
    pub production: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Session token settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// HS256 signing key
    ///
    /// Generate with: `openssl rand -hex 32`
    #[serde(skip_serializing)]
    pub secret: String,

    /// Session lifetime in hours
    pub ttl_hours: i64,
}

impl SessionConfig {
    pub fn ttl(&self) -> Duration {
        Duration::hours(self.ttl_hours)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Maximum request body size for uploads
    pub max_bytes: usize,
}

impl Config {
    /// Loads configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing, a value doesn't
    /// parse, or the session secret is too short.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let port = get("API_PORT", "8080")
            .parse::<u16>()
            .context("API_PORT must be a port number")?;

        let max_connections = get("DATABASE_MAX_CONNECTIONS", "10")
            .parse::<u32>()
            .context("DATABASE_MAX_CONNECTIONS must be a positive integer")?;

        let ttl_hours = get("SESSION_TTL_HOURS", "720")
            .parse::<i64>()
            .context("SESSION_TTL_HOURS must be an integer")?;
        if !(1..=MAX_SESSION_TTL_HOURS).contains(&ttl_hours) {
            anyhow::bail!(
                "SESSION_TTL_HOURS must be between 1 and {}",
                MAX_SESSION_TTL_HOURS
            );
        }

        let max_bytes = match lookup("UPLOAD_MAX_BYTES") {
            Some(value) => value
                .parse::<usize>()
                .context("UPLOAD_MAX_BYTES must be a byte count")?,
            None => DEFAULT_UPLOAD_MAX_BYTES,
        };

        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let secret = lookup("SESSION_SECRET")
            .ok_or_else(|| anyhow::anyhow!("SESSION_SECRET environment variable is required"))?;
        if secret.len() < MIN_SECRET_LEN {
            anyhow::bail!("SESSION_SECRET must be at least {} characters long", MIN_SECRET_LEN);
        }

        Ok(Self {
            api: ApiConfig {
                host: get("API_HOST", "0.0.0.0"),
                port,
                cors_origins: parse_origins(&get("CORS_ORIGINS", "*")),
                production: parse_bool(&get("PRODUCTION", "false")),
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            session: SessionConfig { secret, ttl_hours },
            upload: UploadConfig { max_bytes },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

fn parse_origins(value: &str) -> Vec<String> {
    let origins: Vec<String> = value
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect();

    if origins.iter().any(|o| o == "*") {
        Vec::new()
    } else {
        origins
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
