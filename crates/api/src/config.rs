//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ECOLETA_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `ECOLETA_HOST` - Bind address (default: 127.0.0.1)
//! - `ECOLETA_PORT` - Listen port (default: 3333)
//! - `ECOLETA_ASSETS_BASE_URL` - Public URL prefix for item images (default: <http://localhost:3333>)
//! - `ECOLETA_UPLOADS_DIR` - Directory served under `/uploads` (default: crates/api/uploads)
//! - `ECOLETA_DEFAULT_POINT_IMAGE` - Image URL stored on every new point
//! - `ECOLETA_CORS_ORIGINS` - Comma-separated allowed origins (default: any)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_PORT: u16 = 3333;
const DEFAULT_ASSETS_BASE_URL: &str = "http://localhost:3333";
const DEFAULT_UPLOADS_DIR: &str = "crates/api/uploads";

/// Image attached to points when no other policy is configured.
pub const DEFAULT_POINT_IMAGE: &str = "https://images.unsplash.com/photo-1591178579826-e8734a6c5d51?ixlib=rb-1.2.1&auto=format&fit=crop&w=400&q=60";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// API application configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// URL prefix under which `/uploads/<image>` is reachable, without trailing slash
    pub assets_base_url: String,
    /// Directory holding item images
    pub uploads_dir: PathBuf,
    /// Image URL stored on every created point
    pub default_point_image: String,
    /// Allowed CORS origins; empty means any origin
    pub cors_origins: Vec<String>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl ApiConfig {
    /// Configuration with every optional setting at its default.
    #[must_use]
    pub fn with_defaults(database_url: SecretString) -> Self {
        Self {
            database_url,
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            assets_base_url: DEFAULT_ASSETS_BASE_URL.to_owned(),
            uploads_dir: PathBuf::from(DEFAULT_UPLOADS_DIR),
            default_point_image: DEFAULT_POINT_IMAGE.to_owned(),
            cors_origins: Vec::new(),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the database URL is missing or any variable
    /// fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let mut config = Self::with_defaults(get_database_url("ECOLETA_DATABASE_URL")?);

        if let Some(host) = get_optional_env("ECOLETA_HOST") {
            config.host = host.parse::<IpAddr>().map_err(|e| {
                ConfigError::InvalidEnvVar("ECOLETA_HOST".to_string(), e.to_string())
            })?;
        }

        if let Some(port) = get_optional_env("ECOLETA_PORT") {
            config.port = port.parse::<u16>().map_err(|e| {
                ConfigError::InvalidEnvVar("ECOLETA_PORT".to_string(), e.to_string())
            })?;
        }

        if let Some(base) = get_optional_env("ECOLETA_ASSETS_BASE_URL") {
            config.assets_base_url = parse_base_url("ECOLETA_ASSETS_BASE_URL", &base)?;
        }

        if let Some(dir) = get_optional_env("ECOLETA_UPLOADS_DIR") {
            config.uploads_dir = PathBuf::from(dir);
        }

        if let Some(image) = get_optional_env("ECOLETA_DEFAULT_POINT_IMAGE") {
            config.default_point_image =
                parse_base_url("ECOLETA_DEFAULT_POINT_IMAGE", &image)?;
        }

        if let Some(origins) = get_optional_env("ECOLETA_CORS_ORIGINS") {
            config.cors_origins = parse_list(&origins);
        }

        config.sentry_dsn = get_optional_env("SENTRY_DSN");
        config.sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(config)
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Public URL of an item image stored under the uploads directory.
    #[must_use]
    pub fn item_image_url(&self, image: &str) -> String {
        format!("{}/uploads/{image}", self.assets_base_url)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }

    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }

    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional, non-empty environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Validate an absolute URL and strip any trailing slash.
fn parse_base_url(key: &str, value: &str) -> Result<String, ConfigError> {
    let url = Url::parse(value.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    Ok(url.as_str().trim_end_matches('/').to_owned())
}

/// Split a comma-separated list, dropping blanks.
fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}
