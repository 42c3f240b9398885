//! Client configuration loaded from environment variables.
//!
//! - `ECOLETA_API_URL` - Ecoleta API base URL (default: <http://localhost:3333>)
//! - `IBGE_API_URL` - IBGE service base URL (default: <https://servicodados.ibge.gov.br>)

use url::Url;

use crate::error::ClientError;

const DEFAULT_API_URL: &str = "http://localhost:3333";
const DEFAULT_IBGE_URL: &str = "https://servicodados.ibge.gov.br";

/// Base URLs of the services the form talks to.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Ecoleta API base URL
    pub api_url: Url,
    /// IBGE localidades service base URL
    pub ibge_url: Url,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidBaseUrl` if either URL fails to parse.
    pub fn from_env() -> Result<Self, ClientError> {
        let _ = dotenvy::dotenv();

        Ok(Self {
            api_url: url_from_env("ECOLETA_API_URL", DEFAULT_API_URL)?,
            ibge_url: url_from_env("IBGE_API_URL", DEFAULT_IBGE_URL)?,
        })
    }
}

fn url_from_env(key: &str, default: &str) -> Result<Url, ClientError> {
    let raw = std::env::var(key).unwrap_or_else(|_| default.to_owned());
    Url::parse(&raw).map_err(|e| ClientError::InvalidBaseUrl(format!("{key}: {e}")))
}
