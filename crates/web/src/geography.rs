//! IBGE localidades client.
//!
//! Read-only lookups of Brazilian states (UF codes) and the municipalities
//! of a state, consumed directly by the form; the Ecoleta API never proxies
//! these calls.

use serde::Deserialize;
use url::Url;

use crate::api::{endpoint, error_for_status};
use crate::error::ClientError;

#[derive(Debug, Deserialize)]
struct StateResponse {
    sigla: String,
}

#[derive(Debug, Deserialize)]
struct CityResponse {
    nome: String,
}

/// Client for the IBGE geography service.
#[derive(Clone)]
pub struct GeographyClient {
    client: reqwest::Client,
    base_url: Url,
}

impl GeographyClient {
    /// Create a client for the service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(base_url: Url) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("ecoleta-web/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, base_url })
    }

    /// UF codes of every state, in the order the service returns them.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the service answers non-2xx.
    pub async fn states(&self) -> Result<Vec<String>, ClientError> {
        let url = endpoint(&self.base_url, &["api", "v1", "localidades", "estados"])?;
        let response = self.client.get(url).send().await?;
        let states: Vec<StateResponse> = error_for_status(response).await?.json().await?;

        tracing::debug!(count = states.len(), "Loaded states");
        Ok(states.into_iter().map(|s| s.sigla).collect())
    }

    /// Names of the municipalities of one state.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the service answers non-2xx.
    pub async fn cities(&self, uf: &str) -> Result<Vec<String>, ClientError> {
        let url = endpoint(
            &self.base_url,
            &["api", "v1", "localidades", "estados", uf, "municipios"],
        )?;
        let response = self.client.get(url).send().await?;
        let cities: Vec<CityResponse> = error_for_status(response).await?.json().await?;

        tracing::debug!(uf, count = cities.len(), "Loaded cities");
        Ok(cities.into_iter().map(|c| c.nome).collect())
    }
}
