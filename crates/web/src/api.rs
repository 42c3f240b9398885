//! Ecoleta REST API client.

use reqwest::{Response, StatusCode};
use serde::Deserialize;
use url::Url;

use ecoleta_core::{Item, NewPoint, Point, PointDetail, PointId, PointSearch};

use crate::error::ClientError;

/// Error body returned by the API.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Client for the Ecoleta API.
#[derive(Clone)]
pub struct EcoletaClient {
    client: reqwest::Client,
    base_url: Url,
}

impl EcoletaClient {
    /// Create a client for the API at `base_url`.
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

    /// Fetch the item catalog.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the API answers non-2xx.
    pub async fn list_items(&self) -> Result<Vec<Item>, ClientError> {
        let url = endpoint(&self.base_url, &["items"])?;
        let response = self.client.get(url).send().await?;
        Ok(error_for_status(response).await?.json().await?)
    }

    /// Register a point.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` with the server's message when the payload
    /// is rejected, or a transport error.
    pub async fn create_point(&self, point: &NewPoint) -> Result<Point, ClientError> {
        let url = endpoint(&self.base_url, &["points"])?;
        let response = self.client.post(url).json(point).send().await?;
        Ok(error_for_status(response).await?.json().await?)
    }

    /// Fetch one point with its item titles; `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the API answers with an error
    /// other than 404.
    pub async fn get_point(&self, id: PointId) -> Result<Option<PointDetail>, ClientError> {
        let url = endpoint(&self.base_url, &["points", &id.to_string()])?;
        let response = self.client.get(url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        Ok(Some(error_for_status(response).await?.json().await?))
    }

    /// Search points by city, state and accepted items.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the API answers non-2xx.
    pub async fn search_points(&self, search: &PointSearch) -> Result<Vec<Point>, ClientError> {
        let mut url = endpoint(&self.base_url, &["points"])?;
        url.query_pairs_mut().extend_pairs(search.query_pairs());

        let response = self.client.get(url).send().await?;
        Ok(error_for_status(response).await?.json().await?)
    }
}

/// Append path segments to a base URL, percent-encoding each one.
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, ClientError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| ClientError::InvalidBaseUrl(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Turn a non-2xx response into `ClientError::Api`, keeping the server's
/// `message` when the body carries one.
pub(crate) async fn error_for_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text).map_or(text, |body| body.message);

    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}
