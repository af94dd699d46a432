//! Remote gallery access
//!
//! [`RemoteGallery`] is the seam between the image service and the network.
//! [`HttpGallery`] talks to the real search endpoint and image backend.

use crate::GalleryConfig;
use crate::error::{NetworkError, Result, ValidationError};
use crate::image::PageQuery;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Response, Url};
use std::time::Duration;

/// Source of truth for image metadata and image blobs
#[async_trait]
pub trait RemoteGallery: Send + Sync {
    /// Run a paged search and return the raw response body
    async fn search(&self, query: &PageQuery) -> Result<Bytes>;

    /// Fetch the binary body of one rendition of an image
    async fn fetch_image(&self, name: &str, rendition: &str) -> Result<Bytes>;
}

/// Remote gallery over HTTP
pub struct HttpGallery {
    client: Client,
    endpoint: Url,
    base_url: Url,
    bearer_token: Option<String>,
}

impl HttpGallery {
    /// Build a gallery client from configuration
    pub fn new(config: &GalleryConfig) -> Result<Self> {
        config.validate()?;

        let endpoint = parse_url("endpoint", &config.endpoint)?;
        let base_url = parse_base_url(&config.base_url)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| NetworkError::request(config.endpoint.as_str(), e.to_string()))?;

        log::debug!("Creating gallery client for endpoint {endpoint}");

        Ok(Self {
            client,
            endpoint,
            base_url,
            bearer_token: None,
        })
    }

    /// Send `Authorization: Bearer <token>` with every request
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// URL an image rendition is fetched from
    pub fn image_url(&self, name: &str, rendition: &str) -> Result<Url> {
        let mut url = self
            .base_url
            .join(&format!("image/{rendition}"))
            .map_err(|e| ValidationError::invalid_url("base_url", self.base_url.as_str(), e))?;
        url.query_pairs_mut().append_pair("name", name);
        Ok(url)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.bearer_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn read_body(response: Response) -> Result<Bytes> {
        let response = response.error_for_status()?;
        Ok(response.bytes().await?)
    }
}

#[async_trait]
impl RemoteGallery for HttpGallery {
    async fn search(&self, query: &PageQuery) -> Result<Bytes> {
        log::debug!(
            "Querying {} from={} size={}",
            self.endpoint,
            query.from,
            query.size
        );

        let response = self
            .authorize(self.client.post(self.endpoint.clone()).json(query))
            .send()
            .await?;

        Self::read_body(response).await
    }

    async fn fetch_image(&self, name: &str, rendition: &str) -> Result<Bytes> {
        let url = self.image_url(name, rendition)?;
        log::debug!("Fetching {url}");

        let response = self.authorize(self.client.get(url)).send().await?;

        Self::read_body(response).await
    }
}

fn parse_url(field: &str, value: &str) -> Result<Url> {
    Url::parse(value).map_err(|e| ValidationError::invalid_url(field, value, e).into())
}

/// Image paths are resolved relative to the base URL, so it has to end in `/`
fn parse_base_url(value: &str) -> Result<Url> {
    let mut url = parse_url("base_url", value)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
