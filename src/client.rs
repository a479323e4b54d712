//! Client implementation for the Vertex AI Gemini API.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::config::{self, Credentials};
use crate::error::{MultiModalError, Result};
use crate::models::{ModelParams, Part, Request, RequestType, Response, TokenCountResponse};

/// API version of the Vertex AI REST surface
const API_VERSION: &str = "v1";

/// The operations the prompt builder needs from a model service.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Sends `parts`, in order, as one generation request configured by `params`.
    async fn generate_content(&self, params: &ModelParams, parts: &[Part]) -> Result<Response>;

    /// Counts the tokens `parts` would take up for `model`.
    async fn count_tokens(&self, model: &str, parts: &[Part]) -> Result<i32>;
}

/// A client for Gemini models served by Vertex AI, scoped to one project and location.
///
/// The underlying connection pool lives as long as the client and is released
/// when it is dropped.
#[derive(Debug)]
pub struct VertexClient {
    client: reqwest::Client,
    credentials: Credentials,
    base_url: String,
    project_id: String,
    location: String,
    timeout: Duration,
}

impl VertexClient {
    /// Creates a client using credentials from the environment.
    ///
    /// # Arguments
    ///
    /// * `project_id` - The Google Cloud project ID
    /// * `location` - The region, e.g. "us-central1"
    /// * `timeout` - Upper bound for each request made by this client
    ///
    /// # Errors
    ///
    /// Returns [`MultiModalError::Connection`] if no credentials are configured
    /// or the HTTP client cannot be built.
    pub fn connect(
        project_id: impl Into<String>,
        location: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let credentials =
            Credentials::from_env().map_err(|e| MultiModalError::Connection(e.to_string()))?;
        Self::with_credentials(project_id, location, credentials, timeout)
    }

    /// Creates a client with explicit credentials.
    ///
    /// # Errors
    ///
    /// Returns [`MultiModalError::Connection`] if the HTTP client cannot be built.
    pub fn with_credentials(
        project_id: impl Into<String>,
        location: impl Into<String>,
        credentials: Credentials,
        timeout: Duration,
    ) -> Result<Self> {
        let location = location.into();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MultiModalError::Connection(e.to_string()))?;
        let base_url = config::base_url(&location);
        debug!(%base_url, "created model service client");

        Ok(Self {
            client,
            credentials,
            base_url,
            project_id: project_id.into(),
            location,
            timeout,
        })
    }

    /// Sends requests to `base_url` instead of the regional endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn build_url(&self, model: &str, request_type: RequestType) -> String {
        format!(
            "{}/{}/projects/{}/locations/{}/publishers/google/models/{}:{}",
            self.base_url, API_VERSION, self.project_id, self.location, model, request_type
        )
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.credentials {
            Credentials::ApiKey(key) => builder.query(&[("key", key)]),
            Credentials::AccessToken(token) => builder.bearer_auth(token),
        }
    }

    fn transport_error(&self, error: reqwest::Error) -> MultiModalError {
        if error.is_timeout() {
            MultiModalError::Timeout(self.timeout)
        } else {
            MultiModalError::Generation(error.to_string())
        }
    }

    /// Posts `request` to `url` and decodes the JSON answer.
    async fn send_request<T: DeserializeOwned>(&self, url: &str, request: &Request) -> Result<T> {
        let response = self
            .authorize(self.client.post(url))
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(MultiModalError::Generation(format!(
                "Request failed with status {}: {}",
                status, error_body
            )));
        }

        response.json::<T>().await.map_err(|e| self.transport_error(e))
    }
}

#[async_trait]
impl ModelClient for VertexClient {
    #[instrument(skip_all, fields(model = %params.model, parts = parts.len()))]
    async fn generate_content(&self, params: &ModelParams, parts: &[Part]) -> Result<Response> {
        let mut request = Request::from_parts(parts.to_vec());
        request.generation_config = Some(params.generation_config());
        let url = self.build_url(&params.model, RequestType::GenerateContent);
        self.send_request(&url, &request).await
    }

    #[instrument(skip(self, parts), fields(parts = parts.len()))]
    async fn count_tokens(&self, model: &str, parts: &[Part]) -> Result<i32> {
        let request = Request::from_parts(parts.to_vec());
        let url = self.build_url(model, RequestType::CountTokens);
        let response: TokenCountResponse = self.send_request(&url, &request).await?;
        Ok(response.total_tokens)
    }
}

impl Drop for VertexClient {
    fn drop(&mut self) {
        debug!(project_id = %self.project_id, location = %self.location, "closing model service client");
    }
}
