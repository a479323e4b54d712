//! Environment based configuration for reaching Vertex AI.
//!
//! # Environment Variables
//!
//! * `GCP_PROJECT` or `GCLOUD_PROJECT` - The Google Cloud project ID
//! * `GCP_LOCATION` - The region to use, `us-central1` when unset
//! * `GOOGLE_API_KEY` - An API key, sent as the `key` query parameter
//! * `GOOGLE_ACCESS_TOKEN` - An OAuth2 access token, used when no API key is set
//! * `GOOGLE_BASE_URL` - Overrides the service endpoint

use std::fmt;

use typed_builder::TypedBuilder;

use crate::error::{MultiModalError, Result};

/// Region used when `GCP_LOCATION` is not set.
pub const DEFAULT_LOCATION: &str = "us-central1";

/// The project and region a client is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
#[builder(doc)]
pub struct VertexConfig {
    /// Google Cloud project ID
    #[builder(setter(into))]
    pub project_id: String,
    /// Region (e.g. "us-central1") or "global"
    #[builder(setter(into), default = String::from(DEFAULT_LOCATION))]
    pub location: String,
}

impl VertexConfig {
    /// Reads the project and location from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if neither `GCP_PROJECT` nor `GCLOUD_PROJECT` is set.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_var)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let project_id = lookup("GCP_PROJECT")
            .or_else(|| lookup("GCLOUD_PROJECT"))
            .ok_or_else(|| MultiModalError::Env("GCP_PROJECT or GCLOUD_PROJECT".into()))?;
        let location = lookup("GCP_LOCATION").unwrap_or_else(|| DEFAULT_LOCATION.to_string());
        Ok(Self {
            project_id,
            location,
        })
    }
}

/// Credentials attached to every request to the model service.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// An API key, sent as the `key` query parameter
    ApiKey(String),
    /// An OAuth2 access token, sent as a bearer token
    AccessToken(String),
}

impl Credentials {
    /// Reads `GOOGLE_API_KEY`, falling back to `GOOGLE_ACCESS_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns an error if neither variable is set.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_var)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        lookup("GOOGLE_API_KEY")
            .map(Self::ApiKey)
            .or_else(|| lookup("GOOGLE_ACCESS_TOKEN").map(Self::AccessToken))
            .ok_or_else(|| MultiModalError::Env("GOOGLE_API_KEY or GOOGLE_ACCESS_TOKEN".into()))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApiKey(_) => f.write_str("ApiKey(<redacted>)"),
            Self::AccessToken(_) => f.write_str("AccessToken(<redacted>)"),
        }
    }
}

/// The service endpoint for `location`, honoring `GOOGLE_BASE_URL`.
pub fn base_url(location: &str) -> String {
    base_url_from(location, env_var("GOOGLE_BASE_URL"))
}

fn base_url_from(location: &str, base_url: Option<String>) -> String {
    match base_url {
        Some(url) => url.trim_end_matches('/').to_string(),
        None if location == "global" => "https://aiplatform.googleapis.com".to_string(),
        None => format!("https://{}-aiplatform.googleapis.com", location),
    }
}

// Empty values count as unset.
fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}
