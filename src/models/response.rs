//! Response models for the Vertex AI Gemini API.
//!
//! Every field is optional or defaulted: the service omits empty fields, and a
//! blocked prompt can come back without any candidates at all. Lists sent as
//! `null` decode as empty.

use serde::{Deserialize, Deserializer};

use super::{Content, Part};

/// Decodes a missing or `null` value as `T::default()`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A response from the `generateContent` method.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// The generated candidates from the model. A `null` entry stays in place.
    #[serde(default, deserialize_with = "null_as_default")]
    pub candidates: Vec<Option<Candidate>>,
    /// Metadata about token usage.
    #[serde(default)]
    pub usage_metadata: Option<UsageMetadata>,
    /// The version of the model used.
    #[serde(default)]
    pub model_version: Option<String>,
}

impl Response {
    /// Returns the first part of the first candidate, if there is one.
    pub fn first_part(&self) -> Option<&Part> {
        self.candidates
            .first()?
            .as_ref()?
            .content
            .as_ref()?
            .parts
            .first()
    }
}

/// A candidate response from the model.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// The content of the candidate response.
    #[serde(default)]
    pub content: Option<Content>,
    /// The reason why the generation finished.
    #[serde(default)]
    pub finish_reason: Option<FinishReason>,
    /// Average log probabilities for the generation.
    #[serde(default)]
    pub avg_logprobs: Option<f64>,
}

/// Reason why the generation finished.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinishReason {
    #[serde(rename = "FINISH_REASON_UNSPECIFIED")]
    /// Default value. This value is unused.
    Unspecified,
    /// Natural stop point of the model or provided stop sequence.
    Stop,
    /// The maximum number of tokens as specified in the request was reached.
    MaxTokens,
    /// The response candidate content was flagged for safety reasons.
    Safety,
    /// The response candidate content was flagged for recitation reasons.
    Recitation,
    /// Token generation stopped because the content contains forbidden terms.
    Blocklist,
    /// Token generation stopped for potentially containing prohibited content.
    ProhibitedContent,
    /// Token generation stopped because the content potentially contains Sensitive Personally Identifiable Information (SPII).
    Spii,
    /// The function call generated by the model is invalid.
    MalformedFunctionCall,
    /// Any other reason.
    #[serde(other)]
    Other,
}

/// Metadata about token usage in the request and response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    /// Number of tokens in the prompt.
    #[serde(default)]
    pub prompt_token_count: Option<i32>,
    /// Number of tokens in the generated candidates.
    #[serde(default)]
    pub candidates_token_count: Option<i32>,
    /// Total number of tokens used.
    #[serde(default)]
    pub total_token_count: Option<i32>,
}

/// Response from token counting.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenCountResponse {
    /// Total number of tokens in the request.
    #[serde(default)]
    pub total_tokens: i32,
    /// Total number of billable characters in the request.
    #[serde(default)]
    pub total_billable_characters: Option<i64>,
}
