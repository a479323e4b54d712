//! Request models for the Vertex AI Gemini API.

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use super::Part;

/// A `generateContent` or `countTokens` request.
#[derive(Debug, Clone, Serialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    /// The contents of the request, including the prompt parts.
    pub contents: Vec<Content>,
    /// Optional generation configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(strip_option))]
    pub generation_config: Option<GenerationConfig>,
}

/// A content object containing parts of the request or response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    /// The producer of the content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// The parts that make up the content.
    #[serde(default, deserialize_with = "super::response::null_as_default")]
    pub parts: Vec<Part>,
}

/// The producer of a content object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Content written by the caller
    User,
    /// Content generated by the model
    Model,
}

/// Sampling parameters sent with a generation request.
#[derive(Debug, Clone, PartialEq, Serialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Controls the randomness of the output
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(strip_option))]
    pub temperature: Option<f32>,
}

impl Request {
    /// Creates a request carrying `parts`, in order, as a single user turn.
    pub fn from_parts(parts: Vec<Part>) -> Self {
        Self::builder()
            .contents(vec![Content {
                role: Some(Role::User),
                parts,
            }])
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn generation_config_is_omitted_when_absent() {
        let request = Request::from_parts(vec![Part::text("hi")]);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "contents": [{ "role": "user", "parts": [{ "text": "hi" }] }] })
        );
    }

    #[test]
    fn temperature_is_serialized_in_generation_config() {
        let mut request = Request::from_parts(vec![Part::text("hi")]);
        request.generation_config = Some(GenerationConfig::builder().temperature(0.7).build());
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["generationConfig"]["temperature"].as_f64().unwrap() as f32, 0.7);
    }
}
