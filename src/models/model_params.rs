use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use super::GenerationConfig;

/// Sampling temperature used when none is given.
pub const DEFAULT_TEMPERATURE: f32 = 0.4;

/// Configuration parameters for the generative model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(doc)]
pub struct ModelParams {
    /// Model identifier (e.g., "gemini-1.0-pro-vision")
    #[builder(setter(into), default = String::from("gemini-1.0-pro-vision"))]
    pub model: String,
    /// Sampling temperature
    #[builder(default = DEFAULT_TEMPERATURE)]
    pub temperature: f32,
}

impl ModelParams {
    /// The generation config sent along with a `generateContent` request.
    pub fn generation_config(&self) -> GenerationConfig {
        GenerationConfig::builder()
            .temperature(self.temperature)
            .build()
    }
}

impl Default for ModelParams {
    fn default() -> Self {
        Self::builder().build()
    }
}
