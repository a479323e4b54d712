#![deny(missing_docs)]

//! A multimodal prompt builder for Gemini models on Google Cloud Vertex AI.
//!
//! Images, remote references, downloaded files, raw bytes and text are collected
//! in order by a [`MultiModal`] and sent to the model as a single request. The
//! first part of the answer comes back as a string.

pub mod client;
pub mod config;
pub mod error;
#[cfg(feature = "logging")]
pub mod logging;
pub mod models;
pub mod prompt;

pub use client::{ModelClient, VertexClient};
pub use config::{Credentials, VertexConfig};
pub use error::{MultiModalError, Result};
pub use prompt::{MultiModal, PromptPart, DEFAULT_TIMEOUT};
