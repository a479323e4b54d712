//! Multimodal prompt building and submission.
//!
//! A [`MultiModal`] collects prompt parts in order, then sends them to a Gemini
//! model in a single request:
//!
//! ```no_run
//! use gemini_multimodal::MultiModal;
//!
//! # async fn run() -> gemini_multimodal::Result<()> {
//! let mut mm = MultiModal::new("gemini-1.0-pro-vision", 0.4);
//! mm.add_image("frog.png")?;
//! mm.add_uri("gs://generativeai-downloads/images/scones.jpg");
//! mm.add_text("Describe what is common for these two images.");
//!
//! let answer = mm.submit("my-project", "us-central1").await?;
//! println!("{}", answer);
//! # Ok(())
//! # }
//! ```

mod part;

use std::any::Any;
use std::fs;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::path::Path;
use std::time::Duration;

use futures::FutureExt;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, error, info, instrument};

pub use part::PromptPart;

use crate::client::{ModelClient, VertexClient};
use crate::error::{MultiModalError, Result};
use crate::models::{ModelParams, Part, Response};

/// How long a submission or token count may take by default.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2 * 60);

/// Multimodal prompt parts plus the configuration used to submit them.
#[derive(Debug, Clone)]
pub struct MultiModal {
    params: ModelParams,
    parts: Vec<PromptPart>,
    trim: bool,
    verbose: bool,
    timeout: Duration,
}

impl MultiModal {
    /// Creates an empty prompt for `model`, sampled at `temperature`.
    ///
    /// Responses are trimmed, verbose logging is off and the timeout is
    /// [`DEFAULT_TIMEOUT`].
    pub fn new(model: impl Into<String>, temperature: f32) -> Self {
        Self {
            params: ModelParams::builder()
                .model(model)
                .temperature(temperature)
                .build(),
            parts: Vec::new(),
            trim: true,
            verbose: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets the timeout for submissions, token counts and URL downloads.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Enables or disables the progress messages logged at `info` level.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Controls whether surrounding whitespace is stripped from responses.
    pub fn set_trim(&mut self, trim: bool) {
        self.trim = trim;
    }

    /// Sets the sampling temperature.
    pub fn set_temperature(&mut self, temperature: f32) {
        self.params.temperature = temperature;
    }

    /// Chaining form of [`set_timeout`](Self::set_timeout).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.set_timeout(timeout);
        self
    }

    /// Chaining form of [`set_verbose`](Self::set_verbose).
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.set_verbose(verbose);
        self
    }

    /// Chaining form of [`set_trim`](Self::set_trim).
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.set_trim(trim);
        self
    }

    /// The model identifier.
    pub fn model(&self) -> &str {
        &self.params.model
    }

    /// The sampling temperature.
    pub fn temperature(&self) -> f32 {
        self.params.temperature
    }

    /// The configured timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether responses are trimmed.
    pub fn trim(&self) -> bool {
        self.trim
    }

    /// Whether verbose logging is enabled.
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// The parts added so far, in order.
    pub fn parts(&self) -> &[PromptPart] {
        &self.parts
    }

    /// Number of parts added so far.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Returns true if no parts have been added.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Reads an image file and adds it as an inline image part.
    ///
    /// The image format is taken from the file extension, with "jpg" sent as "jpeg".
    ///
    /// # Errors
    ///
    /// Returns [`MultiModalError::Io`] if the file cannot be read; no part is added.
    pub fn add_image(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| MultiModalError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if self.verbose {
            info!("Read {} bytes from {}.", bytes.len(), path.display());
        }

        let format = part::image_format(path);
        if self.verbose {
            info!("Using image format: {}", format);
        }

        self.parts.push(PromptPart::ImageBytes { format, bytes });
        Ok(())
    }

    /// Like [`add_image`](Self::add_image), but panics if the file cannot be read.
    ///
    /// # Panics
    ///
    /// Panics with the read error.
    pub fn must_add_image(&mut self, path: impl AsRef<Path>) {
        if let Err(e) = self.add_image(path) {
            error!("{}", e);
            panic!("{}", e);
        }
    }

    /// Adds a reference to content the model service fetches itself.
    ///
    /// The MIME type is guessed from the extension of `uri`, and left out when
    /// the extension is unknown.
    ///
    /// Example URI: "gs://generativeai-downloads/images/scones.jpg"
    pub fn add_uri(&mut self, uri: impl Into<String>) {
        let uri = uri.into();
        let mime_type = part::mime_from_uri(&uri);
        self.push_reference(mime_type, uri);
    }

    /// Adds a reference to remote content with an explicit MIME type.
    pub fn add_uri_with_mime(&mut self, uri: impl Into<String>, mime_type: impl Into<String>) {
        self.push_reference(Some(mime_type.into()), uri.into());
    }

    fn push_reference(&mut self, mime_type: Option<String>, uri: String) {
        if self.verbose {
            info!(
                "Adding {} with MIME type {}.",
                uri,
                mime_type.as_deref().unwrap_or("<none>")
            );
        }
        self.parts
            .push(PromptPart::RemoteReference { mime_type, uri });
    }

    /// Downloads `url` and adds the body as a blob with the served MIME type.
    ///
    /// # Errors
    ///
    /// Returns [`MultiModalError::Network`] if the request fails, the status is
    /// not a success, or the response has no `Content-Type` header. No part is
    /// added on failure.
    #[instrument(skip(self))]
    pub async fn add_url(&mut self, url: &str) -> Result<()> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| MultiModalError::network(url, e.to_string()))?;

        let response = client.get(url).send().await.map_err(|e| {
            MultiModalError::network(url, format!("failed to download the file: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(MultiModalError::network(url, format!("bad status: {}", status)));
        }

        let mime_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(str::to_owned)
            .ok_or_else(|| MultiModalError::network(url, "no Content-Type header in the response"))?;

        let bytes = response.bytes().await.map_err(|e| {
            MultiModalError::network(url, format!("failed to read the response body: {}", e))
        })?;

        if self.verbose {
            info!(
                "Downloaded {} bytes with MIME type {} from {}.",
                bytes.len(),
                mime_type,
                url
            );
        }

        self.parts.push(PromptPart::Blob {
            mime_type,
            bytes: bytes.to_vec(),
        });
        Ok(())
    }

    /// Adds arbitrary bytes with the given MIME type.
    pub fn add_data(&mut self, mime_type: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.parts.push(PromptPart::Blob {
            mime_type: mime_type.into(),
            bytes: data.into(),
        });
    }

    /// Adds a text part.
    pub fn add_text(&mut self, text: impl Into<String>) {
        self.parts.push(PromptPart::Text {
            content: text.into(),
        });
    }

    fn wire_parts(&self) -> Vec<Part> {
        self.parts.iter().map(Part::from).collect()
    }

    /// Counts the tokens of the current prompt with a client created for this call.
    ///
    /// # Errors
    ///
    /// Returns the client creation error, the first failing count, or
    /// [`MultiModalError::Timeout`].
    #[instrument(skip(self))]
    pub async fn count_tokens(&self, project_id: &str, location: &str) -> Result<i32> {
        self.within_timeout(async {
            let client = VertexClient::connect(project_id, location, self.timeout)?;
            let sum = self.sum_token_counts(&client).await?;
            Ok::<_, MultiModalError>(sum)
        })
        .await
    }

    /// Counts the tokens of the current prompt with an existing client.
    ///
    /// Each part is counted on its own and the counts are summed. The first
    /// failing count is returned and the partial sum is discarded.
    pub async fn count_tokens_with_client<C>(&self, client: &C) -> Result<i32>
    where
        C: ModelClient + ?Sized,
    {
        self.within_timeout(self.sum_token_counts(client)).await
    }

    async fn sum_token_counts<C>(&self, client: &C) -> Result<i32>
    where
        C: ModelClient + ?Sized,
    {
        let mut sum: i32 = 0;
        for part in &self.parts {
            let count = client
                .count_tokens(&self.params.model, &[Part::from(part)])
                .await?;
            debug!(kind = part.kind(), count, "counted tokens");
            sum = sum.checked_add(count).ok_or_else(|| {
                MultiModalError::InternalFault(format!("token count overflow after adding {}", count))
            })?;
        }
        Ok(sum)
    }

    /// Counts the tokens of `text` with a client created for this call.
    ///
    /// # Errors
    ///
    /// Returns the client creation error, the count error, or
    /// [`MultiModalError::Timeout`].
    #[instrument(skip(self, text))]
    pub async fn count_text_tokens(
        &self,
        project_id: &str,
        location: &str,
        text: &str,
    ) -> Result<i32> {
        self.within_timeout(async {
            let client = VertexClient::connect(project_id, location, self.timeout)?;
            let count = client
                .count_tokens(&self.params.model, &[Part::text(text)])
                .await?;
            Ok::<_, MultiModalError>(count)
        })
        .await
    }

    /// Counts the tokens of `text` with an existing client.
    pub async fn count_text_tokens_with_client<C>(&self, client: &C, text: &str) -> Result<i32>
    where
        C: ModelClient + ?Sized,
    {
        self.within_timeout(client.count_tokens(&self.params.model, &[Part::text(text)]))
            .await
    }

    /// Sends all parts to the model with a client created for this call, and
    /// returns the text of the first part of the first candidate.
    ///
    /// The client is dropped before this returns, on success, failure and timeout.
    ///
    /// # Errors
    ///
    /// * [`MultiModalError::Connection`] if no client could be created
    /// * [`MultiModalError::Generation`] if the request failed
    /// * [`MultiModalError::EmptyResponse`] if the model returned no content
    /// * [`MultiModalError::InternalFault`] if processing the response panicked
    /// * [`MultiModalError::Timeout`] if the configured timeout elapsed
    #[instrument(skip(self))]
    pub async fn submit(&self, project_id: &str, location: &str) -> Result<String> {
        self.within_timeout(async {
            let client = VertexClient::connect(project_id, location, self.timeout)?;
            let answer = self.generate(&client).await?;
            Ok::<_, MultiModalError>(answer)
        })
        .await
    }

    /// Sends all parts to the model with an existing client.
    ///
    /// See [`submit`](Self::submit) for the returned errors.
    pub async fn submit_to_client<C>(&self, client: &C) -> Result<String>
    where
        C: ModelClient + ?Sized,
    {
        self.within_timeout(self.generate(client)).await
    }

    async fn generate<C>(&self, client: &C) -> Result<String>
    where
        C: ModelClient + ?Sized,
    {
        let parts = self.wire_parts();
        if self.verbose {
            info!(
                "Submitting {} parts to {} at temperature {}.",
                parts.len(),
                self.params.model,
                self.params.temperature
            );
        }

        AssertUnwindSafe(async {
            let response = client.generate_content(&self.params, &parts).await?;
            self.render(&response)
        })
        .catch_unwind()
        .await
        .unwrap_or_else(|payload| Err(MultiModalError::InternalFault(panic_message(payload))))
    }

    fn render(&self, response: &Response) -> Result<String> {
        let part = response.first_part().ok_or(MultiModalError::EmptyResponse)?;
        let result = format!("{}\n", part);
        if self.trim {
            Ok(result.trim().to_string())
        } else {
            Ok(result)
        }
    }

    async fn within_timeout<T>(&self, operation: impl Future<Output = Result<T>>) -> Result<T> {
        tokio::time::timeout(self.timeout, operation)
            .await
            .unwrap_or(Err(MultiModalError::Timeout(self.timeout)))
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
