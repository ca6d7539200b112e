//! HTTP client for the `generateContent` endpoint.
//!
//! Wraps the REST API using [`reqwest`]. The API key is checked on every
//! call, before anything touches the network.

use cameo_core::image::ImageArtifact;

use crate::config::GenAiConfig;
use crate::error::GenerationError;
use crate::wire::{GenerateContentRequest, GenerateContentResponse};

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// HTTP client for a single model on the generation service.
pub struct GenAiClient {
    client: reqwest::Client,
    config: GenAiConfig,
}

impl GenAiClient {
    /// Create a client whose transport enforces `config.timeout`.
    pub fn new(config: GenAiConfig) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &GenAiConfig {
        &self.config
    }

    /// Submit a request and decode the response body.
    ///
    /// Fails with [`GenerationError::MissingCredential`] before sending
    /// anything when no key is configured.
    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GenerationError> {
        let api_key = self.api_key()?;

        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, api_key)
            .json(request)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Submit a request and extract the first inline image of the response.
    pub(crate) async fn generate_image(
        &self,
        operation: &'static str,
        request: &GenerateContentRequest,
    ) -> Result<ImageArtifact, GenerationError> {
        tracing::debug!(
            operation,
            model = %self.config.model,
            parts = request.parts().len(),
            "Submitting generation request",
        );

        let response = self.generate_content(request).await?;
        let image = response.first_inline_image();

        match &image {
            Ok(img) => tracing::info!(
                operation,
                mime_type = img.mime_type(),
                payload_len = img.payload().len(),
                "Generation returned an image",
            ),
            Err(_) => tracing::warn!(
                operation,
                parts = response.parts().len(),
                finish_reason = ?response.candidates.first().and_then(|c| c.finish_reason.as_deref()),
                "Generation response contained no image",
            ),
        }

        image
    }

    // ---- private helpers ----

    fn api_key(&self) -> Result<&str, GenerationError> {
        self.config
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingCredential)
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.api_url, self.config.model
        )
    }

    /// Ensure the response has a success status code, or turn it into an
    /// [`GenerationError::Upstream`] carrying the status and body text.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, GenerationError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(GenerationError::Upstream {
                status: Some(status.as_u16()),
                message: format!("service returned {status}: {body}"),
            });
        }
        Ok(response)
    }

    async fn parse_response(
        response: reqwest::Response,
    ) -> Result<GenerateContentResponse, GenerationError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<GenerateContentResponse>().await?)
    }
}
