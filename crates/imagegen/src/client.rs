//! Gemini `generateContent` client.
//!
//! Async HTTP client using `reqwest`; the API key travels in the
//! `x-goog-api-key` header.

use std::future::Future;
use std::pin::Pin;

use cardstudio_deck::AiSettings;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use tracing::{debug, warn};

use crate::error::GenerationError;
use crate::generator::ImageGenerator;
use crate::types::{GenerateRequest, GenerateResponse, ImageRef};

/// Base URL of the model endpoints.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Fallback message for a non-success response without an error body.
const CHECK_API_KEY_MESSAGE: &str = "Image generation failed. Check your API key.";

/// Image generation API client.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    endpoint: String,
}

impl Client {
    /// Creates a client for the public endpoint.
    pub fn new() -> Result<Self, GenerationError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            endpoint: DEFAULT_ENDPOINT.to_string(),
        })
    }

    /// Points the client at another models endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Models endpoint in use.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Generates one image for `prompt`.
    pub async fn generate_image(
        &self,
        prompt: &str,
        settings: &AiSettings,
    ) -> Result<ImageRef, GenerationError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(GenerationError::EmptyPrompt);
        }
        let api_key = settings.api_key.trim();
        if api_key.is_empty() {
            return Err(GenerationError::MissingApiKey);
        }
        let key_header =
            HeaderValue::from_str(api_key).map_err(|_| GenerationError::InvalidApiKey)?;

        let url = format!("{}/{}:generateContent", self.endpoint, settings.model);
        debug!(model = %settings.model, aspect_ratio = %settings.aspect_ratio, "requesting image");

        let resp = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .header(API_KEY_HEADER, key_header)
            .json(&GenerateRequest::new(prompt, settings))
            .send()
            .await?;
        let status = resp.status();
        let body = resp.bytes().await?;
        let value: serde_json::Value = serde_json::from_slice(&body)?;

        if !status.is_success() {
            let message = error_message(&value).unwrap_or(CHECK_API_KEY_MESSAGE).to_string();
            warn!(status = status.as_u16(), %message, "image request rejected");
            return Err(GenerationError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let response: GenerateResponse = serde_json::from_value(value)?;
        let image = response.into_image().ok_or(GenerationError::EmptyResult)?;
        debug!(mime_type = %image.mime_type, bytes = image.data.len(), "image received");
        Ok(image)
    }
}

impl ImageGenerator for Client {
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
        settings: &'a AiSettings,
    ) -> Pin<Box<dyn Future<Output = Result<ImageRef, GenerationError>> + Send + 'a>> {
        Box::pin(self.generate_image(prompt, settings))
    }
}

/// Non-empty `error.message` of an error body.
fn error_message(body: &serde_json::Value) -> Option<&str> {
    body.get("error")?
        .get("message")?
        .as_str()
        .filter(|m| !m.is_empty())
}
