//! Image generation error types.
//!
//! `Display` strings are the messages shown to the user.

/// Errors from an image generation request.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Add a Gemini API key to generate images.")]
    MissingApiKey,

    #[error("image prompt is empty")]
    EmptyPrompt,

    #[error("Image generation failed. Check your API key.")]
    InvalidApiKey,

    /// Non-success response; `message` comes from the response body when
    /// it carries one.
    #[error("{message}")]
    Upstream { status: u16, message: String },

    #[error("No image returned. Try adjusting the prompt.")]
    EmptyResult,

    #[error("Image generation failed. Please try again.")]
    Http(#[from] reqwest::Error),

    #[error("Image generation failed. Please try again.")]
    Decode(#[from] serde_json::Error),
}

impl GenerationError {
    /// Whether the failure should be surfaced to the user.
    ///
    /// An empty prompt is a silent no-op.
    pub fn is_reportable(&self) -> bool {
        !matches!(self, GenerationError::EmptyPrompt)
    }
}
