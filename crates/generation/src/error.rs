//! Generation queue error types.

use cardstudio_imagegen::GenerationError;

/// Errors that keep a run or a single-card generation from starting.
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("Add a Gemini API key to generate images.")]
    MissingApiKey,

    #[error("a generation run is already in progress")]
    AlreadyRunning,

    #[error("section not found: {0}")]
    SectionNotFound(String),

    #[error("card not found: {section_id}/{card_id}")]
    CardNotFound { section_id: String, card_id: String },

    #[error(transparent)]
    Generation(#[from] GenerationError),
}
