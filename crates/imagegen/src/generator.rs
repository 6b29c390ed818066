//! Generator abstraction.

use std::future::Future;
use std::pin::Pin;

use cardstudio_deck::AiSettings;

use crate::error::GenerationError;
use crate::types::ImageRef;

/// Produces one image per prompt.
///
/// Implemented by [`Client`](crate::Client) for the real API and by test
/// doubles.
pub trait ImageGenerator: Send + Sync {
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
        settings: &'a AiSettings,
    ) -> Pin<Box<dyn Future<Output = Result<ImageRef, GenerationError>> + Send + 'a>>;
}
