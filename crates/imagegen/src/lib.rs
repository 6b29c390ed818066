//! Text-to-image client for card artwork.
//!
//! Wraps a single Gemini `generateContent` call per card and turns the
//! response into an inline `data:` image reference. The [`ImageGenerator`]
//! trait is the seam the generation queue depends on, so tests and other
//! backends can stand in for the HTTP client.

pub mod client;
pub mod error;
pub mod generator;
pub mod types;

pub use client::{Client, DEFAULT_ENDPOINT};
pub use error::GenerationError;
pub use generator::ImageGenerator;
pub use types::ImageRef;
