//! Artwork generation queue.
//!
//! A run snapshots every card that has an art prompt but no image, then
//! sends them one at a time through an [`ImageGenerator`], writing each
//! result back into the shared deck. Runs can be paused, resumed and
//! stopped from a [`QueueHandle`]; control is cooperative and only takes
//! effect between cards.
//!
//! [`ImageGenerator`]: cardstudio_imagegen::ImageGenerator

pub mod control;
pub mod error;
pub mod queue;
pub mod types;

// Re-export primary types for convenience.
pub use control::QueueHandle;
pub use error::QueueError;
pub use queue::{GenerationQueue, PAUSE_POLL_INTERVAL, build_tasks};
pub use types::{ALL_CARDS_SCOPE, GenerationTask, Progress, QueueEvent, QueueSnapshot, QueueStatus};
