//! Data types for the generation queue.

use std::fmt;

/// Scope label of a run over the whole deck.
pub const ALL_CARDS_SCOPE: &str = "All cards";

/// Lifecycle of the queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QueueStatus {
    #[default]
    Idle,
    Running,
    Paused,
    Stopped,
    Completed,
}

impl QueueStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            QueueStatus::Idle => "idle",
            QueueStatus::Running => "running",
            QueueStatus::Paused => "paused",
            QueueStatus::Stopped => "stopped",
            QueueStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tasks handled so far out of the run's fixed total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    pub done: usize,
    pub total: usize,
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.done, self.total)
    }
}

/// One card captured when a run starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationTask {
    pub section_id: String,
    pub card_id: String,
    /// Prompt as built at snapshot time.
    pub prompt: String,
}

/// Point-in-time view of the queue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueSnapshot {
    pub status: QueueStatus,
    pub progress: Progress,
    /// Section title, or [`ALL_CARDS_SCOPE`].
    pub scope: String,
    pub last_error: Option<String>,
}

/// Event emitted while a run progresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueEvent {
    /// A run began with `total` tasks.
    Started { scope: String, total: usize },
    /// A request for this card is about to be sent.
    CardStarted { section_id: String, card_id: String },
    /// The card's image was written.
    CardCompleted { section_id: String, card_id: String },
    /// The card no longer needed artwork or had an empty prompt.
    CardSkipped { section_id: String, card_id: String },
    /// Generation failed; the card's image stays empty.
    CardFailed {
        section_id: String,
        card_id: String,
        error: String,
    },
    /// Progress update, sent after every task.
    Progress(Progress),
    /// The runner suspended at a pause request.
    Paused,
    /// The runner picked up again after a pause.
    Resumed,
    /// The run ended.
    Finished { status: QueueStatus, progress: Progress },
}
