//! Shared control state between a running queue and its handles.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::types::{Progress, QueueSnapshot, QueueStatus};

#[derive(Debug, Default)]
struct ControlState {
    status: QueueStatus,
    /// A runner loop currently owns the queue.
    active: bool,
    paused: bool,
    stopped: bool,
    /// A reset arrived mid-run; the runner must land in `Idle`.
    reset_requested: bool,
    progress: Progress,
    scope: String,
    last_error: Option<String>,
}

/// Control flags and observable state of one queue.
#[derive(Debug, Default)]
pub(crate) struct QueueControl {
    state: Mutex<ControlState>,
}

/// What the runner should do at a check point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Checkpoint {
    Proceed,
    Pause,
    Stop,
}

impl QueueControl {
    fn lock(&self) -> MutexGuard<'_, ControlState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Claims the queue for a new run, resetting progress, flags and the
    /// last error. Returns `false` if a run is already active.
    pub(crate) fn try_begin(&self, scope: &str, total: usize) -> bool {
        let mut state = self.lock();
        if state.active {
            return false;
        }
        *state = ControlState {
            status: QueueStatus::Running,
            active: true,
            progress: Progress { done: 0, total },
            scope: scope.to_string(),
            ..ControlState::default()
        };
        true
    }

    /// Whether a runner currently owns the queue.
    pub(crate) fn is_active(&self) -> bool {
        self.lock().active
    }

    /// Reads the flags: stop wins over pause.
    pub(crate) fn checkpoint(&self) -> Checkpoint {
        let state = self.lock();
        if state.stopped {
            Checkpoint::Stop
        } else if state.paused {
            Checkpoint::Pause
        } else {
            Checkpoint::Proceed
        }
    }

    /// Counts one finished task.
    pub(crate) fn advance(&self) -> Progress {
        let mut state = self.lock();
        if !state.reset_requested {
            state.progress.done += 1;
        }
        state.progress
    }

    /// Ends the active run and returns the final snapshot.
    pub(crate) fn finish(&self) -> QueueSnapshot {
        let mut state = self.lock();
        state.active = false;
        state.paused = false;
        if state.reset_requested {
            state.reset_requested = false;
            state.status = QueueStatus::Idle;
            state.progress = Progress::default();
        } else if state.stopped {
            state.status = QueueStatus::Stopped;
        } else {
            state.status = QueueStatus::Completed;
        }
        snapshot_of(&state)
    }

    pub(crate) fn record_error(&self, message: String) {
        self.lock().last_error = Some(message);
    }

    pub(crate) fn clear_error(&self) {
        self.lock().last_error = None;
    }
}

fn snapshot_of(state: &ControlState) -> QueueSnapshot {
    QueueSnapshot {
        status: state.status,
        progress: state.progress,
        scope: state.scope.clone(),
        last_error: state.last_error.clone(),
    }
}

/// Cloneable control surface for a queue.
#[derive(Debug, Clone)]
pub struct QueueHandle {
    control: Arc<QueueControl>,
}

impl QueueHandle {
    pub(crate) fn new(control: Arc<QueueControl>) -> Self {
        Self { control }
    }

    /// Requests a pause. Only honored while running.
    pub fn pause(&self) -> bool {
        let mut state = self.control.lock();
        if state.status != QueueStatus::Running {
            return false;
        }
        state.paused = true;
        state.status = QueueStatus::Paused;
        debug!("pause requested");
        true
    }

    /// Resumes a paused run.
    pub fn resume(&self) -> bool {
        let mut state = self.control.lock();
        if state.status != QueueStatus::Paused {
            return false;
        }
        state.paused = false;
        state.status = QueueStatus::Running;
        debug!("resume requested");
        true
    }

    /// Requests a stop. The run ends at its next check point; a request in
    /// flight still completes.
    pub fn stop(&self) {
        let mut state = self.control.lock();
        state.stopped = true;
        state.paused = false;
        debug!(status = %state.status, "stop requested");
    }

    /// Stops any run and returns the queue to `Idle` with no progress.
    pub fn reset(&self) {
        let mut state = self.control.lock();
        state.stopped = true;
        state.paused = false;
        state.reset_requested = state.active;
        state.status = QueueStatus::Idle;
        state.progress = Progress::default();
        state.scope.clear();
        state.last_error = None;
    }

    pub fn status(&self) -> QueueStatus {
        self.control.lock().status
    }

    pub fn progress(&self) -> Progress {
        self.control.lock().progress
    }

    pub fn last_error(&self) -> Option<String> {
        self.control.lock().last_error.clone()
    }

    /// Whether a runner currently owns the queue.
    pub fn is_active(&self) -> bool {
        self.control.is_active()
    }

    pub fn snapshot(&self) -> QueueSnapshot {
        snapshot_of(&self.control.lock())
    }
}
