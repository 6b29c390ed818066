//! Sequential generation runner.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use cardstudio_deck::{AiSettings, Deck, image_prompt};
use cardstudio_imagegen::{ImageGenerator, ImageRef};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::control::{Checkpoint, QueueControl, QueueHandle};
use crate::error::QueueError;
use crate::types::{ALL_CARDS_SCOPE, GenerationTask, QueueEvent, QueueSnapshot};

/// How often a paused runner re-reads the control flags.
pub const PAUSE_POLL_INTERVAL: Duration = Duration::from_millis(200);

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Builds the task list for a run: every card in scope with a non-blank
/// image prompt detail and no image, in section then card order.
///
/// Returns the scope label alongside the tasks.
pub fn build_tasks(
    deck: &Deck,
    section_id: Option<&str>,
) -> Result<(String, Vec<GenerationTask>), QueueError> {
    let (scope, sections) = match section_id {
        Some(id) => {
            let section = deck
                .section(id)
                .ok_or_else(|| QueueError::SectionNotFound(id.to_string()))?;
            (section.title.clone(), std::slice::from_ref(section))
        }
        None => (ALL_CARDS_SCOPE.to_string(), deck.sections.as_slice()),
    };

    let tasks = sections
        .iter()
        .flat_map(|section| {
            section
                .cards
                .iter()
                .filter(|card| card.needs_artwork())
                .map(move |card| GenerationTask {
                    section_id: section.id.clone(),
                    card_id: card.id.clone(),
                    prompt: image_prompt(section, card),
                })
        })
        .collect();
    Ok((scope, tasks))
}

/// Runs generation over a shared deck, one card at a time.
pub struct GenerationQueue {
    generator: Arc<dyn ImageGenerator>,
    control: Arc<QueueControl>,
    in_flight: Mutex<HashSet<String>>,
    /// Set once a listener has taken the receiver; runs emit nothing before.
    events_tx: Option<mpsc::Sender<QueueEvent>>,
}

impl GenerationQueue {
    /// Creates a queue that generates through `generator`.
    pub fn new(generator: Arc<dyn ImageGenerator>) -> Self {
        Self {
            generator,
            control: Arc::new(QueueControl::default()),
            in_flight: Mutex::default(),
            events_tx: None,
        }
    }

    /// Takes the event receiver. Can only be called once.
    ///
    /// Every event is delivered: a run waits for the listener when the
    /// channel is full, so the receiver must be drained while a run is
    /// in progress.
    pub fn take_events(&mut self) -> Option<mpsc::Receiver<QueueEvent>> {
        if self.events_tx.is_some() {
            return None;
        }
        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        self.events_tx = Some(events_tx);
        Some(events_rx)
    }

    /// Returns a handle for pausing, resuming and stopping runs.
    pub fn handle(&self) -> QueueHandle {
        QueueHandle::new(self.control.clone())
    }

    /// Whether a request for this card is in flight.
    pub fn is_generating(&self, section_id: &str, card_id: &str) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&card_key(section_id, card_id))
    }

    /// Generates artwork for every card in scope that needs it.
    ///
    /// `section_id` limits the run to one section; `None` covers the whole
    /// deck. The deck lock is held only to build tasks and apply results.
    /// Failed cards are recorded as the last error and the run continues.
    pub async fn run(
        &self,
        deck: &tokio::sync::Mutex<Deck>,
        section_id: Option<&str>,
        settings: &AiSettings,
    ) -> Result<QueueSnapshot, QueueError> {
        // A rejected start must not touch the running run's last error.
        if self.control.is_active() {
            return Err(QueueError::AlreadyRunning);
        }
        if !settings.has_api_key() {
            let err = QueueError::MissingApiKey;
            self.control.record_error(err.to_string());
            return Err(err);
        }

        let (scope, tasks) = build_tasks(&*deck.lock().await, section_id)?;
        let total = tasks.len();
        if !self.control.try_begin(&scope, total) {
            return Err(QueueError::AlreadyRunning);
        }
        info!(scope = %scope, total, "generation run started");
        self.emit(QueueEvent::Started {
            scope: scope.clone(),
            total,
        })
        .await;

        for task in &tasks {
            if !self.wait_for_turn().await {
                break;
            }
            self.process(deck, task, settings).await;
            let progress = self.control.advance();
            debug!(done = progress.done, total = progress.total, "progress");
            self.emit(QueueEvent::Progress(progress)).await;
        }

        let snapshot = self.control.finish();
        info!(
            status = %snapshot.status,
            done = snapshot.progress.done,
            total = snapshot.progress.total,
            "generation run finished"
        );
        self.emit(QueueEvent::Finished {
            status: snapshot.status,
            progress: snapshot.progress,
        })
        .await;
        Ok(snapshot)
    }

    /// Generates artwork for one card outside any run, replacing its
    /// current image. Does not touch the run's control flags.
    pub async fn generate_card(
        &self,
        deck: &tokio::sync::Mutex<Deck>,
        section_id: &str,
        card_id: &str,
        settings: &AiSettings,
    ) -> Result<ImageRef, QueueError> {
        let prompt = {
            let deck = deck.lock().await;
            let section = deck
                .section(section_id)
                .ok_or_else(|| QueueError::SectionNotFound(section_id.to_string()))?;
            let card = section.card(card_id).ok_or_else(|| QueueError::CardNotFound {
                section_id: section_id.to_string(),
                card_id: card_id.to_string(),
            })?;
            image_prompt(section, card)
        };
        if prompt.trim().is_empty() {
            return Err(cardstudio_imagegen::GenerationError::EmptyPrompt.into());
        }
        if !settings.has_api_key() {
            let err = QueueError::MissingApiKey;
            self.control.record_error(err.to_string());
            return Err(err);
        }

        self.control.clear_error();
        let _guard = InFlight::enter(&self.in_flight, card_key(section_id, card_id));
        match self.generator.generate(&prompt, settings).await {
            Ok(image) => {
                deck.lock()
                    .await
                    .set_card_image(section_id, card_id, image.to_data_url());
                info!(section = section_id, card = card_id, "card image generated");
                Ok(image)
            }
            Err(e) => {
                if e.is_reportable() {
                    self.control.record_error(e.to_string());
                }
                warn!(section = section_id, card = card_id, error = %e, "card generation failed");
                Err(e.into())
            }
        }
    }

    /// Honors stop and pause before a task. Returns `false` to end the run.
    async fn wait_for_turn(&self) -> bool {
        let mut suspended = false;
        loop {
            match self.control.checkpoint() {
                Checkpoint::Stop => return false,
                Checkpoint::Proceed => {
                    if suspended {
                        self.emit(QueueEvent::Resumed).await;
                    }
                    return true;
                }
                Checkpoint::Pause => {
                    if !suspended {
                        suspended = true;
                        debug!("generation paused");
                        self.emit(QueueEvent::Paused).await;
                    }
                    tokio::time::sleep(PAUSE_POLL_INTERVAL).await;
                }
            }
        }
    }

    async fn process(
        &self,
        deck: &tokio::sync::Mutex<Deck>,
        task: &GenerationTask,
        settings: &AiSettings,
    ) {
        let section_id = task.section_id.clone();
        let card_id = task.card_id.clone();

        let still_needed = deck
            .lock()
            .await
            .card(&task.section_id, &task.card_id)
            .is_some_and(|card| card.image.trim().is_empty());
        if !still_needed || task.prompt.trim().is_empty() {
            debug!(section = %section_id, card = %card_id, "card skipped");
            self.emit(QueueEvent::CardSkipped {
                section_id,
                card_id,
            })
            .await;
            return;
        }

        self.emit(QueueEvent::CardStarted {
            section_id: section_id.clone(),
            card_id: card_id.clone(),
        })
        .await;
        let _guard = InFlight::enter(&self.in_flight, card_key(&section_id, &card_id));

        match self.generator.generate(&task.prompt, settings).await {
            Ok(image) => {
                let applied = deck
                    .lock()
                    .await
                    .set_card_image(&section_id, &card_id, image.to_data_url());
                if !applied {
                    debug!(section = %section_id, card = %card_id, "card removed before its image arrived");
                }
                self.emit(QueueEvent::CardCompleted {
                    section_id,
                    card_id,
                })
                .await;
            }
            Err(e) if !e.is_reportable() => {
                self.emit(QueueEvent::CardSkipped {
                    section_id,
                    card_id,
                })
                .await;
            }
            Err(e) => {
                let error = e.to_string();
                warn!(section = %section_id, card = %card_id, error = %error, "card generation failed");
                self.control.record_error(error.clone());
                self.emit(QueueEvent::CardFailed {
                    section_id,
                    card_id,
                    error,
                })
                .await;
            }
        }
    }

    async fn emit(&self, event: QueueEvent) {
        let Some(events_tx) = &self.events_tx else {
            return;
        };
        if events_tx.send(event).await.is_err() {
            debug!("queue event receiver dropped");
        }
    }
}

fn card_key(section_id: &str, card_id: &str) -> String {
    format!("{section_id}:{card_id}")
}

/// Marks a card as in flight until dropped.
struct InFlight<'a> {
    set: &'a Mutex<HashSet<String>>,
    key: String,
}

impl<'a> InFlight<'a> {
    fn enter(set: &'a Mutex<HashSet<String>>, key: String) -> Self {
        set.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.clone());
        Self { set, key }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.set
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}
