//! Deck and settings snapshots over a [`KeyValueStore`].

use cardstudio_deck::{
    AiSettings, Deck, parse_ai_settings, parse_deck, serialize_ai_settings, serialize_deck,
};
use tracing::{debug, warn};

use crate::error::StorageError;
use crate::store::{KeyValueStore, utf16_len};

/// Key of the deck snapshot.
pub const DECK_KEY: &str = "holy-card-studio-v1";

/// Key of the image generation settings snapshot.
pub const AI_SETTINGS_KEY: &str = "holy-card-studio-ai-v1";

/// Serialized decks longer than this (UTF-16 code units) are written with
/// inline images cleared.
pub const MAX_DECK_CHARS: usize = 3_200_000;

/// Which payload a deck save ended up writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The deck as is.
    Full,
    /// The deck with inline images cleared.
    Stripped,
    /// Nothing; the previous snapshot is still in place.
    Dropped,
}

/// Reads and writes the studio's two snapshots.
///
/// Writes never fail towards the caller: storage errors are logged and the
/// write degrades or is dropped.
pub struct PersistenceGateway {
    store: Box<dyn KeyValueStore>,
}

impl PersistenceGateway {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    /// Saves the deck snapshot.
    ///
    /// Oversized decks are stripped of inline images up front. A rejected
    /// write is retried once with the stripped payload and then dropped.
    pub fn save_deck(&self, deck: &Deck) -> SaveOutcome {
        let serialized = serialize_deck(deck);
        let chars = utf16_len(&serialized);
        let (primary, outcome) = if chars <= MAX_DECK_CHARS {
            (serialized, SaveOutcome::Full)
        } else {
            debug!(chars, max = MAX_DECK_CHARS, "deck over size limit, stripping inline images");
            (serialize_deck(&deck.strip_inline_images()), SaveOutcome::Stripped)
        };

        let err = match self.store.set(DECK_KEY, &primary) {
            Ok(()) => return outcome,
            Err(e) => e,
        };
        warn!(error = %err, "deck write rejected, retrying without inline images");

        let fallback = serialize_deck(&deck.strip_inline_images());
        match self.store.set(DECK_KEY, &fallback) {
            Ok(()) => SaveOutcome::Stripped,
            Err(e) => {
                warn!(error = %e, "deck write dropped");
                SaveOutcome::Dropped
            }
        }
    }

    /// Loads the deck snapshot; `None` when absent or invalid.
    pub fn load_deck(&self) -> Option<Deck> {
        let text = self.read(DECK_KEY)?;
        match parse_deck(&text) {
            Ok(deck) => Some(deck),
            Err(e) => {
                warn!(error = %e, "stored deck is invalid, ignoring");
                None
            }
        }
    }

    /// Saves the settings snapshot. Returns `false` if the write failed.
    pub fn save_ai_settings(&self, settings: &AiSettings) -> bool {
        match self.store.set(AI_SETTINGS_KEY, &serialize_ai_settings(settings)) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "settings write dropped");
                false
            }
        }
    }

    /// Loads the settings snapshot; `None` when absent or invalid.
    pub fn load_ai_settings(&self) -> Option<AiSettings> {
        let text = self.read(AI_SETTINGS_KEY)?;
        let settings = parse_ai_settings(&text);
        if settings.is_none() {
            warn!("stored settings are invalid, ignoring");
        }
        settings
    }

    /// Removes both snapshots.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(DECK_KEY)?;
        self.store.remove(AI_SETTINGS_KEY)?;
        debug!("cleared stored deck and settings");
        Ok(())
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "storage read failed");
                None
            }
        }
    }
}
