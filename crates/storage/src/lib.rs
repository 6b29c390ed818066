//! Local persistence for the card studio.
//!
//! Two snapshots are kept in a key-value store: the deck and the image
//! generation settings. Stores enforce a character quota the way browser
//! local storage does, and the [`PersistenceGateway`] degrades deck writes
//! under that pressure instead of failing.

pub mod error;
pub mod file;
pub mod gateway;
pub mod store;

pub use error::StorageError;
pub use file::FileStore;
pub use gateway::{AI_SETTINGS_KEY, DECK_KEY, MAX_DECK_CHARS, PersistenceGateway, SaveOutcome};
pub use store::{KeyValueStore, MemoryStore, utf16_len};
