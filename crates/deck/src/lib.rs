//! Card deck model, validated JSON codec and share-token encoding.
//!
//! This crate owns everything about the deck as *data*: the section/card
//! types, editing helpers, the strict JSON codec used for storage and
//! export, the URL-safe share token, and the import resolver that accepts
//! any of the three payload forms a user may paste.
//!
//! It has no I/O: persistence lives in `cardstudio-storage` and artwork
//! generation in `cardstudio-imagegen` / `cardstudio-generation`.

pub mod codec;
pub mod error;
pub mod icons;
pub mod import;
pub mod model;
pub mod settings;
pub mod share;
pub mod starter;

// Re-export primary types for convenience.
pub use codec::{parse_deck, serialize_deck};
pub use error::DeckError;
pub use icons::{SectionIcon, section_icon};
pub use import::{
    IMPORT_FAILED_MESSAGE, build_share_url, deck_from_token, resolve_import, share_param,
    strip_share_param,
};
pub use model::{Card, CardField, Deck, Section, Selection, image_prompt, is_inline_image};
pub use settings::{
    AiSettings, AspectRatio, ImageModel, ImageSize, parse_ai_settings, serialize_ai_settings,
};
pub use share::{decode_share_token, encode_share_token};
pub use starter::starter_deck;
