//! Deck error types.

/// Errors produced while decoding or importing a deck.
#[derive(Debug, thiserror::Error)]
pub enum DeckError {
    #[error("invalid deck JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid share token: {0}")]
    ShareToken(#[from] base64::DecodeError),

    #[error("share token is not valid UTF-8")]
    ShareUtf8(#[from] std::string::FromUtf8Error),

    /// User-facing import failure; the concrete cause is logged, not shown.
    #[error("Import failed. Use JSON or a share string.")]
    Import,

    #[error("unknown {kind}: {value}")]
    UnknownOption { kind: &'static str, value: String },
}
