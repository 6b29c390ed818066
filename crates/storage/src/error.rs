//! Storage error types.

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage quota exceeded: {needed} characters needed, quota is {quota}")]
    QuotaExceeded { needed: usize, quota: usize },

    #[error("storage directory not available")]
    NoStorageDir,
}
