//! Error types for editing operations

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditError {
    #[error("Document model error: {0}")]
    DocModel(#[from] doc_model::DocModelError),

    #[error("History snapshot is corrupt: {0}")]
    HistoryCorruption(#[source] serde_json::Error),

    #[error("Failed to serialize history snapshot: {0}")]
    Serialization(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EditError>;
