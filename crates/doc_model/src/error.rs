//! Error types for page store operations

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocModelError {
    #[error("Cannot delete the only page")]
    CannotDeleteLastPage,

    #[error("Document has no pages")]
    EmptyDocument,

    #[error("Page index {index} out of range (document has {len} pages)")]
    PageIndexOutOfRange { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, DocModelError>;
