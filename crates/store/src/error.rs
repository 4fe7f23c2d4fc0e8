//! Error types for export and storage operations

use crate::pdf::PdfError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors produced by the export pipeline
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Page {page} failed to render: {reason}")]
    Rasterization { page: usize, reason: String },

    #[error("No pages could be rendered")]
    NoPagesRendered,

    #[error("Export collaborator unavailable: {0}")]
    CollaboratorUnavailable(String),

    #[error("Page index {index} out of range (document has {len} pages)")]
    PageIndexOutOfRange { index: usize, len: usize },

    #[error("Stitched image would be {height} pixels tall")]
    CanvasTooLarge { height: u64 },

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    #[error("Rich document conversion failed: {0}")]
    RichDocument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ExportResult<T> = std::result::Result<T, ExportError>;
