//! DOCX export
//!
//! The rich-document writer turns one HTML document into a word-processor
//! file. The default writer packages the HTML as an alternative format chunk.

mod content_types;
mod relationships;
mod writer;

pub use content_types::ContentTypes;
pub use relationships::{Relationship, Relationships};
pub use writer::DocxAltChunkWriter;

use crate::ExportResult;
use doc_model::{Orientation, PageSize};

/// Page setup handed to the rich-document writer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RichDocumentOptions {
    pub page_size: PageSize,
    pub orientation: Orientation,
}

/// Converts an HTML document into a rich-document file
pub trait RichDocumentWriter: Send + Sync {
    fn convert(&self, html: &str, options: &RichDocumentOptions) -> ExportResult<Vec<u8>>;

    fn media_type(&self) -> &'static str;

    /// File extension, without the dot
    fn extension(&self) -> &'static str;
}

pub mod namespaces {
    /// Main WordprocessingML namespace
    pub const W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
    /// Relationships namespace
    pub const R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
}

pub mod relationship_types {
    pub const DOCUMENT: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const AF_CHUNK: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/aFChunk";
}

/// Content types for DOCX parts
pub mod content_type_values {
    pub const DOCUMENT: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
    pub const HTML: &str = "text/html";
}
