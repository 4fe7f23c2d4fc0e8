//! PDF export of page images
//!
//! # Architecture
//!
//! - `objects`: PDF object model (Dictionary, Array, Stream, Reference)
//! - `writer`: File structure, object numbering, and cross-reference table
//! - `document`: Paginated-document traits and the image-page PDF writer

mod document;
mod objects;
mod writer;

pub use document::{PaginatedDocument, PaginatedWriter, PdfImageDocument, PdfImageWriter};
pub use writer::{PdfError, PDF_VERSION};
