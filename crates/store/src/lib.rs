//! Store - Export pipeline, output writers, artifacts, and settings
//!
//! This crate turns document snapshots into files: page images, image
//! archives, stitched images, paginated PDFs, and DOCX files. It also
//! persists editor settings.

mod archive;
mod error;
mod export;
mod layout;
mod raster;
mod settings;
pub mod docx;
pub mod pdf;

pub use archive::*;
pub use error::*;
pub use export::*;
pub use layout::*;
pub use raster::*;
pub use settings::*;

pub use docx::{DocxAltChunkWriter, RichDocumentOptions, RichDocumentWriter};
pub use pdf::{PaginatedDocument, PaginatedWriter, PdfError, PdfImageWriter};
