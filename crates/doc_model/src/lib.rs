//! Document Model - Pages, page content, and style flattening
//!
//! This crate provides the page store of the editor: an ordered, never-empty
//! sequence of pages with stable ids, the styled content tree each page
//! holds, paper-size presets, and the pass that flattens inherited styling
//! into explicit per-run style.

mod content;
mod document;
mod error;
pub mod flatten;
mod page;
mod page_id;
pub mod page_size;
mod run;
pub mod style;

pub use content::*;
pub use document::*;
pub use error::*;
pub use flatten::{flatten, flatten_content, Flattened, InheritedStyleResolver, StyleResolver};
pub use page::*;
pub use page_id::*;
pub use page_size::*;
pub use run::*;
pub use style::*;
