//! Text Engine - Font registry, remote font sources, and font decoding
//!
//! # Modules
//!
//! - `font`: Font assets, WOFF/WOFF2 header decoding, display names
//! - `source`: The `FontSource` trait and the GitHub directory source
//! - `font_manager`: The registry of loaded fonts

mod error;
mod font;
pub mod font_manager;
pub mod source;

pub use error::*;
pub use font::*;

// Re-export commonly used types from submodules
pub use font_manager::FontRegistry;
pub use source::{FontSource, GithubFontConfig, GithubFontSource, SourceEntry};
