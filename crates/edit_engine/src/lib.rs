//! Edit Engine - Editing session, editing surface bridge, and undo/redo
//!
//! This crate drives the page store through an `EditorSession`: every
//! structural or styling operation commits a full snapshot to a bounded
//! history, and the live editing surface is kept in step with the document.

mod error;
mod executor;
mod surface;
mod undo;

pub use error::*;
pub use executor::*;
pub use surface::{DetachedSurface, EditingSurface};
pub use undo::*;
