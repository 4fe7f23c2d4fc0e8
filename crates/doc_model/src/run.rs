//! Style runs - text with its fully resolved style

use crate::{Element, TextStyle};
use serde::{Deserialize, Serialize};

/// A contiguous piece of text carrying explicit style
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleRun {
    /// The text content of this run
    pub text: String,
    /// Resolved style; only non-empty properties are present
    pub style: TextStyle,
}

impl StyleRun {
    /// Create a run
    pub fn new(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    /// The `<span>` element this run is written back as
    pub fn to_element(&self) -> Element {
        Element::new("span")
            .with_style(self.style.clone())
            .with_text(self.text.clone())
    }
}
