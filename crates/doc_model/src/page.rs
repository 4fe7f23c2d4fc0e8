//! A single page: content plus its own width

use crate::{PageContent, PageId};
use serde::{Deserialize, Deserializer, Serialize};

/// Smallest width a page can be resized to, in pixels
pub const MIN_PAGE_WIDTH: u32 = 320;

/// Width of newly created pages, in pixels
pub const DEFAULT_PAGE_WIDTH: u32 = 800;

/// One page of the document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    id: PageId,
    /// Serialized styled content
    pub content: PageContent,
    #[serde(deserialize_with = "clamped_width")]
    width: u32,
}

fn clamped_width<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    Ok(u32::deserialize(deserializer)?.max(MIN_PAGE_WIDTH))
}

impl Page {
    /// Create a page with the given content and default width
    pub fn new(content: PageContent) -> Self {
        Self {
            id: PageId::new(),
            content,
            width: DEFAULT_PAGE_WIDTH,
        }
    }

    /// Create a blank page as added by the user
    pub fn blank() -> Self {
        Self::new(PageContent::blank())
    }

    /// Builder-style width setter (clamped)
    pub fn with_width(mut self, width: u32) -> Self {
        self.set_width(width);
        self
    }

    /// The page id
    pub fn id(&self) -> PageId {
        self.id
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Set the width, clamped to [`MIN_PAGE_WIDTH`]
    pub fn set_width(&mut self, width: u32) {
        self.width = width.max(MIN_PAGE_WIDTH);
    }

    /// Deep copy of this page under a fresh id
    pub fn duplicate(&self) -> Self {
        Self {
            id: PageId::new(),
            content: self.content.clone(),
            width: self.width,
        }
    }
}
