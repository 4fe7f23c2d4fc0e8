//! The document: an ordered, never-empty page sequence and an edit cursor

use crate::{DocModelError, Page, PageContent, PageId, Result};
use serde::{Deserialize, Serialize};

/// The page store.
///
/// Holds at least one page at all times. `current_index` always addresses an
/// existing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DocumentRecord")]
pub struct Document {
    pages: Vec<Page>,
    current_index: usize,
}

impl Document {
    /// Create a document with one default page
    pub fn new() -> Self {
        Self {
            pages: vec![Page::new(PageContent::initial())],
            current_index: 0,
        }
    }

    /// Create a document from existing pages. An empty list gets a default page.
    pub fn from_pages(pages: Vec<Page>) -> Self {
        let mut doc = Self {
            pages,
            current_index: 0,
        };
        if doc.pages.is_empty() {
            doc.pages.push(Page::new(PageContent::initial()));
        }
        doc
    }

    /// All pages in order
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Number of pages (always at least one)
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Always false; present for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Index of the page under edit
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The page under edit
    pub fn current_page(&self) -> &Page {
        &self.pages[self.current_index]
    }

    /// Get a page by index
    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    /// Get a mutable page by index
    pub fn page_mut(&mut self, index: usize) -> Option<&mut Page> {
        self.pages.get_mut(index)
    }

    /// Find the index of a page by id
    pub fn index_of(&self, id: PageId) -> Option<usize> {
        self.pages.iter().position(|p| p.id() == id)
    }

    /// Get a mutable page by id
    pub fn page_by_id_mut(&mut self, id: PageId) -> Option<&mut Page> {
        self.pages.iter_mut().find(|p| p.id() == id)
    }

    fn clamp_index(&self, index: usize) -> usize {
        index.min(self.pages.len() - 1)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.pages.len() {
            Ok(())
        } else {
            Err(DocModelError::PageIndexOutOfRange {
                index,
                len: self.pages.len(),
            })
        }
    }

    /// Insert a blank page after `after_index` (clamped) and make it current.
    /// Returns the index of the new page.
    pub fn add_page(&mut self, after_index: usize) -> usize {
        let at = self.clamp_index(after_index) + 1;
        self.pages.insert(at, Page::blank());
        self.current_index = at;
        at
    }

    /// Deep-copy the page at `index` (clamped) under a new id, insert the
    /// copy right after it and make it current. Returns the copy's index.
    pub fn duplicate_page(&mut self, index: usize) -> usize {
        let index = self.clamp_index(index);
        let copy = self.pages[index].duplicate();
        self.pages.insert(index + 1, copy);
        self.current_index = index + 1;
        index + 1
    }

    /// Remove the page at `index`. The cursor moves to the previous page.
    pub fn delete_page(&mut self, index: usize) -> Result<Page> {
        if self.pages.len() <= 1 {
            return Err(DocModelError::CannotDeleteLastPage);
        }
        self.check_index(index)?;

        let removed = self.pages.remove(index);
        self.current_index = index.saturating_sub(1);
        Ok(removed)
    }

    /// Move the page at `from` to position `to`. The cursor follows the
    /// moved page by id.
    pub fn reorder_page(&mut self, from: usize, to: usize) -> Result<()> {
        self.check_index(from)?;
        self.check_index(to)?;
        if from == to {
            return Ok(());
        }

        let page = self.pages.remove(from);
        let id = page.id();
        self.pages.insert(to, page);
        self.current_index = self.index_of(id).unwrap_or(to);
        Ok(())
    }

    /// Clamp and set the cursor. Returns the index actually selected.
    pub fn set_current(&mut self, index: usize) -> usize {
        self.current_index = self.clamp_index(index);
        self.current_index
    }

    /// Replace the whole page sequence (undo/redo). The cursor is clamped.
    pub fn replace_pages(&mut self, pages: Vec<Page>) {
        if pages.is_empty() {
            return;
        }
        self.pages = pages;
        self.current_index = self.clamp_index(self.current_index);
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialized form of a [`Document`], checked before use
#[derive(Deserialize)]
struct DocumentRecord {
    pages: Vec<Page>,
    #[serde(default)]
    current_index: usize,
}

impl TryFrom<DocumentRecord> for Document {
    type Error = DocModelError;

    fn try_from(record: DocumentRecord) -> Result<Self> {
        if record.pages.is_empty() {
            return Err(DocModelError::EmptyDocument);
        }
        let mut doc = Self {
            pages: record.pages,
            current_index: 0,
        };
        doc.set_current(record.current_index);
        Ok(doc)
    }
}
