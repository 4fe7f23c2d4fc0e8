//! Bridge to the interactive editing surface
//!
//! The surface owns in-progress edits. The session only sees them through an
//! explicit pull (`sync_from_editing_surface`) and pushes its own changes back
//! through `set_serialized_content`.

use doc_model::{InheritedStyleResolver, LeafPath, PageContent, PageId, StyleResolver, TextStyle};
use std::collections::HashMap;

/// The editing surface the session drives
pub trait EditingSurface: Send {
    /// Current serialized content of a page, if the surface shows it
    fn serialized_content(&self, page: PageId) -> Option<PageContent>;

    /// Replace what the surface shows for a page
    fn set_serialized_content(&mut self, page: PageId, content: &PageContent);

    /// Computed style of the text leaf at `leaf` on `page`
    fn resolve_effective_style(&self, page: PageId, leaf: &LeafPath) -> TextStyle;

    /// Give input focus to a page
    fn focus(&mut self, page: PageId);

    /// The page no longer exists
    fn forget(&mut self, _page: PageId) {}
}

/// Adapts a surface to the flattener's resolver for one page
pub(crate) struct SurfaceResolver<'a> {
    pub surface: &'a dyn EditingSurface,
    pub page: PageId,
}

impl StyleResolver for SurfaceResolver<'_> {
    fn resolve_effective_style(&self, _content: &PageContent, leaf: &LeafPath) -> TextStyle {
        self.surface.resolve_effective_style(self.page, leaf)
    }
}

/// An in-memory surface with no UI.
///
/// Holds the content of each page and resolves styles by inheritance along
/// the content tree. Used for headless sessions and tests.
#[derive(Debug, Default)]
pub struct DetachedSurface {
    pages: HashMap<PageId, PageContent>,
    focused: Option<PageId>,
}

impl DetachedSurface {
    /// Create an empty surface
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an in-progress edit to a page, as typing would.
    /// Returns false if the surface does not show that page.
    pub fn edit(&mut self, page: PageId, f: impl FnOnce(&mut PageContent)) -> bool {
        match self.pages.get_mut(&page) {
            Some(content) => {
                f(content);
                true
            }
            None => false,
        }
    }

    /// Page that currently has focus
    pub fn focused(&self) -> Option<PageId> {
        self.focused
    }

    /// Number of pages shown
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

impl EditingSurface for DetachedSurface {
    fn serialized_content(&self, page: PageId) -> Option<PageContent> {
        self.pages.get(&page).cloned()
    }

    fn set_serialized_content(&mut self, page: PageId, content: &PageContent) {
        self.pages.insert(page, content.clone());
    }

    fn resolve_effective_style(&self, page: PageId, leaf: &LeafPath) -> TextStyle {
        self.pages
            .get(&page)
            .map(|content| InheritedStyleResolver.resolve_effective_style(content, leaf))
            .unwrap_or_default()
    }

    fn focus(&mut self, page: PageId) {
        self.focused = Some(page);
    }

    fn forget(&mut self, page: PageId) {
        self.pages.remove(&page);
        if self.focused == Some(page) {
            self.focused = None;
        }
    }
}
