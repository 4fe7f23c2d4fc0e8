//! The editing session: page store operations with history

use crate::surface::SurfaceResolver;
use crate::{DetachedSurface, EditingSurface, HistoryManager, HistorySnapshot, Result};
use doc_model::{
    flatten_content, DocModelError, Document, Flattened, Page, PageId, PageSize, StyleProperty,
};
use std::collections::HashSet;

/// Owns the document, its history, and the editing surface it is shown on.
///
/// All mutations take `&mut self`, so structural operations and their history
/// commits can never interleave.
pub struct EditorSession<S: EditingSurface = DetachedSurface> {
    /// The last-synced document state
    document: Document,
    /// Undo/redo snapshots
    history: HistoryManager,
    /// The live editing surface
    surface: S,
}

impl<S: EditingSurface> EditorSession<S> {
    /// Create a session with a fresh one-page document
    pub fn new(surface: S) -> Self {
        Self::with_document(surface, Document::new(), HistoryManager::new())
    }

    /// Create a session around an existing document and history
    pub fn with_document(surface: S, document: Document, history: HistoryManager) -> Self {
        let mut session = Self {
            document,
            history,
            surface,
        };
        session.render();
        session
    }

    /// The last-synced document
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Undo/redo state
    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    /// The editing surface
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the editing surface (for driving edits)
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ========================================================================
    // Surface synchronization
    // ========================================================================

    /// Pull the current content of every page from the editing surface.
    /// Pages the surface does not show keep their content. Returns the number
    /// of pages whose content changed.
    pub fn sync_from_editing_surface(&mut self) -> usize {
        let ids: Vec<PageId> = self.document.pages().iter().map(Page::id).collect();
        let mut changed = 0;
        for id in ids {
            let Some(content) = self.surface.serialized_content(id) else {
                continue;
            };
            if let Some(page) = self.document.page_by_id_mut(id) {
                if page.content != content {
                    page.content = content;
                    changed += 1;
                }
            }
        }
        changed
    }

    /// Push every page to the surface and focus the current page
    fn render(&mut self) {
        for page in self.document.pages() {
            self.surface.set_serialized_content(page.id(), &page.content);
        }
        self.surface.focus(self.document.current_page().id());
    }

    /// The surface reported an edit. Commits the last-synced state, then
    /// pulls the edited content in.
    pub fn content_edited(&mut self) -> Result<()> {
        let snapshot = HistorySnapshot::capture(self.document.pages())?;
        let changed = self.sync_from_editing_surface();
        self.history.push(snapshot);
        tracing::debug!(changed, "content edit committed");
        Ok(())
    }

    /// Document state for an export: synced now, detached from later edits
    pub fn export_snapshot(&mut self) -> Document {
        self.sync_from_editing_surface();
        self.document.clone()
    }

    /// Sync, capture the state being left, apply `op`, and commit the capture
    /// only if `op` succeeded.
    fn commit_with<T>(
        &mut self,
        op: impl FnOnce(&mut Document) -> doc_model::Result<T>,
    ) -> Result<T> {
        self.sync_from_editing_surface();
        let snapshot = HistorySnapshot::capture(self.document.pages())?;
        let before: HashSet<PageId> = self.document.pages().iter().map(Page::id).collect();

        let out = op(&mut self.document)?;

        self.history.push(snapshot);
        self.forget_removed(&before);
        self.render();
        Ok(out)
    }

    fn forget_removed(&mut self, before: &HashSet<PageId>) {
        let now: HashSet<PageId> = self.document.pages().iter().map(Page::id).collect();
        for id in before.difference(&now) {
            self.surface.forget(*id);
        }
    }

    // ========================================================================
    // Structural operations
    // ========================================================================

    /// Insert a blank page after `after_index` and make it current
    pub fn add_page(&mut self, after_index: usize) -> Result<usize> {
        let at = self.commit_with(|doc| Ok(doc.add_page(after_index)))?;
        tracing::debug!(index = at, "page added");
        Ok(at)
    }

    /// Duplicate the page at `index` right after it and make the copy current
    pub fn duplicate_page(&mut self, index: usize) -> Result<usize> {
        let at = self.commit_with(|doc| Ok(doc.duplicate_page(index)))?;
        tracing::debug!(source = index, index = at, "page duplicated");
        Ok(at)
    }

    /// Delete the page at `index`. Deleting the only page is rejected with
    /// no change.
    pub fn delete_page(&mut self, index: usize) -> Result<()> {
        let removed = self.commit_with(|doc| doc.delete_page(index))?;
        tracing::debug!(index, page = %removed.id(), "page deleted");
        Ok(())
    }

    /// Move the page at `from` to `to`; the cursor follows the page
    pub fn reorder_page(&mut self, from: usize, to: usize) -> Result<()> {
        if from == to {
            return Ok(());
        }
        self.commit_with(|doc| doc.reorder_page(from, to))?;
        tracing::debug!(from, to, "page moved");
        Ok(())
    }

    /// Clamp and set the cursor, focusing that page on the surface
    pub fn set_current(&mut self, index: usize) -> usize {
        let index = self.document.set_current(index);
        self.surface.focus(self.document.current_page().id());
        index
    }

    // ========================================================================
    // Geometry
    // ========================================================================

    /// Resize a page; the width is clamped to the minimum page width
    pub fn resize_page(&mut self, index: usize, width: u32) -> Result<u32> {
        self.commit_with(|doc| {
            let len = doc.len();
            let page = doc
                .page_mut(index)
                .ok_or(DocModelError::PageIndexOutOfRange { index, len })?;
            page.set_width(width);
            Ok(page.width())
        })
    }

    /// Apply a page-setup size to a page (its width)
    pub fn apply_page_size(&mut self, index: usize, size: PageSize) -> Result<u32> {
        self.resize_page(index, size.width())
    }

    // ========================================================================
    // Page-level style application
    // ========================================================================

    fn apply_container_style(&mut self, property: StyleProperty, value: String) -> Result<()> {
        tracing::debug!(%property, %value, "page style applied");
        self.commit_with(|doc| {
            let index = doc.current_index();
            let len = doc.len();
            let page = doc
                .page_mut(index)
                .ok_or(DocModelError::PageIndexOutOfRange { index, len })?;
            page.content.set_container_property(property, value);
            Ok(())
        })
    }

    /// Set the font family stack of the current page
    pub fn apply_font_family(&mut self, family_stack: &str) -> Result<()> {
        self.apply_container_style(StyleProperty::FontFamily, family_stack.to_string())
    }

    /// Set the font size of the current page, in pixels
    pub fn apply_font_size(&mut self, px: u32) -> Result<()> {
        self.apply_container_style(StyleProperty::FontSize, format!("{}px", px))
    }

    /// Set the line spacing factor of the current page
    pub fn apply_line_spacing(&mut self, factor: f32) -> Result<()> {
        self.apply_container_style(StyleProperty::LineHeight, format!("{}", factor))
    }

    /// Set the letter spacing of the current page, in pixels
    pub fn apply_letter_spacing(&mut self, px: f32) -> Result<()> {
        self.apply_container_style(StyleProperty::LetterSpacing, format!("{}px", px))
    }

    // ========================================================================
    // Flattening
    // ========================================================================

    /// Rewrite a page's styling as explicit per-run style
    pub fn flatten_page(&mut self, index: usize) -> Result<Flattened> {
        self.sync_from_editing_surface();
        let len = self.document.len();
        let page = self
            .document
            .page(index)
            .ok_or(DocModelError::PageIndexOutOfRange { index, len })?;
        let resolver = SurfaceResolver {
            surface: &self.surface,
            page: page.id(),
        };
        let (content, flattened) = flatten_content(&page.content, &resolver);

        self.commit_with(|doc| {
            if let Some(page) = doc.page_mut(index) {
                page.content = content;
            }
            Ok(())
        })?;
        tracing::debug!(index, runs = flattened.runs().len(), "page flattened");
        Ok(flattened)
    }

    // ========================================================================
    // Undo/redo
    // ========================================================================

    /// Undo the last commit. Returns false when there was nothing to undo.
    /// A corrupt snapshot is reported and leaves the document unchanged.
    pub fn undo(&mut self) -> Result<bool> {
        self.sync_from_editing_surface();
        match self.history.undo(self.document.pages()) {
            Ok(Some(pages)) => {
                self.install(pages);
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(e) => {
                tracing::warn!("Undo skipped a corrupt snapshot: {}", e);
                Err(e)
            }
        }
    }

    /// Redo the last undone commit. Returns false when there was nothing to
    /// redo.
    pub fn redo(&mut self) -> Result<bool> {
        self.sync_from_editing_surface();
        match self.history.redo(self.document.pages()) {
            Ok(Some(pages)) => {
                self.install(pages);
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(e) => {
                tracing::warn!("Redo skipped a corrupt snapshot: {}", e);
                Err(e)
            }
        }
    }

    fn install(&mut self, pages: Vec<Page>) {
        let before: HashSet<PageId> = self.document.pages().iter().map(Page::id).collect();
        self.document.replace_pages(pages);
        self.forget_removed(&before);
        self.render();
    }
}

impl Default for EditorSession<DetachedSurface> {
    fn default() -> Self {
        Self::new(DetachedSurface::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EditError;
    use doc_model::{ContentNode, Element, PageContent};

    fn session() -> EditorSession {
        EditorSession::default()
    }

    fn type_text(session: &mut EditorSession, index: usize, text: &str) {
        let id = session.document().pages()[index].id();
        session.surface_mut().edit(id, |content| {
            content.root.children.push(Element::new("p").with_text(text).into());
        });
        session.content_edited().unwrap();
    }

    #[test]
    fn test_new_session_renders_and_focuses() {
        let session = session();
        assert_eq!(session.surface().page_count(), 1);
        assert_eq!(session.surface().focused(), Some(session.document().pages()[0].id()));
    }

    #[test]
    fn test_sync_pulls_surface_content() {
        let mut session = session();
        let id = session.document().pages()[0].id();
        session.surface_mut().edit(id, |content| {
            *content = PageContent::new(vec![ContentNode::text("typed")]);
        });

        assert_eq!(session.document().pages()[0].content.plain_text(), "Untitled documentStart typing...");
        assert_eq!(session.sync_from_editing_surface(), 1);
        assert_eq!(session.document().pages()[0].content.plain_text(), "typed");
    }

    #[test]
    fn test_each_structural_op_commits_once() {
        let mut session = session();
        session.add_page(0).unwrap();
        session.duplicate_page(1).unwrap();
        session.reorder_page(2, 0).unwrap();
        session.delete_page(1).unwrap();
        assert_eq!(session.history().undo_depth(), 4);
    }

    #[test]
    fn test_failed_delete_commits_nothing() {
        let mut session = session();
        let before = session.document().clone();
        let err = session.delete_page(0).unwrap_err();

        assert!(matches!(err, EditError::DocModel(DocModelError::CannotDeleteLastPage)));
        assert_eq!(session.document(), &before);
        assert!(!session.can_undo());
    }

    #[test]
    fn test_reorder_same_index_commits_nothing() {
        let mut session = session();
        session.add_page(0).unwrap();
        session.reorder_page(1, 1).unwrap();
        assert_eq!(session.history().undo_depth(), 1);
    }

    #[test]
    fn test_undo_add_page_restores_and_forgets() {
        let mut session = session();
        session.add_page(0).unwrap();
        assert_eq!(session.surface().page_count(), 2);

        assert!(session.undo().unwrap());
        assert_eq!(session.document().len(), 1);
        assert_eq!(session.surface().page_count(), 1);

        assert!(session.redo().unwrap());
        assert_eq!(session.document().len(), 2);
    }

    #[test]
    fn test_content_edit_undo_restores_surface() {
        let mut session = session();
        let original = session.document().pages()[0].content.clone();
        type_text(&mut session, 0, "hello");
        assert!(session.document().pages()[0].content.plain_text().ends_with("hello"));

        session.undo().unwrap();
        let id = session.document().pages()[0].id();
        assert_eq!(session.document().pages()[0].content, original);
        assert_eq!(session.surface().serialized_content(id), Some(original));
    }

    #[test]
    fn test_corrupt_snapshot_leaves_session_usable() {
        let older = vec![Page::blank()];
        let mut history = HistoryManager::new();
        history.commit(&older).unwrap();
        history.push(HistorySnapshot::from_serialized("{\"pages\": oops"));

        let document = Document::from_pages(vec![Page::blank(), Page::blank()]);
        let mut session = EditorSession::with_document(DetachedSurface::new(), document, history);
        let before = session.document().clone();
        let shown: Vec<_> = before
            .pages()
            .iter()
            .map(|p| session.surface().serialized_content(p.id()))
            .collect();

        let err = session.undo().unwrap_err();
        assert!(matches!(err, EditError::HistoryCorruption(_)));
        assert_eq!(session.document(), &before);
        assert!(!session.can_redo());
        for (page, content) in before.pages().iter().zip(&shown) {
            assert_eq!(&session.surface().serialized_content(page.id()), content);
        }

        // The older entry is next in line
        assert!(session.undo().unwrap());
        assert_eq!(session.document().pages(), older.as_slice());
        assert_eq!(session.surface().page_count(), 1);
        assert!(session.can_redo());
    }

    #[test]
    fn test_set_current_focuses_page() {
        let mut session = session();
        session.add_page(0).unwrap();
        assert_eq!(session.set_current(0), 0);
        assert_eq!(session.surface().focused(), Some(session.document().pages()[0].id()));
    }

    #[test]
    fn test_resize_clamps_and_commits() {
        let mut session = session();
        assert_eq!(session.resize_page(0, 100).unwrap(), doc_model::MIN_PAGE_WIDTH);
        assert_eq!(session.apply_page_size(0, PageSize::from_name("letter")).unwrap(), 816);
        assert_eq!(session.history().undo_depth(), 2);

        let err = session.resize_page(4, 900).unwrap_err();
        assert!(matches!(err, EditError::DocModel(DocModelError::PageIndexOutOfRange { .. })));
    }

    #[test]
    fn test_style_application_targets_current_page() {
        let mut session = session();
        session.add_page(0).unwrap();
        session.apply_font_family("'Knyaw', Inter, sans-serif").unwrap();
        session.apply_font_size(24).unwrap();
        session.apply_line_spacing(1.5).unwrap();
        session.apply_letter_spacing(2.0).unwrap();

        let style = &session.document().pages()[1].content.root.style;
        assert_eq!(style.get(StyleProperty::FontFamily), Some("'Knyaw', Inter, sans-serif"));
        assert_eq!(style.get(StyleProperty::FontSize), Some("24px"));
        assert_eq!(style.get(StyleProperty::LineHeight), Some("1.5"));
        assert_eq!(style.get(StyleProperty::LetterSpacing), Some("2px"));

        let first = &session.document().pages()[0].content.root.style;
        assert_eq!(first.get(StyleProperty::FontSize), Some("18px"));
    }

    #[test]
    fn test_flatten_page_updates_surface_and_is_undoable() {
        let mut session = session();
        let id = session.document().pages()[0].id();
        let flattened = session.flatten_page(0).unwrap();

        assert_eq!(flattened.runs().len(), 2);
        let content = session.surface().serialized_content(id).unwrap();
        assert!(content.root.children.iter().all(|c| matches!(c, ContentNode::Element(e) if e.tag == "span")));

        let again = session.flatten_page(0).unwrap();
        assert_eq!(again, flattened);

        session.undo().unwrap();
        session.undo().unwrap();
        assert_eq!(session.document().pages()[0].content, PageContent::initial());
    }

    #[test]
    fn test_export_snapshot_is_detached() {
        let mut session = session();
        type_text(&mut session, 0, "before export");
        let snapshot = session.export_snapshot();

        session.add_page(0).unwrap();
        type_text(&mut session, 0, "after export");

        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.pages()[0].content.plain_text().ends_with("before export"));
    }
}
