//! Snapshot-based undo/redo
//!
//! Every entry is a full serialized copy of the page sequence. Snapshots
//! never share structure with live pages, so later edits cannot reach into
//! history.

use crate::{EditError, Result};
use doc_model::Page;
use std::collections::VecDeque;

/// Default maximum number of undo entries
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// An immutable serialized copy of the page sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistorySnapshot {
    serialized: String,
}

impl HistorySnapshot {
    /// Serialize the given pages
    pub fn capture(pages: &[Page]) -> Result<Self> {
        let serialized = serde_json::to_string(pages).map_err(EditError::Serialization)?;
        Ok(Self { serialized })
    }

    /// Wrap an already serialized page sequence
    pub fn from_serialized(serialized: impl Into<String>) -> Self {
        Self {
            serialized: serialized.into(),
        }
    }

    /// The serialized form
    pub fn as_str(&self) -> &str {
        &self.serialized
    }

    /// Deserialize into fresh pages
    pub fn restore(&self) -> Result<Vec<Page>> {
        let pages: Vec<Page> =
            serde_json::from_str(&self.serialized).map_err(EditError::HistoryCorruption)?;
        if pages.is_empty() {
            // A document never has zero pages; such a snapshot is not ours.
            return Err(EditError::HistoryCorruption(
                <serde_json::Error as serde::de::Error>::custom("snapshot has no pages"),
            ));
        }
        Ok(pages)
    }
}

/// Manages undo and redo stacks
#[derive(Debug)]
pub struct HistoryManager {
    /// Snapshots that can be undone, oldest first
    undo_stack: VecDeque<HistorySnapshot>,
    /// Snapshots that can be redone, most recent last
    redo_stack: Vec<HistorySnapshot>,
    /// Maximum number of undo entries
    max_entries: usize,
}

impl HistoryManager {
    /// Create a history manager with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// Create with a custom capacity (at least one entry)
    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_entries: max_entries.max(1),
        }
    }

    /// Maximum number of undo entries kept
    pub fn capacity(&self) -> usize {
        self.max_entries
    }

    /// Serialize `pages` and push them as a new undo entry
    pub fn commit(&mut self, pages: &[Page]) -> Result<()> {
        let snapshot = HistorySnapshot::capture(pages)?;
        self.push(snapshot);
        Ok(())
    }

    /// Push an already captured snapshot as a new undo entry.
    /// Clears the redo branch.
    pub fn push(&mut self, snapshot: HistorySnapshot) {
        self.redo_stack.clear();
        self.push_undo(snapshot);
    }

    fn push_undo(&mut self, snapshot: HistorySnapshot) {
        self.undo_stack.push_back(snapshot);
        while self.undo_stack.len() > self.max_entries {
            self.undo_stack.pop_front();
        }
    }

    /// Step back. `current` is the live state being left; it becomes the
    /// newest redo entry. Returns the pages to install, or `None` when there
    /// is nothing to undo.
    ///
    /// A snapshot that fails to deserialize is discarded and reported; the
    /// redo stack is left untouched.
    pub fn undo(&mut self, current: &[Page]) -> Result<Option<Vec<Page>>> {
        let Some(snapshot) = self.undo_stack.pop_back() else {
            return Ok(None);
        };
        let pages = snapshot.restore()?;
        let leaving = match HistorySnapshot::capture(current) {
            Ok(leaving) => leaving,
            Err(e) => {
                self.undo_stack.push_back(snapshot);
                return Err(e);
            }
        };
        self.redo_stack.push(leaving);
        Ok(Some(pages))
    }

    /// Step forward. Symmetric to [`HistoryManager::undo`].
    pub fn redo(&mut self, current: &[Page]) -> Result<Option<Vec<Page>>> {
        let Some(snapshot) = self.redo_stack.pop() else {
            return Ok(None);
        };
        let pages = snapshot.restore()?;
        let leaving = match HistorySnapshot::capture(current) {
            Ok(leaving) => leaving,
            Err(e) => {
                self.redo_stack.push(snapshot);
                return Err(e);
            }
        };
        self.push_undo(leaving);
        Ok(Some(pages))
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of undo entries
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of redo entries
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(n: usize) -> Vec<Page> {
        (0..n).map(|_| Page::blank()).collect()
    }

    #[test]
    fn test_undo_on_empty_is_noop() {
        let mut history = HistoryManager::new();
        assert!(history.undo(&pages(1)).unwrap().is_none());
        assert!(history.redo(&pages(1)).unwrap().is_none());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_returns_committed_state() {
        let mut history = HistoryManager::new();
        let before = pages(1);
        let after = pages(2);

        history.commit(&before).unwrap();
        let restored = history.undo(&after).unwrap().unwrap();

        assert_eq!(restored, before);
        assert!(history.can_redo());
        assert_eq!(history.redo(&restored).unwrap().unwrap(), after);
    }

    #[test]
    fn test_commit_clears_redo() {
        let mut history = HistoryManager::new();
        history.commit(&pages(1)).unwrap();
        history.undo(&pages(2)).unwrap();
        assert!(history.can_redo());

        history.commit(&pages(3)).unwrap();
        assert!(!history.can_redo());
        assert!(history.redo(&pages(3)).unwrap().is_none());
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut history = HistoryManager::with_capacity(3);
        let states: Vec<_> = (1..=5).map(pages).collect();
        for state in &states {
            history.commit(state).unwrap();
        }
        assert_eq!(history.undo_depth(), 3);

        let mut current = pages(6);
        let mut seen = Vec::new();
        while let Some(restored) = history.undo(&current).unwrap() {
            seen.push(restored.len());
            current = restored;
        }
        assert_eq!(seen, vec![5, 4, 3]);
    }

    #[test]
    fn test_corrupt_snapshot_is_reported_and_dropped() {
        let mut history = HistoryManager::new();
        history.commit(&pages(1)).unwrap();
        history.push(HistorySnapshot::from_serialized("{not json"));

        let err = history.undo(&pages(2)).unwrap_err();
        assert!(matches!(err, EditError::HistoryCorruption(_)));
        assert!(!history.can_redo());

        // The older, valid entry is still reachable.
        assert_eq!(history.undo(&pages(2)).unwrap().unwrap().len(), 1);
    }

    #[test]
    fn test_empty_snapshot_is_corrupt() {
        let snapshot = HistorySnapshot::from_serialized("[]");
        assert!(matches!(snapshot.restore(), Err(EditError::HistoryCorruption(_))));
    }

    #[test]
    fn test_snapshot_is_independent_of_live_pages() {
        let mut live = pages(1);
        let snapshot = HistorySnapshot::capture(&live).unwrap();
        live[0].set_width(1200);

        assert_eq!(snapshot.restore().unwrap()[0].width(), doc_model::DEFAULT_PAGE_WIDTH);
    }
}
