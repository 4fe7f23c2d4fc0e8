//! Property tests for session history
//!
//! Any sequence of committed operations can be fully undone back to the
//! starting pages and fully redone to the final pages.

use doc_model::{Element, Page};
use edit_engine::{EditError, EditorSession, HistoryManager};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Add(usize),
    Duplicate(usize),
    Delete(usize),
    Reorder(usize, usize),
    Type(usize, String),
    Resize(usize, u32),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..6).prop_map(Op::Add),
        (0usize..6).prop_map(Op::Duplicate),
        (0usize..6).prop_map(Op::Delete),
        (0usize..6, 0usize..6).prop_map(|(a, b)| Op::Reorder(a, b)),
        (0usize..6, "[a-z ]{1,8}").prop_map(|(i, s)| Op::Type(i, s)),
        (0usize..6, 200u32..1400).prop_map(|(i, w)| Op::Resize(i, w)),
    ]
}

/// Apply `op`; returns whether it produced a history entry
fn apply(session: &mut EditorSession, op: &Op) -> bool {
    match op {
        Op::Add(i) => session.add_page(*i).is_ok(),
        Op::Duplicate(i) => session.duplicate_page(*i).is_ok(),
        Op::Delete(i) => session.delete_page(*i).is_ok(),
        Op::Reorder(from, to) => session.reorder_page(*from, *to).is_ok() && from != to,
        Op::Type(i, text) => {
            let index = (*i).min(session.document().len() - 1);
            let id = session.document().pages()[index].id();
            session.surface_mut().edit(id, |content| {
                content.root.children.push(Element::new("p").with_text(text.clone()).into());
            });
            session.content_edited().is_ok()
        }
        Op::Resize(i, width) => session.resize_page(*i, *width).is_ok(),
    }
}

fn pages_of(session: &EditorSession) -> Vec<Page> {
    session.document().pages().to_vec()
}

proptest! {
    #[test]
    fn undo_all_restores_initial_and_redo_all_restores_final(
        ops in prop::collection::vec(op_strategy(), 1..30)
    ) {
        let mut session: EditorSession = EditorSession::default();
        let initial = pages_of(&session);

        let mut commits = 0;
        for op in &ops {
            if apply(&mut session, op) {
                commits += 1;
            }
        }
        let last = pages_of(&session);
        prop_assert_eq!(session.history().undo_depth(), commits);

        for _ in 0..commits {
            prop_assert!(session.undo().unwrap());
        }
        prop_assert!(!session.undo().unwrap());
        prop_assert_eq!(pages_of(&session), initial);
        prop_assert!(session.document().current_index() < session.document().len());

        for _ in 0..commits {
            prop_assert!(session.redo().unwrap());
        }
        prop_assert!(!session.redo().unwrap());
        prop_assert_eq!(pages_of(&session), last);
    }

    #[test]
    fn commit_after_undo_discards_redo(
        ops in prop::collection::vec(op_strategy(), 1..12),
        after in 0usize..6,
    ) {
        let mut session: EditorSession = EditorSession::default();
        session.add_page(0).unwrap();
        for op in &ops {
            apply(&mut session, op);
        }

        session.undo().unwrap();
        prop_assert!(session.can_redo());

        session.add_page(after).unwrap();
        prop_assert!(!session.can_redo());
        prop_assert!(!session.redo().unwrap());
    }

    #[test]
    fn surface_always_shows_exactly_the_document(
        ops in prop::collection::vec(op_strategy(), 0..20)
    ) {
        let mut session: EditorSession = EditorSession::default();
        for op in &ops {
            apply(&mut session, op);
        }
        while session.undo().unwrap() {}

        prop_assert_eq!(session.surface().page_count(), session.document().len());
        let current = session.document().current_page().id();
        prop_assert_eq!(session.surface().focused(), Some(current));
    }
}

#[test]
fn history_capacity_bounds_undo_depth() {
    let mut session: EditorSession = EditorSession::with_document(
        Default::default(),
        Default::default(),
        HistoryManager::with_capacity(5),
    );
    for _ in 0..8 {
        session.add_page(0).unwrap();
    }
    assert_eq!(session.history().undo_depth(), 5);

    let mut undone = 0;
    while session.undo().unwrap() {
        undone += 1;
    }
    assert_eq!(undone, 5);
    assert_eq!(session.document().len(), 4);
}

#[test]
fn deleting_last_page_is_rejected() {
    let mut session: EditorSession = EditorSession::default();
    let err = session.delete_page(0).unwrap_err();
    assert!(matches!(
        err,
        EditError::DocModel(doc_model::DocModelError::CannotDeleteLastPage)
    ));
    assert_eq!(session.document().len(), 1);
}
