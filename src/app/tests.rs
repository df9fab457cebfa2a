//! Synchronizer Tests
//!
//! Drive [`Tracker`] against the in-memory store.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::{NewCategory, NewSubcategory, ParentKind};
use crate::remote::{MemoryStore, StoreClient};
use crate::state::Selection;
use super::Tracker;

fn tracker(store: &Arc<MemoryStore>) -> Tracker<MemoryStore> {
    Tracker::new(Arc::clone(store))
}

/// A category with one subcategory; the tracker has loaded and selected
/// the subcategory.
async fn with_subcategory_selected() -> (Arc<MemoryStore>, Tracker<MemoryStore>, String, String) {
    let store = Arc::new(MemoryStore::new());
    let react = store
        .create_category(&NewCategory::new("React", "ReactIcon"))
        .await
        .unwrap();
    let hooks = store
        .create_subcategory(&NewSubcategory::new("Hooks", &react.id))
        .await
        .unwrap();

    let tracker = tracker(&store);
    tracker.load_all().await;
    tracker.select(ParentKind::Subcategory, &hooks.id).await;
    (store, tracker, react.id, hooks.id)
}

#[tokio::test]
async fn test_first_load_selects_newest_category() {
    let store = Arc::new(MemoryStore::new());
    store
        .create_category(&NewCategory::new("older", "Code2"))
        .await
        .unwrap();
    let newest = store
        .create_category(&NewCategory::new("newest", "Code2"))
        .await
        .unwrap();

    let tracker = tracker(&store);
    tracker.load_all().await;
    assert_eq!(tracker.selection().await, Some(Selection::category(newest.id)));
}

#[tokio::test]
async fn test_load_keeps_existing_selection() {
    let store = Arc::new(MemoryStore::new());
    let older = store
        .create_category(&NewCategory::new("older", "Code2"))
        .await
        .unwrap();
    store
        .create_category(&NewCategory::new("newest", "Code2"))
        .await
        .unwrap();

    let tracker = tracker(&store);
    tracker.select(ParentKind::Category, &older.id).await;
    tracker.load_all().await;
    assert_eq!(tracker.selection().await, Some(Selection::category(older.id)));
}

#[tokio::test]
async fn test_add_question_under_subcategory_denormalizes_category() {
    let (_store, tracker, react_id, hooks_id) = with_subcategory_selected().await;

    assert!(tracker.add_question("  What are hooks?  ").await.unwrap());

    let state = tracker.snapshot().await;
    let question = &state.questions[0];
    assert_eq!(question.title, "What are hooks?");
    assert_eq!(question.category_id, react_id);
    assert!(question.has_parent(ParentKind::Subcategory, &hooks_id));
    assert!(!question.completed);
}

#[tokio::test]
async fn test_blank_question_title_is_dropped() {
    let (store, tracker, _react_id, _hooks_id) = with_subcategory_selected().await;
    let writes = store.write_calls();

    assert!(!tracker.add_question("   ").await.unwrap());
    assert_eq!(store.write_calls(), writes);
}

#[tokio::test]
async fn test_add_question_aborts_without_remote_call_when_unresolvable() {
    let store = Arc::new(MemoryStore::new());
    store
        .create_category(&NewCategory::new("React", "ReactIcon"))
        .await
        .unwrap();

    let tracker = tracker(&store);
    tracker.load_all().await;
    // Selection points at a subcategory that no longer exists locally,
    // as after a concurrent delete by another actor.
    tracker.select(ParentKind::Subcategory, "ghost").await;

    let writes = store.write_calls();
    assert!(!tracker.add_question("orphaned").await.unwrap());
    assert_eq!(store.write_calls(), writes);
    assert!(tracker.snapshot().await.questions.is_empty());
}

#[tokio::test]
async fn test_bulk_import_trims_and_shares_resolved_category() {
    let (_store, tracker, react_id, hooks_id) = with_subcategory_selected().await;

    let imported = tracker.bulk_import("A\n\nB\n  C  \n").await.unwrap();
    assert_eq!(imported, 3);

    let state = tracker.snapshot().await;
    let mut titles: Vec<&str> = state.questions.iter().map(|q| q.title.as_str()).collect();
    titles.sort();
    assert_eq!(titles, vec!["A", "B", "C"]);
    for question in &state.questions {
        assert_eq!(question.category_id, react_id);
        assert!(question.has_parent(ParentKind::Subcategory, &hooks_id));
    }
}

#[tokio::test]
async fn test_add_category_prepends_and_selects() {
    let store = Arc::new(MemoryStore::new());
    store
        .create_category(&NewCategory::new("React", "ReactIcon"))
        .await
        .unwrap();

    let tracker = tracker(&store);
    tracker.load_all().await;
    assert!(tracker.add_category("Angular", "Angular").await.unwrap());

    let state = tracker.snapshot().await;
    assert_eq!(state.categories[0].name, "Angular");
    assert_eq!(
        state.selection,
        Some(Selection::category(state.categories[0].id.clone()))
    );
}

#[tokio::test]
async fn test_add_subcategory_selects_and_expands_parent() {
    let store = Arc::new(MemoryStore::new());
    let react = store
        .create_category(&NewCategory::new("React", "ReactIcon"))
        .await
        .unwrap();

    let tracker = tracker(&store);
    tracker.load_all().await;
    assert!(tracker.add_subcategory("State", &react.id).await.unwrap());

    let state = tracker.snapshot().await;
    assert_eq!(state.subcategories[0].name, "State");
    assert!(state.expanded.contains(&react.id));
    assert_eq!(
        state.selection,
        Some(Selection::subcategory(state.subcategories[0].id.clone()))
    );
}

#[tokio::test]
async fn test_toggle_twice_returns_to_original() {
    let (_store, tracker, _react_id, _hooks_id) = with_subcategory_selected().await;
    tracker.bulk_import("first\nsecond").await.unwrap();

    let state = tracker.snapshot().await;
    let target = state.questions[0].id.clone();
    let other = state.questions[1].clone();

    assert!(tracker.toggle_completed(&target).await.unwrap());
    assert!(tracker
        .snapshot()
        .await
        .questions
        .iter()
        .find(|q| q.id == target)
        .unwrap()
        .completed);

    assert!(tracker.toggle_completed(&target).await.unwrap());
    let state = tracker.snapshot().await;
    let toggled = state.questions.iter().find(|q| q.id == target).unwrap();
    assert!(!toggled.completed);
    // The other question never moved.
    assert_eq!(
        state.questions.iter().find(|q| q.id == other.id).unwrap(),
        &other
    );
}

#[tokio::test]
async fn test_toggle_unknown_id_is_a_local_noop() {
    let (store, tracker, _react_id, _hooks_id) = with_subcategory_selected().await;
    let writes = store.write_calls();
    assert!(!tracker.toggle_completed("ghost").await.unwrap());
    assert_eq!(store.write_calls(), writes);
}

#[tokio::test]
async fn test_remote_failure_leaves_state_untouched() {
    let (store, tracker, _react_id, _hooks_id) = with_subcategory_selected().await;
    tracker.add_question("stable").await.unwrap();
    let before = tracker.snapshot().await;

    store.set_fail_writes(true);
    let question_id = before.questions[0].id.clone();
    assert!(tracker.toggle_completed(&question_id).await.is_err());
    assert!(tracker.add_question("phantom").await.is_err());

    let after = tracker.snapshot().await;
    assert_eq!(after.questions, before.questions);
    assert_eq!(after.categories, before.categories);
}

#[tokio::test]
async fn test_failed_delete_keeps_state_and_arms_no_undo() {
    let (store, tracker, react_id, _hooks_id) = with_subcategory_selected().await;
    let plan = tracker.request_delete_category(&react_id).await.unwrap();

    store.set_fail_writes(true);
    assert!(tracker.confirm_delete(plan).await.is_err());

    assert_eq!(tracker.snapshot().await.categories.len(), 1);
    assert_eq!(tracker.pending_undo_message().await, None);
}

#[tokio::test]
async fn test_empty_category_delete_has_empty_collateral() {
    let store = Arc::new(MemoryStore::new());
    let lone = store
        .create_category(&NewCategory::new("Lone", "Code2"))
        .await
        .unwrap();

    let tracker = tracker(&store);
    tracker.load_all().await;

    let plan = tracker.request_delete_category(&lone.id).await.unwrap();
    assert!(plan.collateral.is_empty());

    tracker.confirm_delete(plan).await.unwrap();
    let state = tracker.snapshot().await;
    assert!(state.categories.is_empty());
    assert_eq!(state.selection, None);
    assert_eq!(
        tracker.pending_undo_message().await.as_deref(),
        Some("Category and associated questions deleted")
    );
}

#[tokio::test]
async fn test_category_delete_cascades_and_spares_others() {
    let store = Arc::new(MemoryStore::new());
    let spring = store
        .create_category(&NewCategory::new("Spring", "SpringBoot"))
        .await
        .unwrap();
    let ioc = store
        .create_subcategory(&NewSubcategory::new("IoC", &spring.id))
        .await
        .unwrap();
    let react = store
        .create_category(&NewCategory::new("React", "ReactIcon"))
        .await
        .unwrap();

    let tracker = tracker(&store);
    tracker.load_all().await;

    tracker.select(ParentKind::Category, &spring.id).await;
    tracker.add_question("direct spring question").await.unwrap();
    tracker.select(ParentKind::Subcategory, &ioc.id).await;
    tracker.add_question("nested spring question").await.unwrap();
    tracker.select(ParentKind::Category, &react.id).await;
    tracker.add_question("react question").await.unwrap();
    tracker.select(ParentKind::Subcategory, &ioc.id).await;

    let plan = tracker.request_delete_category(&spring.id).await.unwrap();
    assert_eq!(plan.collateral.len(), 2);
    tracker.confirm_delete(plan).await.unwrap();

    let state = tracker.snapshot().await;
    assert!(state.categories.iter().all(|c| c.id != spring.id));
    assert!(state.subcategories.is_empty());
    assert_eq!(state.questions.len(), 1);
    assert_eq!(state.questions[0].title, "react question");
    // Selection was on a removed subcategory and falls over to the first
    // remaining category.
    assert_eq!(state.selection, Some(Selection::category(react.id)));
}

#[tokio::test]
async fn test_subcategory_delete_spares_parent_and_reselects_it() {
    let (_store, tracker, react_id, hooks_id) = with_subcategory_selected().await;
    tracker.add_question("nested").await.unwrap();

    let plan = tracker.request_delete_subcategory(&hooks_id).await.unwrap();
    assert_eq!(plan.collateral.len(), 1);
    tracker.confirm_delete(plan).await.unwrap();

    let state = tracker.snapshot().await;
    assert!(state.subcategories.is_empty());
    assert!(state.questions.is_empty());
    assert_eq!(state.categories.len(), 1);
    assert_eq!(state.selection, Some(Selection::category(react_id)));
}

#[tokio::test]
async fn test_subcategory_undo_restores_rows_and_selection() {
    let (_store, tracker, _react_id, hooks_id) = with_subcategory_selected().await;
    tracker.bulk_import("kept\ndone").await.unwrap();

    let before = tracker.snapshot().await;
    let done_id = before
        .questions
        .iter()
        .find(|q| q.title == "done")
        .unwrap()
        .id
        .clone();
    tracker.toggle_completed(&done_id).await.unwrap();
    let before = tracker.snapshot().await;

    let plan = tracker.request_delete_subcategory(&hooks_id).await.unwrap();
    tracker.confirm_delete(plan).await.unwrap();
    assert!(tracker.undo().await);

    let after = tracker.snapshot().await;
    // Original identifiers and flags, not re-created rows.
    assert!(after.subcategories.iter().any(|s| s.id == hooks_id));
    for original in &before.questions {
        let restored = after
            .questions
            .iter()
            .find(|q| q.id == original.id)
            .expect("question restored with its original id");
        assert_eq!(restored.completed, original.completed);
        assert_eq!(restored.title, original.title);
    }
    assert_eq!(after.selection, Some(Selection::subcategory(hooks_id)));
}

#[tokio::test]
async fn test_question_undo_restores_row() {
    let (_store, tracker, _react_id, _hooks_id) = with_subcategory_selected().await;
    tracker.add_question("resurrect me").await.unwrap();
    let original = tracker.snapshot().await.questions[0].clone();

    let plan = tracker.request_delete_question(&original.id).await.unwrap();
    assert!(plan.collateral.is_empty());
    tracker.confirm_delete(plan).await.unwrap();
    assert!(tracker.snapshot().await.questions.is_empty());

    assert!(tracker.undo().await);
    let state = tracker.snapshot().await;
    assert_eq!(state.questions.len(), 1);
    assert_eq!(state.questions[0].id, original.id);
}

#[tokio::test]
async fn test_undo_after_timeout_is_unreachable() {
    let store = Arc::new(MemoryStore::new());
    let lone = store
        .create_category(&NewCategory::new("Lone", "Code2"))
        .await
        .unwrap();

    let tracker = tracker(&store).with_undo_window(Duration::from_millis(40));
    tracker.load_all().await;

    let plan = tracker.request_delete_category(&lone.id).await.unwrap();
    tracker.confirm_delete(plan).await.unwrap();
    assert!(tracker.pending_undo_message().await.is_some());

    tokio::time::sleep(Duration::from_millis(120)).await;
    assert_eq!(tracker.pending_undo_message().await, None);

    let writes = store.write_calls();
    assert!(!tracker.undo().await);
    assert_eq!(store.write_calls(), writes);
    assert!(tracker.snapshot().await.categories.is_empty());
}

#[tokio::test]
async fn test_new_delete_replaces_pending_undo() {
    let store = Arc::new(MemoryStore::new());
    let spring = store
        .create_category(&NewCategory::new("Spring", "SpringBoot"))
        .await
        .unwrap();
    let react = store
        .create_category(&NewCategory::new("React", "ReactIcon"))
        .await
        .unwrap();

    let tracker = tracker(&store);
    tracker.load_all().await;

    let plan = tracker.request_delete_category(&spring.id).await.unwrap();
    tracker.confirm_delete(plan).await.unwrap();
    let plan = tracker.request_delete_category(&react.id).await.unwrap();
    tracker.confirm_delete(plan).await.unwrap();

    // Only the most recent deletion is restorable.
    assert!(tracker.undo().await);
    let state = tracker.snapshot().await;
    assert!(state.categories.iter().any(|c| c.id == react.id));
    assert!(state.categories.iter().all(|c| c.id != spring.id));
    assert!(!tracker.undo().await);
}

#[tokio::test]
async fn test_failed_restore_reports_false_and_keeps_state() {
    let (store, tracker, _react_id, hooks_id) = with_subcategory_selected().await;
    tracker.add_question("gone for good").await.unwrap();

    let plan = tracker.request_delete_subcategory(&hooks_id).await.unwrap();
    tracker.confirm_delete(plan).await.unwrap();
    let after_delete = tracker.snapshot().await;

    store.set_fail_writes(true);
    assert!(!tracker.undo().await);
    store.set_fail_writes(false);

    let state = tracker.snapshot().await;
    assert_eq!(state.subcategories, after_delete.subcategories);
    assert_eq!(state.questions, after_delete.questions);
    // The record was consumed; a second attempt finds nothing.
    assert!(!tracker.undo().await);
}
