//! View-State Container
//!
//! The three mirrored collections plus the selection and expansion state
//! a presentation layer needs, with pure transition helpers. Every
//! mutation here is a deterministic step over the current state; remote
//! confirmation happens before any of these run.

use std::collections::HashSet;

use serde::Serialize;

use crate::domain::{find_by_id, Category, ParentKind, Question, Subcategory};

/// The currently displayed parent (category or subcategory)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub kind: ParentKind,
    pub id: String,
}

impl Selection {
    pub fn category(id: impl Into<String>) -> Self {
        Self {
            kind: ParentKind::Category,
            id: id.into(),
        }
    }

    pub fn subcategory(id: impl Into<String>) -> Self {
        Self {
            kind: ParentKind::Subcategory,
            id: id.into(),
        }
    }
}

/// Local mirror of the remote tables plus UI-facing selection state
#[derive(Debug, Clone, Default, Serialize)]
pub struct ViewState {
    pub categories: Vec<Category>,
    pub subcategories: Vec<Subcategory>,
    pub questions: Vec<Question>,
    /// Active parent whose questions are listed
    pub selection: Option<Selection>,
    /// Categories whose subcategory list is unfolded
    pub expanded: HashSet<String>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, kind: ParentKind, id: impl Into<String>) {
        self.selection = Some(Selection {
            kind,
            id: id.into(),
        });
    }

    pub fn toggle_expanded(&mut self, category_id: &str) {
        if !self.expanded.remove(category_id) {
            self.expanded.insert(category_id.to_string());
        }
    }

    /// Effective owning category of the active selection.
    ///
    /// A category selection resolves to itself; a subcategory selection
    /// resolves through the local subcategory list and yields `None` when
    /// that row is gone.
    pub fn resolve_category_id(&self) -> Option<String> {
        match &self.selection {
            None => None,
            Some(selection) => match selection.kind {
                ParentKind::Category => Some(selection.id.clone()),
                ParentKind::Subcategory => find_by_id(&self.subcategories, &selection.id)
                    .map(|s| s.category_id.clone()),
            },
        }
    }

    /// Questions parented directly by the active selection
    pub fn questions_for_selection(&self) -> Vec<&Question> {
        match &self.selection {
            None => Vec::new(),
            Some(selection) => self
                .questions
                .iter()
                .filter(|q| q.has_parent(selection.kind, &selection.id))
                .collect(),
        }
    }

    /// `(completed, total)` for the active selection
    pub fn progress(&self) -> (usize, usize) {
        let listed = self.questions_for_selection();
        let completed = listed.iter().filter(|q| q.completed).count();
        (completed, listed.len())
    }

    /// Display name of the active selection
    pub fn parent_name(&self) -> Option<&str> {
        match &self.selection {
            None => None,
            Some(selection) => match selection.kind {
                ParentKind::Category => {
                    find_by_id(&self.categories, &selection.id).map(|c| c.name.as_str())
                }
                ParentKind::Subcategory => {
                    find_by_id(&self.subcategories, &selection.id).map(|s| s.name.as_str())
                }
            },
        }
    }

    /// Questions a category deletion would take with it
    pub fn collateral_for_category(&self, category_id: &str) -> Vec<Question> {
        self.questions
            .iter()
            .filter(|q| q.category_id == category_id)
            .cloned()
            .collect()
    }

    /// Questions a subcategory deletion would take with it
    pub fn collateral_for_subcategory(&self, subcategory_id: &str) -> Vec<Question> {
        self.questions
            .iter()
            .filter(|q| q.has_parent(ParentKind::Subcategory, subcategory_id))
            .cloned()
            .collect()
    }

    // Patch steps, applied only after the corresponding remote write
    // succeeded.

    pub fn prepend_category(&mut self, category: Category) {
        self.categories.insert(0, category);
    }

    pub fn prepend_subcategory(&mut self, subcategory: Subcategory) {
        self.subcategories.insert(0, subcategory);
    }

    pub fn set_question_completed(&mut self, id: &str, completed: bool) {
        if let Some(question) = self.questions.iter_mut().find(|q| q.id == id) {
            question.completed = completed;
        }
    }

    pub fn apply_question_delete(&mut self, id: &str) {
        self.questions.retain(|q| q.id != id);
    }

    /// Remove a category, its subcategories, and every question owned by
    /// it, then repair the selection.
    ///
    /// A selection pointing at the category, or at one of the removed
    /// subcategories, moves to the first remaining category.
    pub fn apply_category_delete(&mut self, id: &str) {
        let removed_subcategories: HashSet<String> = self
            .subcategories
            .iter()
            .filter(|s| s.category_id == id)
            .map(|s| s.id.clone())
            .collect();

        self.categories.retain(|c| c.id != id);
        self.subcategories.retain(|s| s.category_id != id);
        self.questions.retain(|q| q.category_id != id);
        self.expanded.remove(id);

        let orphaned = match &self.selection {
            None => false,
            Some(selection) => match selection.kind {
                ParentKind::Category => selection.id == id,
                ParentKind::Subcategory => removed_subcategories.contains(&selection.id),
            },
        };
        if orphaned {
            self.selection = self
                .categories
                .first()
                .map(|c| Selection::category(c.id.clone()));
        }
    }

    /// Remove a subcategory and its questions; a selection pointing at it
    /// falls back to the parent category.
    pub fn apply_subcategory_delete(&mut self, subcategory: &Subcategory) {
        self.subcategories.retain(|s| s.id != subcategory.id);
        self.questions
            .retain(|q| !q.has_parent(ParentKind::Subcategory, &subcategory.id));

        let was_selected = self
            .selection
            .as_ref()
            .map(|s| s.kind == ParentKind::Subcategory && s.id == subcategory.id)
            .unwrap_or(false);
        if was_selected {
            self.selection = Some(Selection::category(subcategory.category_id.clone()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn category(id: &str, name: &str) -> Category {
        Category {
            id: id.to_string(),
            name: name.to_string(),
            icon: "Code2".to_string(),
            timestamp: Utc::now(),
            user_id: None,
        }
    }

    fn subcategory(id: &str, category_id: &str) -> Subcategory {
        Subcategory {
            id: id.to_string(),
            name: format!("sub {}", id),
            category_id: category_id.to_string(),
            timestamp: Utc::now(),
        }
    }

    fn question(id: &str, kind: ParentKind, parent_id: &str, category_id: &str) -> Question {
        Question {
            id: id.to_string(),
            category_id: category_id.to_string(),
            parent_id: parent_id.to_string(),
            parent_type: kind,
            title: format!("question {}", id),
            completed: false,
            timestamp: Utc::now(),
            user_id: None,
        }
    }

    fn sample() -> ViewState {
        let mut state = ViewState::new();
        state.categories = vec![category("c1", "Spring"), category("c2", "React")];
        state.subcategories = vec![subcategory("s1", "c1"), subcategory("s2", "c2")];
        state.questions = vec![
            question("q1", ParentKind::Category, "c1", "c1"),
            question("q2", ParentKind::Subcategory, "s1", "c1"),
            question("q3", ParentKind::Subcategory, "s2", "c2"),
        ];
        state
    }

    #[test]
    fn test_toggle_expanded_roundtrip() {
        let mut state = ViewState::new();
        state.toggle_expanded("c1");
        assert!(state.expanded.contains("c1"));
        state.toggle_expanded("c1");
        assert!(!state.expanded.contains("c1"));
    }

    #[test]
    fn test_resolution_through_subcategory() {
        let mut state = sample();
        state.select(ParentKind::Subcategory, "s1");
        assert_eq!(state.resolve_category_id().as_deref(), Some("c1"));
    }

    #[test]
    fn test_resolution_fails_for_missing_subcategory() {
        let mut state = sample();
        state.select(ParentKind::Subcategory, "gone");
        assert_eq!(state.resolve_category_id(), None);
    }

    #[test]
    fn test_progress_counts_only_selected_parent() {
        let mut state = sample();
        state.questions[1].completed = true;
        state.select(ParentKind::Subcategory, "s1");
        assert_eq!(state.progress(), (1, 1));
        state.select(ParentKind::Category, "c1");
        assert_eq!(state.progress(), (0, 1));
    }

    #[test]
    fn test_category_delete_patch_cascades_and_repairs_selection() {
        let mut state = sample();
        state.select(ParentKind::Subcategory, "s1");
        state.apply_category_delete("c1");

        assert_eq!(state.categories.len(), 1);
        assert!(state.subcategories.iter().all(|s| s.category_id != "c1"));
        assert!(state.questions.iter().all(|q| q.category_id != "c1"));
        assert_eq!(state.selection, Some(Selection::category("c2")));
    }

    #[test]
    fn test_category_delete_leaves_unrelated_selection() {
        let mut state = sample();
        state.select(ParentKind::Category, "c2");
        state.apply_category_delete("c1");
        assert_eq!(state.selection, Some(Selection::category("c2")));
    }

    #[test]
    fn test_last_category_delete_clears_selection() {
        let mut state = sample();
        state.select(ParentKind::Category, "c1");
        state.apply_category_delete("c2");
        state.apply_category_delete("c1");
        assert_eq!(state.selection, None);
    }

    #[test]
    fn test_subcategory_delete_falls_back_to_parent() {
        let mut state = sample();
        state.select(ParentKind::Subcategory, "s1");
        let subcategory = state.subcategories[0].clone();
        state.apply_subcategory_delete(&subcategory);

        assert_eq!(state.selection, Some(Selection::category("c1")));
        assert!(state.questions.iter().all(|q| q.id != "q2"));
        // The direct question and the parent category survive.
        assert!(state.questions.iter().any(|q| q.id == "q1"));
        assert_eq!(state.categories.len(), 2);
    }
}
