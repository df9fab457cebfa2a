//! Mutation Operations
//!
//! Create and update paths. Each operation performs the remote write
//! first and applies the local patch only on success; remote failures are
//! logged and surfaced without retry, precondition failures abort before
//! any remote call and report `Ok(false)` / `Ok(0)`.

use crate::domain::{find_by_id, DomainResult, NewCategory, NewQuestion, NewSubcategory};
use crate::remote::StoreClient;
use crate::state::Selection;
use super::Tracker;

impl<S: StoreClient> Tracker<S> {
    /// Resolve the active selection and its effective category
    async fn resolve_parent(&self) -> Option<(Selection, String)> {
        let state = self.shared().state.lock().await;
        let selection = state.selection.clone()?;
        let category_id = state.resolve_category_id()?;
        Some((selection, category_id))
    }

    /// Create one question under the active selection.
    ///
    /// Returns `Ok(false)` when the title is blank or no owning category
    /// can be resolved. Reloads everything on success to pick up the
    /// server-assigned fields.
    pub async fn add_question(&self, title: &str) -> DomainResult<bool> {
        let title = title.trim();
        if title.is_empty() {
            return Ok(false);
        }

        let Some((selection, category_id)) = self.resolve_parent().await else {
            tracing::warn!("no resolvable category for new question");
            return Ok(false);
        };

        let row = NewQuestion::for_parent(title, selection.kind, selection.id, category_id);
        if let Err(e) = self.store().create_questions(std::slice::from_ref(&row)).await {
            tracing::error!("adding question failed: {}", e);
            return Err(e);
        }

        self.load_all().await;
        Ok(true)
    }

    /// Create one question per non-empty line of `text`, all under the
    /// active selection, as a single batch insert.
    ///
    /// Returns the number of questions created; `Ok(0)` when nothing
    /// survives trimming or no owning category can be resolved.
    pub async fn bulk_import(&self, text: &str) -> DomainResult<usize> {
        let titles: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if titles.is_empty() {
            return Ok(0);
        }

        let Some((selection, category_id)) = self.resolve_parent().await else {
            tracing::warn!("no resolvable category for bulk import");
            return Ok(0);
        };

        let rows: Vec<NewQuestion> = titles
            .iter()
            .map(|title| {
                NewQuestion::for_parent(
                    *title,
                    selection.kind,
                    selection.id.clone(),
                    category_id.clone(),
                )
            })
            .collect();

        if let Err(e) = self.store().create_questions(&rows).await {
            tracing::error!("bulk import failed: {}", e);
            return Err(e);
        }

        self.load_all().await;
        Ok(rows.len())
    }

    /// Create a category and make it the active selection.
    ///
    /// The returned row is prepended locally; no reload.
    pub async fn add_category(&self, name: &str, icon: &str) -> DomainResult<bool> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(false);
        }

        let created = match self
            .store()
            .create_category(&NewCategory::new(name, icon))
            .await
        {
            Ok(row) => row,
            Err(e) => {
                tracing::error!("adding category failed: {}", e);
                return Err(e);
            }
        };

        let mut state = self.shared().state.lock().await;
        state.selection = Some(Selection::category(created.id.clone()));
        state.prepend_category(created);
        Ok(true)
    }

    /// Create a subcategory under `category_id`, select it, and unfold
    /// its parent in the tree.
    pub async fn add_subcategory(&self, name: &str, category_id: &str) -> DomainResult<bool> {
        let name = name.trim();
        if name.is_empty() || category_id.is_empty() {
            return Ok(false);
        }

        let created = match self
            .store()
            .create_subcategory(&NewSubcategory::new(name, category_id))
            .await
        {
            Ok(row) => row,
            Err(e) => {
                tracing::error!("adding subcategory failed: {}", e);
                return Err(e);
            }
        };

        let mut state = self.shared().state.lock().await;
        state.selection = Some(Selection::subcategory(created.id.clone()));
        state.expanded.insert(created.category_id.clone());
        state.prepend_subcategory(created);
        Ok(true)
    }

    /// Flip one question's completed flag via a targeted update.
    ///
    /// Patches the single record locally on success; unknown ids abort
    /// with `Ok(false)`.
    pub async fn toggle_completed(&self, id: &str) -> DomainResult<bool> {
        let next = {
            let state = self.shared().state.lock().await;
            find_by_id(&state.questions, &id.to_string()).map(|q| !q.completed)
        };
        let Some(next) = next else {
            return Ok(false);
        };

        if let Err(e) = self.store().set_question_completed(id, next).await {
            tracing::error!("toggling question failed: {}", e);
            return Err(e);
        }

        self.shared()
            .state
            .lock()
            .await
            .set_question_completed(id, next);
        Ok(true)
    }
}
