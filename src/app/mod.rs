//! ViewState Synchronizer
//!
//! [`Tracker`] owns the local mirror of the remote tables and every
//! mutation path against them. The discipline throughout: the remote
//! write must succeed before any local patch is applied, so a failed
//! write never leaves phantom entities behind.

mod deletion;
mod mutations;

#[cfg(test)]
mod tests;

pub use deletion::{DeletePlan, DeleteTarget};

use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::domain::ParentKind;
use crate::remote::StoreClient;
use crate::state::{Selection, ViewState};
use deletion::PendingUndo;

/// Default undo window, matching the surfaced toast lifetime
pub const DEFAULT_UNDO_WINDOW: Duration = Duration::from_secs(30);

/// State shared with the undo timer task
pub(crate) struct Shared {
    pub(crate) state: Mutex<ViewState>,
    pub(crate) undo: Mutex<Option<PendingUndo>>,
    pub(crate) generation: AtomicU64,
}

/// The view-state synchronizer
pub struct Tracker<S: StoreClient> {
    store: Arc<S>,
    shared: Arc<Shared>,
    undo_window: Duration,
}

impl<S: StoreClient> Tracker<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            shared: Arc::new(Shared {
                state: Mutex::new(ViewState::new()),
                undo: Mutex::new(None),
                generation: AtomicU64::new(0),
            }),
            undo_window: DEFAULT_UNDO_WINDOW,
        }
    }

    pub fn with_undo_window(mut self, window: Duration) -> Self {
        self.undo_window = window;
        self
    }

    pub(crate) fn store(&self) -> &S {
        &self.store
    }

    pub(crate) fn shared(&self) -> &Arc<Shared> {
        &self.shared
    }

    pub(crate) fn undo_window(&self) -> Duration {
        self.undo_window
    }

    /// Fetch all three collections and overwrite the local mirror.
    ///
    /// The three reads run concurrently; each collection that loads
    /// overwrites its local counterpart unconditionally (last fetch
    /// wins), a failed one is logged and left as it was. On the first
    /// successful load the selection defaults to the newest category.
    pub async fn load_all(&self) {
        let (categories, subcategories, questions) = tokio::join!(
            self.store.list_categories(),
            self.store.list_subcategories(),
            self.store.list_questions(),
        );

        let mut state = self.shared.state.lock().await;
        match categories {
            Ok(rows) => state.categories = rows,
            Err(e) => tracing::error!("loading categories failed: {}", e),
        }
        match subcategories {
            Ok(rows) => state.subcategories = rows,
            Err(e) => tracing::error!("loading subcategories failed: {}", e),
        }
        match questions {
            Ok(rows) => state.questions = rows,
            Err(e) => tracing::error!("loading questions failed: {}", e),
        }

        if state.selection.is_none() {
            let newest = state.categories.first().map(|c| c.id.clone());
            if let Some(id) = newest {
                state.selection = Some(Selection::category(id));
            }
        }
    }

    /// Clone of the current view-state
    pub async fn snapshot(&self) -> ViewState {
        self.shared.state.lock().await.clone()
    }

    pub async fn selection(&self) -> Option<Selection> {
        self.shared.state.lock().await.selection.clone()
    }

    /// `(completed, total)` for the active selection
    pub async fn progress(&self) -> (usize, usize) {
        self.shared.state.lock().await.progress()
    }

    pub async fn parent_name(&self) -> Option<String> {
        self.shared
            .state
            .lock()
            .await
            .parent_name()
            .map(str::to_string)
    }

    /// Switch the active selection; local-only, no remote call
    pub async fn select(&self, kind: ParentKind, id: &str) {
        self.shared.state.lock().await.select(kind, id);
    }

    /// Fold or unfold a category in the tree; local-only
    pub async fn toggle_expanded(&self, category_id: &str) {
        self.shared.state.lock().await.toggle_expanded(category_id);
    }
}
