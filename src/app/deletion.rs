//! Cascading Delete + Undo Engine
//!
//! A deletion moves through three stages: **armed** (a [`DeletePlan`]
//! listing the collateral questions, nothing mutated yet), **confirmed**
//! (remote delete of the primary entity, local cascade patch, undo record
//! captured), and **undo-pending** (the record waits on a timer or a
//! user-invoked restore).
//!
//! The undo record lives in a slot tagged with a generation counter. The
//! timer task clears the slot only if its generation still matches;
//! `undo` takes the record under the lock and aborts the timer. Whichever
//! side takes the record first wins, so a double restore cannot happen.
//! Confirming a new deletion replaces the slot and aborts the previous
//! timer: one pending undo at a time.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::domain::{find_by_id, Category, DomainResult, ParentKind, Question, Subcategory};
use crate::remote::StoreClient;
use super::Tracker;

/// Entity a deletion is aimed at
#[derive(Debug, Clone)]
pub enum DeleteTarget {
    Question(Question),
    Category(Category),
    Subcategory(Subcategory),
}

impl DeleteTarget {
    /// Display name for confirmation surfaces
    pub fn name(&self) -> &str {
        match self {
            DeleteTarget::Question(q) => &q.title,
            DeleteTarget::Category(c) => &c.name,
            DeleteTarget::Subcategory(s) => &s.name,
        }
    }

    fn undo_message(&self) -> &'static str {
        match self {
            DeleteTarget::Question(_) => "Question deleted",
            DeleteTarget::Category(_) => "Category and associated questions deleted",
            DeleteTarget::Subcategory(_) => "Subcategory and associated questions deleted",
        }
    }
}

/// An armed deletion awaiting confirmation.
///
/// Dropping the plan cancels the deletion; nothing has been mutated yet.
#[derive(Debug, Clone)]
pub struct DeletePlan {
    pub target: DeleteTarget,
    /// Questions that would be removed alongside the target
    pub collateral: Vec<Question>,
}

/// Snapshot held by a pending undo record
enum DeletedSnapshot {
    Question(Question),
    Category {
        category: Category,
        questions: Vec<Question>,
    },
    Subcategory {
        subcategory: Subcategory,
        questions: Vec<Question>,
    },
}

/// One captured deletion, restorable until its window elapses
pub(crate) struct PendingUndo {
    generation: u64,
    message: String,
    snapshot: DeletedSnapshot,
    timer: JoinHandle<()>,
}

impl<S: StoreClient> Tracker<S> {
    /// Arm a question deletion; `None` when the id is unknown
    pub async fn request_delete_question(&self, id: &str) -> Option<DeletePlan> {
        let state = self.shared().state.lock().await;
        let question = find_by_id(&state.questions, &id.to_string())?.clone();
        Some(DeletePlan {
            target: DeleteTarget::Question(question),
            collateral: Vec::new(),
        })
    }

    /// Arm a category deletion with every question it owns as collateral
    pub async fn request_delete_category(&self, id: &str) -> Option<DeletePlan> {
        let state = self.shared().state.lock().await;
        let category = find_by_id(&state.categories, &id.to_string())?.clone();
        let collateral = state.collateral_for_category(id);
        Some(DeletePlan {
            target: DeleteTarget::Category(category),
            collateral,
        })
    }

    /// Arm a subcategory deletion with its directly parented questions as
    /// collateral
    pub async fn request_delete_subcategory(&self, id: &str) -> Option<DeletePlan> {
        let state = self.shared().state.lock().await;
        let subcategory = find_by_id(&state.subcategories, &id.to_string())?.clone();
        let collateral = state.collateral_for_subcategory(id);
        Some(DeletePlan {
            target: DeleteTarget::Subcategory(subcategory),
            collateral,
        })
    }

    /// Execute a confirmed deletion.
    ///
    /// The remote delete targets the primary entity only; collateral rows
    /// are covered by the store's referential rules and filtered out of
    /// local state regardless. On remote failure nothing changes locally
    /// and the error is returned.
    pub async fn confirm_delete(&self, plan: DeletePlan) -> DomainResult<()> {
        let message = plan.target.undo_message();
        match plan.target {
            DeleteTarget::Question(question) => {
                if let Err(e) = self.store().delete_question(&question.id).await {
                    tracing::error!("question delete failed: {}", e);
                    return Err(e);
                }
                self.shared()
                    .state
                    .lock()
                    .await
                    .apply_question_delete(&question.id);
                self.arm_undo(message, DeletedSnapshot::Question(question))
                    .await;
            }
            DeleteTarget::Category(category) => {
                if let Err(e) = self.store().delete_category(&category.id).await {
                    tracing::error!("category delete failed: {}", e);
                    return Err(e);
                }
                // Collateral is recomputed from the state at confirmation
                // time; the armed set was for display.
                let questions = {
                    let mut state = self.shared().state.lock().await;
                    let questions = state.collateral_for_category(&category.id);
                    state.apply_category_delete(&category.id);
                    questions
                };
                self.arm_undo(message, DeletedSnapshot::Category { category, questions })
                    .await;
            }
            DeleteTarget::Subcategory(subcategory) => {
                if let Err(e) = self.store().delete_subcategory(&subcategory.id).await {
                    tracing::error!("subcategory delete failed: {}", e);
                    return Err(e);
                }
                let questions = {
                    let mut state = self.shared().state.lock().await;
                    let questions = state.collateral_for_subcategory(&subcategory.id);
                    state.apply_subcategory_delete(&subcategory);
                    questions
                };
                self.arm_undo(
                    message,
                    DeletedSnapshot::Subcategory {
                        subcategory,
                        questions,
                    },
                )
                .await;
            }
        }
        Ok(())
    }

    /// Capture an undo record and start its expiry timer, replacing any
    /// record still pending.
    async fn arm_undo(&self, message: &str, snapshot: DeletedSnapshot) {
        let generation = self.shared().generation.fetch_add(1, Ordering::SeqCst) + 1;
        let mut slot = self.shared().undo.lock().await;
        if let Some(previous) = slot.take() {
            previous.timer.abort();
            tracing::debug!("pending undo discarded by a newer deletion");
        }

        let shared = Arc::clone(self.shared());
        let window = self.undo_window();
        let timer = tokio::spawn(async move {
            tokio::time::sleep(window).await;
            let mut slot = shared.undo.lock().await;
            if slot.as_ref().map(|p| p.generation) == Some(generation) {
                *slot = None;
                tracing::info!("undo window elapsed, deletion is permanent");
            }
        });

        *slot = Some(PendingUndo {
            generation,
            message: message.to_string(),
            snapshot,
            timer,
        });
    }

    /// Message of the undo record currently surfaced, if any
    pub async fn pending_undo_message(&self) -> Option<String> {
        self.shared()
            .undo
            .lock()
            .await
            .as_ref()
            .map(|p| p.message.clone())
    }

    /// Restore the most recent deletion, if its window is still open.
    ///
    /// Re-inserts the primary snapshot (original identifier included),
    /// then the collateral questions, reloads everything, and reselects
    /// the resurrected parent. Returns whether a restore happened; a
    /// failed primary re-insert is logged and reported as `false`, local
    /// state stays as it was after the delete.
    pub async fn undo(&self) -> bool {
        let pending = self.shared().undo.lock().await.take();
        let Some(pending) = pending else {
            return false;
        };
        pending.timer.abort();

        match pending.snapshot {
            DeletedSnapshot::Question(question) => {
                if let Err(e) = self
                    .store()
                    .restore_questions(std::slice::from_ref(&question))
                    .await
                {
                    tracing::error!("undo failed, question not restored: {}", e);
                    return false;
                }
                self.load_all().await;
                true
            }
            DeletedSnapshot::Category {
                category,
                questions,
            } => {
                if let Err(e) = self.store().restore_category(&category).await {
                    tracing::error!("undo failed, category not restored: {}", e);
                    return false;
                }
                self.restore_collateral(&questions).await;
                self.load_all().await;
                self.shared()
                    .state
                    .lock()
                    .await
                    .select(ParentKind::Category, category.id);
                true
            }
            DeletedSnapshot::Subcategory {
                subcategory,
                questions,
            } => {
                if let Err(e) = self.store().restore_subcategory(&subcategory).await {
                    tracing::error!("undo failed, subcategory not restored: {}", e);
                    return false;
                }
                self.restore_collateral(&questions).await;
                self.load_all().await;
                self.shared()
                    .state
                    .lock()
                    .await
                    .select(ParentKind::Subcategory, subcategory.id);
                true
            }
        }
    }

    /// Collateral re-insert failures are logged only; the following
    /// reload converges local state on whatever the store accepted.
    async fn restore_collateral(&self, questions: &[Question]) {
        if questions.is_empty() {
            return;
        }
        if let Err(e) = self.store().restore_questions(questions).await {
            tracing::warn!("collateral questions not restored: {}", e);
        }
    }
}
