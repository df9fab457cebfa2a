//! Remote Store Layer - Core Trait
//!
//! Defines the abstract interface for the remote tabular store.
//! Implementations can use a hosted REST store, in-memory tables, etc.
//!
//! Four operation kinds over three tables: ordered select, insert (single
//! or batch, returning generated rows where the caller needs them),
//! targeted update-by-identifier, and delete-by-identifier. Restores are
//! inserts of full row snapshots, original identifiers included.

use async_trait::async_trait;

use crate::domain::{
    Category, DomainResult, NewCategory, NewQuestion, NewSubcategory, Question, Subcategory,
};

/// Client for the remote tabular store
///
/// All operations are async request/response calls. Every method either
/// succeeds fully or reports an error; there are no partial-success
/// payloads.
#[async_trait]
pub trait StoreClient: Send + Sync {
    /// All categories, newest first
    async fn list_categories(&self) -> DomainResult<Vec<Category>>;

    /// All subcategories, newest first
    async fn list_subcategories(&self) -> DomainResult<Vec<Subcategory>>;

    /// All questions, newest first
    async fn list_questions(&self) -> DomainResult<Vec<Question>>;

    /// Insert a category, returning the stored row
    async fn create_category(&self, row: &NewCategory) -> DomainResult<Category>;

    /// Insert a subcategory, returning the stored row
    async fn create_subcategory(&self, row: &NewSubcategory) -> DomainResult<Subcategory>;

    /// Insert one or more questions in a single batch
    async fn create_questions(&self, rows: &[NewQuestion]) -> DomainResult<()>;

    /// Targeted update of a question's completed flag
    async fn set_question_completed(&self, id: &str, completed: bool) -> DomainResult<()>;

    /// Delete a category by identifier
    async fn delete_category(&self, id: &str) -> DomainResult<()>;

    /// Delete a subcategory by identifier
    async fn delete_subcategory(&self, id: &str) -> DomainResult<()>;

    /// Delete a question by identifier
    async fn delete_question(&self, id: &str) -> DomainResult<()>;

    /// Re-insert a category snapshot, original identifier included
    async fn restore_category(&self, row: &Category) -> DomainResult<()>;

    /// Re-insert a subcategory snapshot, original identifier included
    async fn restore_subcategory(&self, row: &Subcategory) -> DomainResult<()>;

    /// Re-insert question snapshots, original identifiers included
    async fn restore_questions(&self, rows: &[Question]) -> DomainResult<()>;
}
