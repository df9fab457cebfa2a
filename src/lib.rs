//! Study-Tracker Data Layer
//!
//! Client-side engine for a study-question tracker: categories,
//! subcategories, and questions mirrored from a remote tabular store,
//! with write-through mutations and a cascading-delete-with-undo flow.
//!
//! Layered architecture:
//! - `domain`: entities and core abstractions
//! - `remote`: store client trait and implementations
//! - `state`: the local view-state mirror and its pure transitions
//! - `app`: the synchronizer driving remote writes and local patches

pub mod app;
pub mod config;
pub mod domain;
pub mod logging;
pub mod remote;
pub mod state;

pub use app::{DeletePlan, DeleteTarget, Tracker};
pub use config::Config;
pub use domain::{
    Category, DomainError, DomainResult, NewCategory, NewQuestion, NewSubcategory, ParentKind,
    Question, Subcategory,
};
pub use remote::{HttpStore, MemoryStore, StoreClient};
pub use state::{Selection, ViewState};
