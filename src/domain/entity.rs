//! Domain Layer - Core Entity Trait
//!
//! This trait defines the basic contract for all domain entities.
//! All entities carry a server-assigned string identifier.

/// Core trait for all domain entities
pub trait Entity: Sized + Send + Sync + Clone {
    /// The type of the entity's unique identifier
    type Id: Clone + Eq + std::hash::Hash + Send + Sync;

    /// Returns the entity's unique identifier
    fn id(&self) -> &Self::Id;
}

/// Find an entity in a collection by its identifier
pub fn find_by_id<'a, T: Entity>(rows: &'a [T], id: &T::Id) -> Option<&'a T> {
    rows.iter().find(|row| row.id() == id)
}

/// Remove an entity from a collection by its identifier.
///
/// Returns whether a matching row was present.
pub fn remove_by_id<T: Entity>(rows: &mut Vec<T>, id: &T::Id) -> bool {
    let before = rows.len();
    rows.retain(|row| row.id() != id);
    rows.len() != before
}

/// Common result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level errors
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Remote request failed (network, status, or decode)
    Remote(String),
    /// A lookup needed before a remote call yielded nothing
    MissingReference(String),
    /// Configuration could not be loaded or is invalid
    Config(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainError::Remote(msg) => write!(f, "Remote store error: {}", msg),
            DomainError::MissingReference(msg) => write!(f, "Missing reference: {}", msg),
            DomainError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}
