//! Question Entity
//!
//! A study question parented by either a category or a subcategory. The
//! owning category is denormalized into `category_id` at creation time so
//! category-wide filtering never walks the parent chain.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::Entity;

/// Kind of the immediate parent of a question (or of a selection)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParentKind {
    Category,
    Subcategory,
}

impl ParentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParentKind::Category => "category",
            ParentKind::Subcategory => "subcategory",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "subcategory" => ParentKind::Subcategory,
            _ => ParentKind::Category,
        }
    }
}

/// A single study question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier (server-assigned)
    pub id: String,
    /// Denormalized owning category
    pub category_id: String,
    /// Immediate parent
    pub parent_id: String,
    /// Whether the parent is a category or a subcategory
    pub parent_type: ParentKind,
    /// Question text
    pub title: String,
    /// Completion status
    pub completed: bool,
    /// Creation time (server-assigned)
    pub timestamp: DateTime<Utc>,
    /// Owner, when the store tracks one
    pub user_id: Option<String>,
}

impl Question {
    /// Whether this question hangs directly off `parent`
    pub fn has_parent(&self, parent_type: ParentKind, parent_id: &str) -> bool {
        self.parent_type == parent_type && self.parent_id == parent_id
    }
}

impl Entity for Question {
    type Id = String;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Insert payload for a new question
#[derive(Debug, Clone, Serialize)]
pub struct NewQuestion {
    pub title: String,
    pub parent_type: ParentKind,
    pub parent_id: String,
    pub category_id: String,
    pub completed: bool,
}

impl NewQuestion {
    /// Build an insert row for `parent`, with the effective category
    /// already resolved by the caller. New questions start incomplete.
    pub fn for_parent(
        title: impl Into<String>,
        parent_type: ParentKind,
        parent_id: impl Into<String>,
        category_id: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            parent_type,
            parent_id: parent_id.into(),
            category_id: category_id.into(),
            completed: false,
        }
    }
}
