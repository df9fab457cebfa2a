//! Category Entity
//!
//! Root grouping node. Questions hang off a category either directly or
//! through one of its subcategories.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::Entity;

/// Icon tags the presentation layer knows how to render
pub const AVAILABLE_ICONS: [&str; 4] = ["SpringBoot", "ReactIcon", "Angular", "Code2"];

/// Fallback icon tag for unknown values
pub const DEFAULT_ICON: &str = "Code2";

/// A top-level question group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier (server-assigned)
    pub id: String,
    /// Category name
    pub name: String,
    /// Icon tag, one of [`AVAILABLE_ICONS`]
    pub icon: String,
    /// Creation time (server-assigned)
    pub timestamp: DateTime<Utc>,
    /// Owner, when the store tracks one
    pub user_id: Option<String>,
}

impl Category {
    /// Icon tag with unknown values resolved to [`DEFAULT_ICON`]
    pub fn icon_or_default(&self) -> &str {
        if AVAILABLE_ICONS.contains(&self.icon.as_str()) {
            &self.icon
        } else {
            DEFAULT_ICON
        }
    }
}

impl Entity for Category {
    type Id = String;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Insert payload for a new category; the store assigns id and timestamp
#[derive(Debug, Clone, Serialize)]
pub struct NewCategory {
    pub name: String,
    pub icon: String,
}

impl NewCategory {
    pub fn new(name: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon: icon.into(),
        }
    }
}
