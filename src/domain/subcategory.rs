//! Subcategory Entity
//!
//! Second-level grouping. Every subcategory belongs to exactly one
//! category.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::Entity;

/// A question group nested under a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subcategory {
    /// Unique identifier (server-assigned)
    pub id: String,
    /// Subcategory name
    pub name: String,
    /// Owning category
    pub category_id: String,
    /// Creation time (server-assigned)
    pub timestamp: DateTime<Utc>,
}

impl Entity for Subcategory {
    type Id = String;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Insert payload for a new subcategory
#[derive(Debug, Clone, Serialize)]
pub struct NewSubcategory {
    pub name: String,
    pub category_id: String,
}

impl NewSubcategory {
    pub fn new(name: impl Into<String>, category_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category_id: category_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_deserialization() {
        let row = serde_json::json!({
            "id": "s1",
            "name": "Hooks",
            "category_id": "c1",
            "timestamp": "2024-03-01T10:30:00Z"
        });
        let subcategory: Subcategory = serde_json::from_value(row).unwrap();
        assert_eq!(subcategory.category_id, "c1");
        assert_eq!(subcategory.name, "Hooks");
    }
}
