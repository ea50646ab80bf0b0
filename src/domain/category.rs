use serde::{Deserialize, Serialize};

use crate::domain::types::{CategoryId, CategoryName};

/// Flat category record as provided by the remote authority.
///
/// Subcategories are ordinary records carrying a `parent_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryRecord {
    pub id: CategoryId,
    pub name: CategoryName,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub parent_id: Option<CategoryId>,
    pub is_custom: bool,
}

impl CategoryRecord {
    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }
}
