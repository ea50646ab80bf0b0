use serde::Serialize;

use crate::domain::types::CategoryId;

/// Top-level category with its nested subcategories, ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryNode {
    pub id: CategoryId,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub is_custom: bool,
    pub subcategories: Vec<SubcategoryNode>,
    pub has_subcategories: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubcategoryNode {
    pub id: CategoryId,
    pub name: String,
    pub icon: String,
    pub is_custom: bool,
    pub parent_id: CategoryId,
}

impl CategoryNode {
    pub fn subcategory(&self, id: &CategoryId) -> Option<&SubcategoryNode> {
        self.subcategories.iter().find(|s| &s.id == id)
    }
}
