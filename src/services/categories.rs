use std::collections::HashMap;

use crate::domain::category::CategoryRecord;
use crate::domain::types::{CategoryId, CategoryName};
use crate::dto::categories::{CategoryNode, SubcategoryNode};
use crate::repository::{CategoryReader, RepositoryError, SessionReader};
use crate::settings::{ClientSettings, DEFAULT_CATEGORY_COLOR, DEFAULT_CATEGORY_ICON};
use crate::store::LocalStore;

use super::{ServiceResult, ensure_authenticated};

/// Tokens applied to records the backend sent without icon or color.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryStyle {
    pub icon: String,
    pub color: String,
}

impl Default for CategoryStyle {
    fn default() -> Self {
        Self {
            icon: DEFAULT_CATEGORY_ICON.to_string(),
            color: DEFAULT_CATEGORY_COLOR.to_string(),
        }
    }
}

impl From<&ClientSettings> for CategoryStyle {
    fn from(settings: &ClientSettings) -> Self {
        Self {
            icon: settings.fallback_icon.clone(),
            color: settings.fallback_color.clone(),
        }
    }
}

/// Builds the two-level category tree using the default fallback style.
pub fn build_hierarchy(records: &[CategoryRecord]) -> Vec<CategoryNode> {
    build_hierarchy_with(records, &CategoryStyle::default())
}

/// Builds the two-level category tree from flat records.
///
/// Only parentless records become top-level nodes, sorted by name ignoring
/// case. Subcategories keep the order they were received in. A record whose
/// parent is not a top-level record is dropped.
pub fn build_hierarchy_with(records: &[CategoryRecord], style: &CategoryStyle) -> Vec<CategoryNode> {
    let mut children: HashMap<&CategoryId, Vec<SubcategoryNode>> = HashMap::new();
    for record in records {
        if let Some(parent_id) = &record.parent_id {
            children.entry(parent_id).or_default().push(SubcategoryNode {
                id: record.id.clone(),
                name: record.name.to_string(),
                icon: record.icon.clone().unwrap_or_else(|| style.icon.clone()),
                is_custom: record.is_custom,
                parent_id: parent_id.clone(),
            });
        }
    }

    let mut nodes: Vec<CategoryNode> = records
        .iter()
        .filter(|r| r.is_top_level())
        .map(|record| {
            let subcategories = children.remove(&record.id).unwrap_or_default();
            CategoryNode {
                id: record.id.clone(),
                name: record.name.to_string(),
                icon: record.icon.clone().unwrap_or_else(|| style.icon.clone()),
                color: record.color.clone().unwrap_or_else(|| style.color.clone()),
                is_custom: record.is_custom,
                has_subcategories: !subcategories.is_empty(),
                subcategories,
            }
        })
        .collect();

    for orphans in children.values() {
        for orphan in orphans {
            log::debug!(
                "Dropping subcategory '{}' with unknown parent '{}'",
                orphan.id,
                orphan.parent_id
            );
        }
    }

    // Case-folded code point order, not a locale collation: accented names
    // such as "Éducation" sort after "Zoo".
    nodes.sort_by_cached_key(|n| (n.name.to_lowercase(), n.name.clone()));
    nodes
}

/// Turns a tree back into the flat shape the backend uses.
pub fn flatten_hierarchy(nodes: &[CategoryNode]) -> Vec<CategoryRecord> {
    let mut records = Vec::new();
    for node in nodes {
        let Ok(name) = CategoryName::new(node.name.as_str()) else {
            continue;
        };
        records.push(CategoryRecord {
            id: node.id.clone(),
            name,
            icon: Some(node.icon.clone()),
            color: Some(node.color.clone()),
            parent_id: None,
            is_custom: node.is_custom,
        });
        for sub in &node.subcategories {
            let Ok(name) = CategoryName::new(sub.name.as_str()) else {
                continue;
            };
            records.push(CategoryRecord {
                id: sub.id.clone(),
                name,
                icon: Some(sub.icon.clone()),
                color: None,
                parent_id: Some(node.id.clone()),
                is_custom: sub.is_custom,
            });
        }
    }
    records
}

/// Display label derived from a category selection: the subcategory name
/// when one is selected and known, otherwise the category name.
pub fn find_label(
    hierarchy: &[CategoryNode],
    category_id: &CategoryId,
    subcategory_id: Option<&CategoryId>,
) -> Option<String> {
    let node = hierarchy.iter().find(|n| &n.id == category_id)?;
    match subcategory_id.and_then(|id| node.subcategory(id)) {
        Some(sub) => Some(sub.name.clone()),
        None => Some(node.name.clone()),
    }
}

/// Reloads categories from the remote authority and rebuilds the hierarchy.
///
/// A malformed payload leaves an empty hierarchy; any other failure keeps the
/// previous one and is reported. Returns the number of top-level nodes.
pub async fn reload_categories<R>(store: &LocalStore, repo: &R) -> ServiceResult<usize>
where
    R: SessionReader + CategoryReader,
{
    ensure_authenticated(store, repo).await?;

    let records = match repo.list_categories().await {
        Ok(records) => records,
        Err(RepositoryError::Malformed(e)) => {
            log::warn!("Malformed category data, showing no categories: {e}");
            Vec::new()
        }
        Err(e) => {
            log::error!("Failed to list categories: {e}");
            return Err(e.into());
        }
    };

    let hierarchy = build_hierarchy_with(&records, &store.category_style());
    let count = hierarchy.len();
    store.write(|state| state.hierarchy = hierarchy);
    Ok(count)
}
