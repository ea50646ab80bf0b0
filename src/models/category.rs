use serde::Deserialize;
use serde_json::Value;

use crate::domain::category::CategoryRecord;
use crate::domain::types::{CategoryId, CategoryName, TypeConstraintError};

/// Category record as serialized by the remote API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryModel {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub is_custom: bool,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl TryFrom<CategoryModel> for CategoryRecord {
    type Error = TypeConstraintError;

    fn try_from(category: CategoryModel) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CategoryId::new(category.id)?,
            name: CategoryName::new(category.name)?,
            icon: non_blank(category.icon),
            color: non_blank(category.color),
            // Some backends send an empty string instead of null.
            parent_id: non_blank(category.parent_id)
                .map(CategoryId::new)
                .transpose()?,
            is_custom: category.is_custom,
        })
    }
}

/// Decodes a raw category payload.
///
/// Anything other than an array of well-formed records yields an empty list:
/// callers treat that as "no categories available", never as a failure.
pub fn decode_categories(value: &Value) -> Vec<CategoryRecord> {
    if !value.is_array() {
        log::warn!("Category payload is not an array; treating as empty");
        return Vec::new();
    }

    let models: Vec<CategoryModel> = match serde_json::from_value(value.clone()) {
        Ok(models) => models,
        Err(e) => {
            log::warn!("Malformed category payload: {e}");
            return Vec::new();
        }
    };

    match models
        .into_iter()
        .map(TryInto::try_into)
        .collect::<Result<Vec<CategoryRecord>, _>>()
    {
        Ok(records) => records,
        Err(e) => {
            log::warn!("Category payload contains invalid data: {e}");
            Vec::new()
        }
    }
}
