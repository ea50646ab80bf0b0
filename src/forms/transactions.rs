use chrono::NaiveDateTime;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::transaction::TransactionPayload;
use crate::domain::types::{CategoryId, Recurrence, TransactionAmount, TypeConstraintError};

/// Raw input of the transaction entry form.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TransactionForm {
    /// Decimal text as typed, e.g. `12.50`.
    #[validate(length(min = 1))]
    pub amount: String,
    /// May be left empty; the category label is filled in instead.
    #[serde(default)]
    #[validate(length(max = 255))]
    pub description: String,
    #[validate(length(min = 1))]
    pub category_id: String,
    #[serde(default)]
    pub subcategory_id: Option<String>,
    pub date: NaiveDateTime,
    #[serde(default)]
    pub recurrence: String,
}

#[derive(Debug, Error)]
pub enum TransactionFormError {
    #[error("Transaction form validation failed: {0}")]
    Validation(String),
    #[error("Transaction form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for TransactionFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for TransactionFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<TransactionForm> for TransactionPayload {
    type Error = TransactionFormError;

    fn try_from(value: TransactionForm) -> Result<Self, Self::Error> {
        value.validate()?;

        let subcategory_id = match value.subcategory_id {
            Some(id) if !id.trim().is_empty() => Some(CategoryId::new(id)?),
            _ => None,
        };

        Ok(Self {
            amount: value.amount.parse::<TransactionAmount>()?,
            description: value.description.trim().to_string(),
            category_id: CategoryId::new(value.category_id)?,
            subcategory_id,
            date: value.date,
            recurrence: Recurrence::try_from(value.recurrence.as_str())?,
            client_reference: None,
        })
    }
}
