use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::transaction::Transaction;
use crate::domain::types::{
    CategoryId, Recurrence, TransactionAmount, TransactionId, TypeConstraintError,
};

/// Transaction record as serialized by the remote API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionModel {
    pub id: String,
    /// Accepted as a JSON number or a decimal string.
    pub amount: Decimal,
    #[serde(default)]
    pub description: String,
    pub category_id: String,
    #[serde(default)]
    pub subcategory_id: Option<String>,
    pub date: NaiveDateTime,
    #[serde(default)]
    pub recurrence: Option<String>,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub client_reference: Option<String>,
}

impl TryFrom<TransactionModel> for Transaction {
    type Error = TypeConstraintError;

    fn try_from(transaction: TransactionModel) -> Result<Self, Self::Error> {
        Ok(Self {
            // Records coming from the authority are canonical by definition.
            id: TransactionId::permanent(transaction.id)?,
            amount: TransactionAmount::new(transaction.amount)?,
            description: transaction.description,
            category_id: CategoryId::new(transaction.category_id)?,
            subcategory_id: transaction
                .subcategory_id
                .filter(|s| !s.trim().is_empty())
                .map(CategoryId::new)
                .transpose()?,
            date: transaction.date,
            recurrence: transaction
                .recurrence
                .map(Recurrence::try_from)
                .transpose()?
                .unwrap_or_default(),
            created_at: transaction.created_at,
            updated_at: transaction.updated_at,
            client_reference: transaction
                .client_reference
                .map(TransactionId::new)
                .transpose()?,
        })
    }
}

/// Decodes a raw transaction list returned by the remote API.
pub fn decode_transactions(value: &Value) -> Result<Vec<Transaction>, TypeConstraintError> {
    let models: Vec<TransactionModel> = serde_json::from_value(value.clone())
        .map_err(|e| TypeConstraintError::InvalidValue(format!("transactions: {e}")))?;
    models.into_iter().map(TryInto::try_into).collect()
}
