use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::types::{CategoryId, Recurrence, TransactionAmount, TransactionId};

/// A single income or expense entry as held in the local collection.
///
/// Dates are wall-clock values in the device's calendar.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: TransactionId,
    pub amount: TransactionAmount,
    pub description: String,
    pub category_id: CategoryId,
    pub subcategory_id: Option<CategoryId>,
    pub date: NaiveDateTime,
    pub recurrence: Recurrence,
    pub created_at: NaiveDateTime,
    /// Present only once the record has been edited at least once.
    pub updated_at: Option<NaiveDateTime>,
    /// Temporary identifier the record was created under, when the authority
    /// echoes it back.
    pub client_reference: Option<TransactionId>,
}

impl Transaction {
    /// Builds the speculative record inserted before the authority answers.
    pub fn speculative(id: TransactionId, payload: &TransactionPayload, now: NaiveDateTime) -> Self {
        Self {
            client_reference: Some(id.clone()),
            id,
            amount: payload.amount,
            description: payload.description.clone(),
            category_id: payload.category_id.clone(),
            subcategory_id: payload.subcategory_id.clone(),
            date: payload.date,
            recurrence: payload.recurrence,
            created_at: now,
            updated_at: None,
        }
    }

    /// Copies the editable fields of `payload` onto this record.
    pub fn apply(&mut self, payload: &TransactionPayload, now: NaiveDateTime) {
        self.amount = payload.amount;
        self.description = payload.description.clone();
        self.category_id = payload.category_id.clone();
        self.subcategory_id = payload.subcategory_id.clone();
        self.date = payload.date;
        self.recurrence = payload.recurrence;
        self.updated_at = Some(now);
    }

    /// Timestamp of the latest known revision of this record.
    pub fn revision_stamp(&self) -> NaiveDateTime {
        self.updated_at.unwrap_or(self.created_at)
    }

    /// Whether the record falls on the given calendar day.
    pub fn occurs_on(&self, day: NaiveDate) -> bool {
        self.date.date() == day
    }
}

/// Body of a create or update request. The authority assigns identifiers and
/// timestamps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionPayload {
    pub amount: TransactionAmount,
    pub description: String,
    pub category_id: CategoryId,
    pub subcategory_id: Option<CategoryId>,
    pub date: NaiveDateTime,
    pub recurrence: Recurrence,
    /// Client-generated reference the authority may echo back on create.
    pub client_reference: Option<TransactionId>,
}

impl From<&Transaction> for TransactionPayload {
    fn from(value: &Transaction) -> Self {
        Self {
            amount: value.amount,
            description: value.description.clone(),
            category_id: value.category_id.clone(),
            subcategory_id: value.subcategory_id.clone(),
            date: value.date,
            recurrence: value.recurrence,
            client_reference: None,
        }
    }
}
