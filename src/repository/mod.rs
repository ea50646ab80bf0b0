//! Contract of the remote authority the client synchronizes against.
//!
//! The transport behind these traits is not part of this crate; services are
//! generic over them so they can be exercised with in-memory doubles.

use async_trait::async_trait;

use crate::domain::category::CategoryRecord;
use crate::domain::transaction::{Transaction, TransactionPayload};
use crate::domain::types::TransactionId;

pub mod errors;

pub use errors::{RepositoryError, RepositoryResult};

/// Session state of the current user.
#[async_trait]
pub trait SessionReader: Send + Sync {
    /// Whether remote calls may be issued at all.
    async fn is_authenticated(&self) -> bool;
}

/// Read-only operations for transaction records.
#[async_trait]
pub trait TransactionReader: Send + Sync {
    /// List every transaction visible to the user.
    async fn list_transactions(&self) -> RepositoryResult<Vec<Transaction>>;
    /// Retrieve the canonical copy of a transaction, `None` when it no longer exists.
    async fn get_transaction_by_id(
        &self,
        id: &TransactionId,
    ) -> RepositoryResult<Option<Transaction>>;
}

/// Write operations for transaction records.
#[async_trait]
pub trait TransactionWriter: Send + Sync {
    /// Persist a new transaction; the authority assigns id and timestamps.
    async fn create_transaction(&self, payload: &TransactionPayload)
    -> RepositoryResult<Transaction>;
    /// Replace the editable fields of an existing transaction.
    async fn update_transaction(
        &self,
        id: &TransactionId,
        payload: &TransactionPayload,
    ) -> RepositoryResult<Transaction>;
    /// Delete a transaction by id.
    async fn delete_transaction(&self, id: &TransactionId) -> RepositoryResult<()>;
}

/// Read-only operations for category records.
#[async_trait]
pub trait CategoryReader: Send + Sync {
    /// List all categories and subcategories as a flat list.
    async fn list_categories(&self) -> RepositoryResult<Vec<CategoryRecord>>;
}
