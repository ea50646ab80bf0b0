use crate::domain::edit_session::EditSession;
use crate::domain::transaction::Transaction;
use crate::domain::types::TransactionId;
use crate::repository::{SessionReader, TransactionReader};
use crate::store::LocalStore;

use super::{ServiceError, ServiceResult, ensure_authenticated};

/// Record opened for editing.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenedEdit {
    pub record: Transaction,
    /// The authority could not be reached; `record` is the cached copy.
    pub stale: bool,
}

/// Opens `id` for editing.
///
/// The canonical copy is always fetched from the remote authority. When the
/// authority is unreachable the cached copy is used and flagged stale. A
/// record the authority no longer knows leaves the session empty.
pub async fn begin_edit<R>(
    id: &TransactionId,
    store: &LocalStore,
    repo: &R,
) -> ServiceResult<OpenedEdit>
where
    R: SessionReader + TransactionReader,
{
    ensure_authenticated(store, repo).await?;

    if id.is_temporary() {
        return Err(ServiceError::Pending);
    }
    if store.is_in_flight(id) {
        return Err(ServiceError::Busy);
    }

    match repo.get_transaction_by_id(id).await {
        Ok(Some(fresh)) => store.write(|state| {
            if state.is_in_flight(id) {
                return Err(ServiceError::Busy);
            }
            let record = match state.position(id) {
                Some(index) => {
                    let cached = &state.transactions[index];
                    if cached.revision_stamp() > fresh.revision_stamp() {
                        log::warn!("Authority returned an older revision of {id}; keeping local copy");
                        cached.clone()
                    } else {
                        state.transactions[index] = fresh.clone();
                        state.touch();
                        fresh
                    }
                }
                None => {
                    // Saving goes through the local collection, so the record
                    // must be present there.
                    state.transactions.push(fresh.clone());
                    state.touch();
                    fresh
                }
            };
            state.edit_session = EditSession::editing(record.clone(), false);
            Ok(OpenedEdit {
                record,
                stale: false,
            })
        }),
        Ok(None) => {
            log::info!("Transaction {id} no longer exists remotely");
            store.write(|state| state.edit_session = EditSession::Idle);
            Err(ServiceError::NotFound)
        }
        Err(e) => {
            let fallback = store.settings().stale_edit_fallback;
            store.write(|state| match state.find(id).cloned() {
                Some(cached) if fallback => {
                    log::warn!("Failed to fetch transaction {id}, editing cached copy: {e}");
                    state.edit_session = EditSession::editing(cached.clone(), true);
                    Ok(OpenedEdit {
                        record: cached,
                        stale: true,
                    })
                }
                _ => {
                    log::error!("Failed to fetch transaction {id}: {e}");
                    state.edit_session = EditSession::Idle;
                    Err(e.into())
                }
            })
        }
    }
}

/// Record currently open for editing, if any.
pub fn current_edit(store: &LocalStore) -> Option<Transaction> {
    store.edit_session().snapshot().cloned()
}

/// Abandons the current edit.
pub fn cancel_edit(store: &LocalStore) {
    store.write(|state| state.edit_session = EditSession::Idle);
}

/// Ends the current edit after a successful save.
pub fn clear_after_save(store: &LocalStore) {
    store.write(|state| state.edit_session = EditSession::Idle);
}
