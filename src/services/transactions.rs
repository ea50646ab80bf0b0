//! Optimistic mutations of the local transaction collection.
//!
//! Every mutation is applied locally first, then sent to the remote
//! authority. A confirmed result replaces the speculative record; a failure
//! restores the state from before the mutation. Each mutation carries a
//! per-identifier generation so that a late answer to a superseded request
//! neither reconciles nor rolls back over newer state.

use chrono::{Local, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use crate::domain::edit_session::EditSession;
use crate::domain::transaction::{Transaction, TransactionPayload};
use crate::domain::types::TransactionId;
use crate::repository::{RepositoryError, SessionReader, TransactionReader, TransactionWriter};
use crate::store::{LocalStore, StoreState};

use super::{ServiceError, ServiceResult, ensure_authenticated};

/// Result of a successful mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationOutcome {
    /// Record as confirmed by the authority; the removed record for deletes.
    pub record: Option<Transaction>,
    /// Whether the mutation created a new record.
    pub created: bool,
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Replaces the local collection with the authority's list.
///
/// Records with a mutation in flight keep their optimistic local state: an
/// in-flight update keeps the local version and an in-flight delete keeps the
/// record out. Speculative records whose creation is still in flight are kept
/// at the end of the collection. Returns the number of records loaded.
pub async fn reload_transactions<R>(store: &LocalStore, repo: &R) -> ServiceResult<usize>
where
    R: SessionReader + TransactionReader,
{
    ensure_authenticated(store, repo).await?;

    let remote = repo.list_transactions().await.map_err(|e| {
        log::error!("Failed to list transactions: {e}");
        ServiceError::from(e)
    })?;
    let count = remote.len();

    store.write(|state| {
        let mut merged: Vec<Transaction> = remote
            .into_iter()
            .filter_map(|record| {
                if state.is_in_flight(&record.id) {
                    // Absent locally means a delete is pending.
                    state.find(&record.id).cloned()
                } else {
                    Some(record)
                }
            })
            .collect();
        merged.extend(
            state
                .transactions
                .iter()
                .filter(|t| t.id.is_temporary() && state.is_in_flight(&t.id))
                .cloned(),
        );
        state.transactions = merged;
        state.touch();
    });
    Ok(count)
}

/// Creates a record optimistically under a temporary identifier.
pub async fn create_transaction<R>(
    mut payload: TransactionPayload,
    store: &LocalStore,
    repo: &R,
) -> ServiceResult<MutationOutcome>
where
    R: SessionReader + TransactionWriter,
{
    ensure_authenticated(store, repo).await?;

    let temp_id = TransactionId::temporary();
    payload.client_reference = Some(temp_id.clone());

    let (snapshot, prior_session, generation) = store.write(|state| {
        let mut snapshot = state.snapshot();
        let prior_session = std::mem::take(&mut state.edit_session);
        state
            .transactions
            .push(Transaction::speculative(temp_id.clone(), &payload, now()));
        state.touch();
        state.seal(&mut snapshot);
        let generation = state.begin_mutation(&temp_id);
        (snapshot, prior_session, generation)
    });

    match repo.create_transaction(&payload).await {
        Ok(confirmed) => {
            store.write(|state| {
                state.finish_mutation(&temp_id, generation);
                reconcile_created(state, &temp_id, &payload, confirmed.clone());
                state.forget(&temp_id);
            });
            log::debug!("Created transaction {} (was {temp_id})", confirmed.id);
            Ok(MutationOutcome {
                record: Some(confirmed),
                created: true,
            })
        }
        Err(e) => {
            log::error!("Failed to create transaction, rolling back: {e}");
            store.write(|state| {
                state.finish_mutation(&temp_id, generation);
                if !state.restore(snapshot) {
                    state.remove(&temp_id);
                }
                state.forget(&temp_id);
                if state.edit_session == EditSession::Idle {
                    state.edit_session = prior_session;
                }
            });
            Err(e.into())
        }
    }
}

/// Swaps the speculative record for the confirmed one.
///
/// The temporary identifier is matched first (directly, or through the
/// reference echoed by the authority); failing that, any temporary record
/// with the same description and amount. If nothing matches the confirmed
/// record is appended.
fn reconcile_created(
    state: &mut StoreState,
    temp_id: &TransactionId,
    payload: &TransactionPayload,
    confirmed: Transaction,
) {
    let by_reference = confirmed
        .client_reference
        .as_ref()
        .and_then(|reference| state.position(reference));
    let index = state.position(temp_id).or(by_reference).or_else(|| {
        state.transactions.iter().position(|t| {
            t.id.is_temporary()
                && t.description == payload.description
                && t.amount == payload.amount
        })
    });

    // A reload may already have brought in the confirmed record.
    if let Some(existing) = state.position(&confirmed.id) {
        if let Some(index) = index {
            state.transactions.remove(index);
        }
        let existing = state.position(&confirmed.id).unwrap_or(existing);
        state.transactions[existing] = confirmed;
    } else {
        match index {
            Some(index) => state.transactions[index] = confirmed,
            None => {
                log::warn!("Speculative record {temp_id} vanished; appending confirmed record");
                state.transactions.push(confirmed);
            }
        }
    }
    state.touch();
}

/// Updates a record in place, then confirms it with the authority.
///
/// On failure the previous record and the edit session are restored so the
/// user can retry without re-entering data.
pub async fn update_transaction<R>(
    id: &TransactionId,
    payload: TransactionPayload,
    store: &LocalStore,
    repo: &R,
) -> ServiceResult<MutationOutcome>
where
    R: SessionReader + TransactionWriter,
{
    ensure_authenticated(store, repo).await?;

    if id.is_temporary() {
        return Err(ServiceError::Pending);
    }

    let (snapshot, prior, index, prior_session, generation) = store.write(|state| {
        let index = state.position(id).ok_or(ServiceError::NotFound)?;
        let mut snapshot = state.snapshot();
        let prior = state.transactions[index].clone();
        state.transactions[index].apply(&payload, now());
        state.touch();
        state.seal(&mut snapshot);
        let prior_session = std::mem::take(&mut state.edit_session);
        let generation = state.begin_mutation(id);
        Ok::<_, ServiceError>((snapshot, prior, index, prior_session, generation))
    })?;

    match repo.update_transaction(id, &payload).await {
        Ok(confirmed) => {
            store.write(|state| {
                if !state.finish_mutation(id, generation) {
                    log::debug!("Update of {id} superseded; skipping reconciliation");
                    return;
                }
                if let Some(index) = state.position(id) {
                    state.transactions[index] = confirmed.clone();
                    state.touch();
                }
            });
            Ok(MutationOutcome {
                record: Some(confirmed),
                created: false,
            })
        }
        Err(RepositoryError::NotFound) => {
            log::warn!("Transaction {id} was deleted remotely; dropping local copy");
            store.write(|state| {
                if state.finish_mutation(id, generation) {
                    state.remove(id);
                    state.forget(id);
                }
            });
            Err(ServiceError::NotFound)
        }
        Err(e) => {
            log::error!("Failed to update transaction {id}, rolling back: {e}");
            store.write(|state| {
                if !state.finish_mutation(id, generation) {
                    log::warn!("Discarding stale rollback of {id}");
                    return;
                }
                if !state.restore(snapshot) {
                    state.reinstate(prior, index);
                }
                if state.edit_session == EditSession::Idle {
                    state.edit_session = prior_session;
                }
            });
            Err(e.into())
        }
    }
}

/// Removes a record locally, then deletes it remotely.
///
/// On failure the record is put back at its original position. A record the
/// authority no longer knows stays removed.
pub async fn delete_transaction<R>(
    id: &TransactionId,
    store: &LocalStore,
    repo: &R,
) -> ServiceResult<MutationOutcome>
where
    R: SessionReader + TransactionWriter,
{
    ensure_authenticated(store, repo).await?;

    if id.is_temporary() {
        return Err(ServiceError::Pending);
    }

    let (snapshot, removed, index, prior_session, generation) = store.write(|state| {
        let index = state.position(id).ok_or(ServiceError::NotFound)?;
        let mut snapshot = state.snapshot();
        let removed = state.transactions.remove(index);
        state.touch();
        state.seal(&mut snapshot);
        let prior_session = if state.edit_session.target() == Some(id) {
            std::mem::take(&mut state.edit_session)
        } else {
            EditSession::Idle
        };
        let generation = state.begin_mutation(id);
        Ok::<_, ServiceError>((snapshot, removed, index, prior_session, generation))
    })?;

    match repo.delete_transaction(id).await {
        Ok(()) => {
            store.write(|state| {
                state.finish_mutation(id, generation);
                state.remove(id);
                state.forget(id);
            });
            Ok(MutationOutcome {
                record: Some(removed),
                created: false,
            })
        }
        Err(RepositoryError::NotFound) => {
            log::info!("Transaction {id} was already deleted remotely");
            store.write(|state| {
                state.finish_mutation(id, generation);
                state.remove(id);
                state.forget(id);
            });
            Err(ServiceError::NotFound)
        }
        Err(e) => {
            log::error!("Failed to delete transaction {id}, rolling back: {e}");
            store.write(|state| {
                if !state.finish_mutation(id, generation) {
                    log::warn!("Discarding stale rollback of {id}");
                    return;
                }
                if !state.restore(snapshot) {
                    state.reinstate(removed, index);
                }
                if state.edit_session == EditSession::Idle {
                    state.edit_session = prior_session;
                }
            });
            Err(e.into())
        }
    }
}

/// Saves the form: updates the record being edited, or creates a new one
/// when no edit session is active.
pub async fn save_transaction<R>(
    payload: TransactionPayload,
    store: &LocalStore,
    repo: &R,
) -> ServiceResult<MutationOutcome>
where
    R: SessionReader + TransactionWriter,
{
    match store.edit_session().target().cloned() {
        Some(id) => update_transaction(&id, payload, store, repo).await,
        None => create_transaction(payload, store, repo).await,
    }
}

/// Sum of the amounts of all records dated on `day`, including speculative
/// ones.
pub fn total_for_date(store: &LocalStore, day: NaiveDate) -> Decimal {
    store.read(|state| {
        state
            .transactions
            .iter()
            .filter(|t| t.occurs_on(day))
            .map(|t| t.amount.get())
            .sum()
    })
}

/// Records dated on `day`, in collection order.
pub fn transactions_for_date(store: &LocalStore, day: NaiveDate) -> Vec<Transaction> {
    store.transactions_on(day)
}
