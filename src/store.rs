//! Local single-writer state of the client.
//!
//! [`LocalStore`] owns the transaction collection, the category hierarchy and
//! the edit session. Only the service layer writes to it; everything else
//! reads owned snapshots taken at call time. The lock is never held across a
//! remote call.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;

use crate::domain::edit_session::EditSession;
use crate::domain::transaction::Transaction;
use crate::domain::types::TransactionId;
use crate::dto::categories::CategoryNode;
use crate::services::categories::CategoryStyle;
use crate::settings::ClientSettings;

/// Callback invoked whenever an operation is refused because the user is not
/// signed in.
pub type UnauthenticatedHandler = Box<dyn Fn() + Send + Sync>;

/// Copy of the collection taken right before an optimistic write.
#[derive(Debug, Clone)]
pub(crate) struct Snapshot {
    pub transactions: Vec<Transaction>,
    /// Collection revision right after the optimistic write was applied.
    pub applied_revision: u64,
}

#[derive(Debug, Default)]
pub(crate) struct StoreState {
    pub transactions: Vec<Transaction>,
    pub hierarchy: Vec<CategoryNode>,
    pub edit_session: EditSession,
    generations: HashMap<TransactionId, u64>,
    in_flight: HashMap<TransactionId, usize>,
    revision: u64,
}

impl StoreState {
    pub fn position(&self, id: &TransactionId) -> Option<usize> {
        self.transactions.iter().position(|t| &t.id == id)
    }

    pub fn find(&self, id: &TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| &t.id == id)
    }

    /// Marks the collection as changed.
    pub fn touch(&mut self) {
        self.revision += 1;
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            transactions: self.transactions.clone(),
            applied_revision: self.revision,
        }
    }

    /// Records the revision produced by the optimistic write.
    pub fn seal(&self, snapshot: &mut Snapshot) {
        snapshot.applied_revision = self.revision;
    }

    /// Puts the snapshot back verbatim when nothing else wrote to the
    /// collection since the optimistic write. Returns `false` otherwise, in
    /// which case the caller restores only the affected record.
    pub fn restore(&mut self, snapshot: Snapshot) -> bool {
        if self.revision != snapshot.applied_revision {
            return false;
        }
        self.transactions = snapshot.transactions;
        self.touch();
        true
    }

    /// Puts `record` back: in place if present, otherwise at `index`.
    pub fn reinstate(&mut self, record: Transaction, index: usize) {
        match self.position(&record.id) {
            Some(i) => self.transactions[i] = record,
            None => {
                let index = index.min(self.transactions.len());
                self.transactions.insert(index, record);
            }
        }
        self.touch();
    }

    pub fn remove(&mut self, id: &TransactionId) -> Option<Transaction> {
        let index = self.position(id)?;
        let removed = self.transactions.remove(index);
        self.touch();
        Some(removed)
    }

    /// Starts tracking a mutation on `id` and returns its generation.
    pub fn begin_mutation(&mut self, id: &TransactionId) -> u64 {
        let generation = self.generations.entry(id.clone()).or_insert(0);
        *generation += 1;
        let generation = *generation;
        *self.in_flight.entry(id.clone()).or_insert(0) += 1;
        generation
    }

    /// Stops tracking a mutation. Returns whether it is still the latest one
    /// issued for `id`; a superseded mutation must neither reconcile nor roll
    /// back.
    pub fn finish_mutation(&mut self, id: &TransactionId, generation: u64) -> bool {
        if let Some(count) = self.in_flight.get_mut(id) {
            *count -= 1;
            if *count == 0 {
                self.in_flight.remove(id);
            }
        }
        self.generations.get(id).copied() == Some(generation)
    }

    /// Drops bookkeeping for an identifier that no longer exists locally.
    pub fn forget(&mut self, id: &TransactionId) {
        if !self.in_flight.contains_key(id) {
            self.generations.remove(id);
        }
    }

    pub fn is_in_flight(&self, id: &TransactionId) -> bool {
        self.in_flight.contains_key(id)
    }
}

/// Explicitly owned state object shared by the service functions.
pub struct LocalStore {
    state: Mutex<StoreState>,
    settings: ClientSettings,
    on_unauthenticated: Option<UnauthenticatedHandler>,
}

impl Default for LocalStore {
    fn default() -> Self {
        Self::new(ClientSettings::default())
    }
}

impl LocalStore {
    pub fn new(settings: ClientSettings) -> Self {
        Self {
            state: Mutex::new(StoreState::default()),
            settings,
            on_unauthenticated: None,
        }
    }

    /// Registers the handler called when an operation is refused for lack of
    /// authentication (typically a redirect to the login flow).
    pub fn with_unauthenticated_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_unauthenticated = Some(Box::new(handler));
        self
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    pub(crate) fn category_style(&self) -> CategoryStyle {
        CategoryStyle::from(&self.settings)
    }

    pub(crate) fn notify_unauthenticated(&self) {
        if let Some(handler) = &self.on_unauthenticated {
            handler();
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        // Writes are applied inside a single closure, so a poisoned lock still
        // guards a consistent state.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn write<T>(&self, f: impl FnOnce(&mut StoreState) -> T) -> T {
        let mut state = self.lock();
        f(&mut state)
    }

    pub(crate) fn read<T>(&self, f: impl FnOnce(&StoreState) -> T) -> T {
        let state = self.lock();
        f(&state)
    }

    /// Snapshot of the local transaction collection.
    pub fn transactions(&self) -> Vec<Transaction> {
        self.read(|s| s.transactions.clone())
    }

    pub fn transaction(&self, id: &TransactionId) -> Option<Transaction> {
        self.read(|s| s.find(id).cloned())
    }

    /// Records falling on `day`, in collection order.
    pub fn transactions_on(&self, day: NaiveDate) -> Vec<Transaction> {
        self.read(|s| {
            s.transactions
                .iter()
                .filter(|t| t.occurs_on(day))
                .cloned()
                .collect()
        })
    }

    /// Snapshot of the current category hierarchy.
    pub fn hierarchy(&self) -> Vec<CategoryNode> {
        self.read(|s| s.hierarchy.clone())
    }

    pub fn edit_session(&self) -> EditSession {
        self.read(|s| s.edit_session.clone())
    }

    /// Whether a remote mutation on `id` has been sent and not answered yet.
    pub fn is_in_flight(&self, id: &TransactionId) -> bool {
        self.read(|s| s.is_in_flight(id))
    }
}
