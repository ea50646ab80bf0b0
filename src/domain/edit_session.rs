use serde::{Deserialize, Serialize};

use crate::domain::transaction::Transaction;
use crate::domain::types::TransactionId;

/// Tracks the single record currently open for editing, if any.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub enum EditSession {
    #[default]
    Idle,
    Editing {
        id: TransactionId,
        snapshot: Transaction,
        /// Set when the snapshot comes from the local cache because the
        /// authority could not be reached.
        stale: bool,
    },
}

impl EditSession {
    pub fn editing(snapshot: Transaction, stale: bool) -> Self {
        Self::Editing {
            id: snapshot.id.clone(),
            snapshot,
            stale,
        }
    }

    pub fn target(&self) -> Option<&TransactionId> {
        match self {
            Self::Idle => None,
            Self::Editing { id, .. } => Some(id),
        }
    }

    pub fn snapshot(&self) -> Option<&Transaction> {
        match self {
            Self::Idle => None,
            Self::Editing { snapshot, .. } => Some(snapshot),
        }
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, Self::Editing { stale: true, .. })
    }
}
