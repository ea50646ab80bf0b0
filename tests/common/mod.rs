//! Helpers for integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use pushkind_wallet::domain::category::CategoryRecord;
use pushkind_wallet::domain::transaction::{Transaction, TransactionPayload};
use pushkind_wallet::domain::types::{
    CategoryId, CategoryName, Recurrence, TransactionAmount, TransactionId,
};
use pushkind_wallet::repository::{
    CategoryReader, RepositoryError, RepositoryResult, SessionReader, TransactionReader,
    TransactionWriter,
};
use rust_decimal::Decimal;
use tokio::sync::oneshot;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// How a held write is answered once released.
#[derive(Debug)]
pub enum Release {
    Commit,
    Fail(RepositoryError),
}

enum Step {
    Fail(RepositoryError),
    /// Waits for the release before deciding the outcome.
    Hold(oneshot::Receiver<Release>),
    /// Commits right away but answers only once released.
    CommitThenHold(oneshot::Receiver<()>),
}

/// Remote authority whose write answers can be scripted and held back, so
/// tests can interleave overlapping mutations deterministically.
///
/// Writes without a scripted step commit immediately.
pub struct ScriptedAuthority {
    authenticated: AtomicBool,
    records: Mutex<Vec<Transaction>>,
    categories: Mutex<Vec<CategoryRecord>>,
    steps: Mutex<VecDeque<Step>>,
    next_id: AtomicU32,
}

impl ScriptedAuthority {
    pub fn new(records: Vec<Transaction>) -> Self {
        Self {
            authenticated: AtomicBool::new(true),
            records: Mutex::new(records),
            categories: Mutex::new(vec![]),
            steps: Mutex::new(VecDeque::new()),
            next_id: AtomicU32::new(100),
        }
    }

    pub fn with_categories(self, categories: Vec<CategoryRecord>) -> Self {
        *self.categories.lock().unwrap() = categories;
        self
    }

    pub fn sign_out(&self) {
        self.authenticated.store(false, Ordering::SeqCst);
    }

    pub fn fail_next(&self, error: RepositoryError) {
        self.steps.lock().unwrap().push_back(Step::Fail(error));
    }

    pub fn hold_next(&self) -> oneshot::Sender<Release> {
        let (tx, rx) = oneshot::channel();
        self.steps.lock().unwrap().push_back(Step::Hold(rx));
        tx
    }

    pub fn commit_then_hold_next(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.steps.lock().unwrap().push_back(Step::CommitThenHold(rx));
        tx
    }

    pub fn records(&self) -> Vec<Transaction> {
        self.records.lock().unwrap().clone()
    }

    /// Runs `commit` according to the next scripted step.
    async fn write<T>(
        &self,
        commit: impl FnOnce(&mut Vec<Transaction>) -> RepositoryResult<T>,
    ) -> RepositoryResult<T> {
        let step = self.steps.lock().unwrap().pop_front();
        match step {
            None => commit(&mut self.records.lock().unwrap()),
            Some(Step::Fail(error)) => Err(error),
            Some(Step::Hold(release)) => match release.await {
                Ok(Release::Commit) => commit(&mut self.records.lock().unwrap()),
                Ok(Release::Fail(error)) => Err(error),
                Err(_) => Err(RepositoryError::Timeout),
            },
            Some(Step::CommitThenHold(release)) => {
                let result = commit(&mut self.records.lock().unwrap());
                let _ = release.await;
                result
            }
        }
    }
}

#[async_trait]
impl SessionReader for ScriptedAuthority {
    async fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TransactionReader for ScriptedAuthority {
    async fn list_transactions(&self) -> RepositoryResult<Vec<Transaction>> {
        Ok(self.records())
    }

    async fn get_transaction_by_id(
        &self,
        id: &TransactionId,
    ) -> RepositoryResult<Option<Transaction>> {
        Ok(self.records().into_iter().find(|t| &t.id == id))
    }
}

#[async_trait]
impl TransactionWriter for ScriptedAuthority {
    async fn create_transaction(
        &self,
        payload: &TransactionPayload,
    ) -> RepositoryResult<Transaction> {
        let id = format!("srv-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        self.write(|records| {
            let created = Transaction {
                id: TransactionId::permanent(id)?,
                amount: payload.amount,
                description: payload.description.clone(),
                category_id: payload.category_id.clone(),
                subcategory_id: payload.subcategory_id.clone(),
                date: payload.date,
                recurrence: payload.recurrence,
                created_at: payload.date,
                updated_at: None,
                client_reference: payload.client_reference.clone(),
            };
            records.push(created.clone());
            Ok(created)
        })
        .await
    }

    async fn update_transaction(
        &self,
        id: &TransactionId,
        payload: &TransactionPayload,
    ) -> RepositoryResult<Transaction> {
        self.write(|records| {
            let record = records
                .iter_mut()
                .find(|t| &t.id == id)
                .ok_or(RepositoryError::NotFound)?;
            record.apply(payload, payload.date);
            Ok(record.clone())
        })
        .await
    }

    async fn delete_transaction(&self, id: &TransactionId) -> RepositoryResult<()> {
        self.write(|records| {
            let before = records.len();
            records.retain(|t| &t.id != id);
            if records.len() == before {
                return Err(RepositoryError::NotFound);
            }
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl CategoryReader for ScriptedAuthority {
    async fn list_categories(&self) -> RepositoryResult<Vec<CategoryRecord>> {
        Ok(self.categories.lock().unwrap().clone())
    }
}

pub fn dec(value: &str) -> Decimal {
    value.parse().unwrap()
}

pub fn at(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

pub fn record(id: &str, amount: &str, date: NaiveDateTime) -> Transaction {
    Transaction {
        id: TransactionId::new(id).unwrap(),
        amount: TransactionAmount::new(dec(amount)).unwrap(),
        description: format!("Record {id}"),
        category_id: CategoryId::new("food").unwrap(),
        subcategory_id: None,
        date,
        recurrence: Recurrence::None,
        created_at: date,
        updated_at: None,
        client_reference: None,
    }
}

pub fn payload(description: &str, amount: &str) -> TransactionPayload {
    TransactionPayload {
        amount: TransactionAmount::new(dec(amount)).unwrap(),
        description: description.to_string(),
        category_id: CategoryId::new("food").unwrap(),
        subcategory_id: None,
        date: at(2024, 3, 1),
        recurrence: Recurrence::None,
        client_reference: None,
    }
}

pub fn category(id: &str, name: &str, parent: Option<&str>) -> CategoryRecord {
    CategoryRecord {
        id: CategoryId::new(id).unwrap(),
        name: CategoryName::new(name).unwrap(),
        icon: None,
        color: None,
        parent_id: parent.map(|p| CategoryId::new(p).unwrap()),
        is_custom: false,
    }
}

pub fn ids(transactions: &[Transaction]) -> Vec<String> {
    transactions.iter().map(|t| t.id.to_string()).collect()
}
