//! In-memory stores for tests.
//!
//! Available to this crate's unit tests and, with the `test-support`
//! feature, to other crates that drive the router without a database.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use acme_core::{Email, InvoiceId, InvoiceInput};

use crate::cache::ViewInvalidator;
use crate::db::RepositoryError;
use crate::models::{Invoice, NewInvoice, User};
use crate::stores::{InvoiceStore, UserStore};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn unavailable() -> RepositoryError {
    RepositoryError::Database(sqlx::Error::PoolTimedOut)
}

/// [`InvoiceStore`] over a vector, optionally failing every write.
#[derive(Default)]
pub struct MemoryInvoiceStore {
    rows: Mutex<Vec<Invoice>>,
    writes: AtomicUsize,
    failing: bool,
}

impl MemoryInvoiceStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every write fails with a database error.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Snapshot of stored invoices in insertion order.
    #[must_use]
    pub fn invoices(&self) -> Vec<Invoice> {
        lock(&self.rows).clone()
    }

    /// Stored invoice with `id`.
    #[must_use]
    pub fn get(&self, id: &InvoiceId) -> Option<Invoice> {
        lock(&self.rows).iter().find(|row| &row.id == id).cloned()
    }

    /// Number of write calls that reached the store, failed or not.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn begin_write(&self) -> Result<(), RepositoryError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(unavailable());
        }
        Ok(())
    }
}

#[async_trait]
impl InvoiceStore for MemoryInvoiceStore {
    async fn insert(&self, invoice: &NewInvoice) -> Result<InvoiceId, RepositoryError> {
        self.begin_write()?;
        let id = InvoiceId::new(uuid::Uuid::new_v4().to_string());
        lock(&self.rows).push(Invoice {
            id: id.clone(),
            customer_id: invoice.customer_id.clone(),
            amount: invoice.amount,
            status: invoice.status,
            date: invoice.date,
        });
        Ok(id)
    }

    async fn update(&self, id: &InvoiceId, input: &InvoiceInput) -> Result<u64, RepositoryError> {
        self.begin_write()?;
        let mut rows = lock(&self.rows);
        let Some(row) = rows.iter_mut().find(|row| &row.id == id) else {
            return Ok(0);
        };
        row.customer_id = input.customer_id.clone();
        row.amount = input.amount;
        row.status = input.status;
        Ok(1)
    }

    async fn delete(&self, id: &InvoiceId) -> Result<u64, RepositoryError> {
        self.begin_write()?;
        let mut rows = lock(&self.rows);
        let before = rows.len();
        rows.retain(|row| &row.id != id);
        Ok((before - rows.len()) as u64)
    }
}

/// [`UserStore`] over a vector that counts lookups.
#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<User>>,
    lookups: AtomicUsize,
    failing: bool,
}

impl MemoryUserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every lookup fails with a database error.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn add(&self, user: User) {
        lock(&self.users).push(user);
    }

    /// Number of lookups performed.
    #[must_use]
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(unavailable());
        }
        Ok(lock(&self.users)
            .iter()
            .find(|user| &user.email == email)
            .cloned())
    }
}

/// [`ViewInvalidator`] that records the paths it was asked to invalidate.
#[derive(Default)]
pub struct RecordingInvalidator {
    paths: Mutex<Vec<String>>,
}

impl RecordingInvalidator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths invalidated so far, in call order.
    #[must_use]
    pub fn paths(&self) -> Vec<String> {
        lock(&self.paths).clone()
    }
}

#[async_trait]
impl ViewInvalidator for RecordingInvalidator {
    async fn invalidate_path(&self, path: &str) {
        lock(&self.paths).push(path.to_owned());
    }
}
