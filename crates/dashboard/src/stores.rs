//! Persistence ports used by the mutation handlers and the login gate.
//!
//! Handlers depend on these traits rather than on `PgPool` so that they can
//! be driven by in-memory stores in tests. The `PostgreSQL` adapters live in
//! [`crate::db`].

use async_trait::async_trait;

use acme_core::{Email, InvoiceId, InvoiceInput};

use crate::db::RepositoryError;
use crate::models::{NewInvoice, User};

/// Write side of the invoices table.
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// Insert an invoice and return its generated id.
    async fn insert(&self, invoice: &NewInvoice) -> Result<InvoiceId, RepositoryError>;

    /// Set customer, amount and status on the invoice with `id`.
    ///
    /// Returns the number of rows changed.
    async fn update(&self, id: &InvoiceId, input: &InvoiceInput) -> Result<u64, RepositoryError>;

    /// Delete the invoice with `id`. Returns the number of rows removed.
    async fn delete(&self, id: &InvoiceId) -> Result<u64, RepositoryError>;
}

/// Credential lookup for the login gate.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find a user by email.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError>;
}
