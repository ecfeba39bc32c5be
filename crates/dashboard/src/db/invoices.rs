//! Invoice repository for database operations.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use acme_core::pagination::{ITEMS_PER_PAGE, offset, total_pages};
use acme_core::{InvoiceId, InvoiceInput};

use super::{RepositoryError, is_uuid, like_pattern};
use crate::models::{Invoice, InvoiceListRow, LatestInvoice, NewInvoice};
use crate::stores::InvoiceStore;

/// Number of rows in the overview's latest invoices panel.
pub const LATEST_INVOICES: i64 = 5;

/// Repository for invoice database operations.
pub struct InvoiceRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> InvoiceRepository<'a> {
    /// Create a new invoice repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// The most recent invoices with their customer, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn fetch_latest(&self) -> Result<Vec<LatestInvoice>, RepositoryError> {
        let rows = sqlx::query_as::<_, LatestInvoice>(
            r"
            SELECT invoices.id::text AS id, customers.name, customers.email,
                   customers.image_url, invoices.amount
            FROM invoices
            JOIN customers ON invoices.customer_id = customers.id
            ORDER BY invoices.date DESC
            LIMIT $1
            ",
        )
        .bind(LATEST_INVOICES)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// One page of invoices matching `query`, newest first.
    ///
    /// The search is a case-insensitive substring match over customer name
    /// and email, the amount, the date and the status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn fetch_filtered(
        &self,
        query: &str,
        page: u32,
    ) -> Result<Vec<InvoiceListRow>, RepositoryError> {
        let rows = sqlx::query_as::<_, InvoiceListRow>(
            r"
            SELECT invoices.id::text AS id, customers.name, customers.email,
                   customers.image_url, invoices.amount, invoices.date, invoices.status
            FROM invoices
            JOIN customers ON invoices.customer_id = customers.id
            WHERE customers.name ILIKE $1
               OR customers.email ILIKE $1
               OR invoices.amount::text ILIKE $1
               OR invoices.date::text ILIKE $1
               OR invoices.status ILIKE $1
            ORDER BY invoices.date DESC
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(like_pattern(query))
        .bind(i64::from(ITEMS_PER_PAGE))
        .bind(i64::try_from(offset(page, ITEMS_PER_PAGE)).unwrap_or(i64::MAX))
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Number of pages of invoices matching `query`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn fetch_pages(&self, query: &str) -> Result<u32, RepositoryError> {
        let count: i64 = sqlx::query_scalar(
            r"
            SELECT COUNT(*)
            FROM invoices
            JOIN customers ON invoices.customer_id = customers.id
            WHERE customers.name ILIKE $1
               OR customers.email ILIKE $1
               OR invoices.amount::text ILIKE $1
               OR invoices.date::text ILIKE $1
               OR invoices.status ILIKE $1
            ",
        )
        .bind(like_pattern(query))
        .fetch_one(self.pool)
        .await?;

        Ok(total_pages(u64::try_from(count).unwrap_or(0), ITEMS_PER_PAGE))
    }

    /// Get an invoice by id.
    ///
    /// An id that is not a UUID cannot exist, so it yields `None` without a
    /// query.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self), fields(invoice_id = %id))]
    pub async fn get_by_id(&self, id: &InvoiceId) -> Result<Option<Invoice>, RepositoryError> {
        if !is_uuid(id.as_str()) {
            return Ok(None);
        }

        let invoice = sqlx::query_as::<_, Invoice>(
            r"
            SELECT id::text AS id, customer_id::text AS customer_id, amount, status, date
            FROM invoices
            WHERE id = $1::uuid
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(invoice)
    }

    /// Insert an invoice and return the id the database generated.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails, including a
    /// customer id that does not reference an existing customer.
    #[instrument(skip(self, invoice), fields(customer_id = %invoice.customer_id))]
    pub async fn insert(&self, invoice: &NewInvoice) -> Result<InvoiceId, RepositoryError> {
        let id: String = sqlx::query_scalar(
            r"
            INSERT INTO invoices (customer_id, amount, status, date)
            VALUES ($1::uuid, $2, $3, $4)
            RETURNING id::text
            ",
        )
        .bind(&invoice.customer_id)
        .bind(invoice.amount)
        .bind(invoice.status)
        .bind(invoice.date)
        .fetch_one(self.pool)
        .await?;

        Ok(InvoiceId::new(id))
    }

    /// Update customer, amount and status. Returns the number of rows changed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    #[instrument(skip(self, input), fields(invoice_id = %id))]
    pub async fn update(&self, id: &InvoiceId, input: &InvoiceInput) -> Result<u64, RepositoryError> {
        if !is_uuid(id.as_str()) {
            return Ok(0);
        }

        let result = sqlx::query(
            r"
            UPDATE invoices
            SET customer_id = $1::uuid, amount = $2, status = $3
            WHERE id = $4::uuid
            ",
        )
        .bind(&input.customer_id)
        .bind(input.amount)
        .bind(input.status)
        .bind(id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Delete an invoice. Returns the number of rows removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    #[instrument(skip(self), fields(invoice_id = %id))]
    pub async fn delete(&self, id: &InvoiceId) -> Result<u64, RepositoryError> {
        if !is_uuid(id.as_str()) {
            return Ok(0);
        }

        let result = sqlx::query("DELETE FROM invoices WHERE id = $1::uuid")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

/// [`InvoiceStore`] backed by `PostgreSQL`.
#[derive(Clone)]
pub struct PgInvoiceStore {
    pool: PgPool,
}

impl PgInvoiceStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InvoiceStore for PgInvoiceStore {
    async fn insert(&self, invoice: &NewInvoice) -> Result<InvoiceId, RepositoryError> {
        InvoiceRepository::new(&self.pool).insert(invoice).await
    }

    async fn update(&self, id: &InvoiceId, input: &InvoiceInput) -> Result<u64, RepositoryError> {
        InvoiceRepository::new(&self.pool).update(id, input).await
    }

    async fn delete(&self, id: &InvoiceId) -> Result<u64, RepositoryError> {
        InvoiceRepository::new(&self.pool).delete(id).await
    }
}
