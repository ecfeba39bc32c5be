//! Customer repository for database operations.

use sqlx::PgPool;
use tracing::instrument;

use super::{RepositoryError, like_pattern};
use crate::models::{CustomerField, CustomerSummary};

/// Repository for customer database operations. Customers are read-only.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All customers as select options, by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn fetch_fields(&self) -> Result<Vec<CustomerField>, RepositoryError> {
        let rows = sqlx::query_as::<_, CustomerField>(
            "SELECT id::text AS id, name FROM customers ORDER BY name ASC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Customers matching `query` by name or email, with invoice totals.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn fetch_filtered(&self, query: &str) -> Result<Vec<CustomerSummary>, RepositoryError> {
        let rows = sqlx::query_as::<_, CustomerSummary>(
            r"
            SELECT customers.id::text AS id,
                   customers.name,
                   customers.email,
                   customers.image_url,
                   COUNT(invoices.id) AS total_invoices,
                   COALESCE(SUM(CASE WHEN invoices.status = 'pending' THEN invoices.amount ELSE 0 END), 0)::bigint AS total_pending,
                   COALESCE(SUM(CASE WHEN invoices.status = 'paid' THEN invoices.amount ELSE 0 END), 0)::bigint AS total_paid
            FROM customers
            LEFT JOIN invoices ON customers.id = invoices.customer_id
            WHERE customers.name ILIKE $1
               OR customers.email ILIKE $1
            GROUP BY customers.id, customers.name, customers.email, customers.image_url
            ORDER BY customers.name ASC
            ",
        )
        .bind(like_pattern(query))
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}
