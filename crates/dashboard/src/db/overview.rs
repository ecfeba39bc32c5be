//! Aggregate queries for the overview page.

use sqlx::PgPool;
use tracing::instrument;

use acme_core::Cents;

use super::RepositoryError;
use crate::models::{CardData, Revenue};

/// Repository for overview aggregates.
pub struct OverviewRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OverviewRepository<'a> {
    /// Create a new overview repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Monthly revenue, January first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn fetch_revenue(&self) -> Result<Vec<Revenue>, RepositoryError> {
        let rows = sqlx::query_as::<_, Revenue>(
            "SELECT month, revenue FROM revenue ORDER BY position ASC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Invoice and customer counts plus paid and pending totals.
    ///
    /// The three queries are independent and run concurrently.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any query fails.
    #[instrument(skip(self))]
    pub async fn fetch_card_data(&self) -> Result<CardData, RepositoryError> {
        let invoice_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM invoices")
            .fetch_one(self.pool);
        let customer_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM customers")
            .fetch_one(self.pool);
        let totals = sqlx::query_as::<_, (i64, i64)>(
            r"
            SELECT COALESCE(SUM(CASE WHEN status = 'paid' THEN amount ELSE 0 END), 0)::bigint,
                   COALESCE(SUM(CASE WHEN status = 'pending' THEN amount ELSE 0 END), 0)::bigint
            FROM invoices
            ",
        )
        .fetch_one(self.pool);

        let (number_of_invoices, number_of_customers, (paid, pending)) =
            tokio::try_join!(invoice_count, customer_count, totals)?;

        Ok(CardData {
            number_of_invoices,
            number_of_customers,
            total_paid: Cents::new(paid),
            total_pending: Cents::new(pending),
        })
    }
}
