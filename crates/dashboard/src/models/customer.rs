//! Customer read models.

use sqlx::FromRow;

use acme_core::{Cents, CustomerId};

/// Customer option for the invoice form's select.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct CustomerField {
    pub id: CustomerId,
    pub name: String,
}

/// A customer with invoice totals, for the customers table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct CustomerSummary {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub total_invoices: i64,
    pub total_pending: Cents,
    pub total_paid: Cents,
}
