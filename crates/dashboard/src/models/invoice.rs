//! Invoice read and write models.

use chrono::NaiveDate;
use sqlx::FromRow;

use acme_core::{Cents, CustomerId, InvoiceId, InvoiceInput, InvoiceStatus};

/// A stored invoice.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Invoice {
    pub id: InvoiceId,
    pub customer_id: CustomerId,
    pub amount: Cents,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
}

/// A validated invoice ready to insert. The id is assigned by the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInvoice {
    pub customer_id: CustomerId,
    pub amount: Cents,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
}

impl NewInvoice {
    /// Stamp validated input with its creation date.
    #[must_use]
    pub fn from_input(input: InvoiceInput, date: NaiveDate) -> Self {
        Self {
            customer_id: input.customer_id,
            amount: input.amount,
            status: input.status,
            date,
        }
    }
}

/// One row of the invoices table, joined with its customer.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct InvoiceListRow {
    pub id: InvoiceId,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub amount: Cents,
    pub date: NaiveDate,
    pub status: InvoiceStatus,
}

/// Row of the "latest invoices" panel.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct LatestInvoice {
    pub id: InvoiceId,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub amount: Cents,
}

/// Monthly revenue in whole dollars.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Revenue {
    pub month: String,
    pub revenue: i32,
}

/// Totals shown on the overview cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CardData {
    pub number_of_invoices: i64,
    pub number_of_customers: i64,
    pub total_paid: Cents,
    pub total_pending: Cents,
}
