//! Invoice mutation handlers.
//!
//! Each handler validates the submitted form, performs at most one write
//! through an [`InvoiceStore`], marks the invoices listing stale, and
//! reports what the HTTP layer should do next. Persistence failures are
//! logged here and surface to the user only as a generic message.

use axum::response::{IntoResponse, Redirect, Response};
use chrono::{NaiveDate, Utc};
use tracing::instrument;

use acme_core::{FieldErrors, InvoiceId, RawInvoiceForm, validate_invoice};

use crate::cache::ViewInvalidator;
use crate::error::add_breadcrumb;
use crate::models::NewInvoice;
use crate::stores::InvoiceStore;

/// Path of the invoices listing.
pub const INVOICES_PATH: &str = "/dashboard/invoices";

pub const CREATE_MISSING_FIELDS: &str = "Missing Fields. Failed to Create Invoice.";
pub const UPDATE_MISSING_FIELDS: &str = "Missing Fields. Failed to Update Invoice.";
pub const CREATE_DATABASE_ERROR: &str = "Database Error: Failed to Create Invoice.";
pub const UPDATE_DATABASE_ERROR: &str = "Database Error: Failed to Update Invoice.";
pub const DELETE_DATABASE_ERROR: &str = "Database Error: Failed to Delete Invoice.";
pub const DELETED: &str = "Deleted Invoice.";

/// Where to send the browser after a successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    location: String,
}

impl Navigation {
    #[must_use]
    pub fn to(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
        }
    }

    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }
}

impl IntoResponse for Navigation {
    /// `303 See Other`, so the browser follows with a GET.
    fn into_response(self) -> Response {
        Redirect::to(&self.location).into_response()
    }
}

/// What the form is re-rendered with after a failed submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub errors: FieldErrors,
    pub message: Option<String>,
}

impl FormState {
    fn failed(errors: FieldErrors, message: &str) -> Self {
        Self {
            errors,
            message: Some(message.to_owned()),
        }
    }
}

/// Result of a delete that reached the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub message: String,
    /// Zero when the id did not exist; still reported as success.
    pub rows_affected: u64,
}

/// Invoice mutation service.
pub struct InvoiceService<'a> {
    store: &'a dyn InvoiceStore,
    views: &'a dyn ViewInvalidator,
}

impl<'a> InvoiceService<'a> {
    /// Create a new invoice service.
    #[must_use]
    pub const fn new(store: &'a dyn InvoiceStore, views: &'a dyn ViewInvalidator) -> Self {
        Self { store, views }
    }

    /// Create an invoice dated today (UTC).
    ///
    /// # Errors
    ///
    /// Returns a [`FormState`] with field errors when validation fails, or
    /// with a generic message when the insert fails.
    pub async fn create(&self, form: &RawInvoiceForm) -> Result<Navigation, FormState> {
        self.create_on(form, today()).await
    }

    /// Create an invoice with an explicit date.
    ///
    /// # Errors
    ///
    /// See [`InvoiceService::create`].
    #[instrument(skip(self, form))]
    pub async fn create_on(
        &self,
        form: &RawInvoiceForm,
        date: NaiveDate,
    ) -> Result<Navigation, FormState> {
        let input = validate_invoice(form)
            .map_err(|errors| FormState::failed(errors, CREATE_MISSING_FIELDS))?;

        let invoice = NewInvoice::from_input(input, date);
        let id = self.store.insert(&invoice).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to create invoice");
            FormState::failed(FieldErrors::new(), CREATE_DATABASE_ERROR)
        })?;

        tracing::info!(invoice_id = %id, amount = invoice.amount.as_i64(), "Invoice created");
        add_breadcrumb("invoice", "Created invoice", Some(&[("invoice_id", id.as_str())]));

        self.views.invalidate_path(INVOICES_PATH).await;
        Ok(Navigation::to(INVOICES_PATH))
    }

    /// Update customer, amount and status of an invoice.
    ///
    /// # Errors
    ///
    /// Returns a [`FormState`] with field errors when validation fails, or
    /// with a generic message when the update fails.
    #[instrument(skip(self, form), fields(invoice_id = %id))]
    pub async fn update(
        &self,
        id: &InvoiceId,
        form: &RawInvoiceForm,
    ) -> Result<Navigation, FormState> {
        let input = validate_invoice(form)
            .map_err(|errors| FormState::failed(errors, UPDATE_MISSING_FIELDS))?;

        let rows = self.store.update(id, &input).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to update invoice");
            FormState::failed(FieldErrors::new(), UPDATE_DATABASE_ERROR)
        })?;

        if rows == 0 {
            tracing::warn!("Update matched no invoice");
        }

        self.views.invalidate_path(INVOICES_PATH).await;
        Ok(Navigation::to(INVOICES_PATH))
    }

    /// Delete an invoice.
    ///
    /// Deleting an id that does not exist succeeds with
    /// `rows_affected == 0`.
    ///
    /// # Errors
    ///
    /// Returns a [`FormState`] with a generic message when the delete fails.
    #[instrument(skip(self), fields(invoice_id = %id))]
    pub async fn delete(&self, id: &InvoiceId) -> Result<DeleteOutcome, FormState> {
        let rows_affected = self.store.delete(id).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to delete invoice");
            FormState::failed(FieldErrors::new(), DELETE_DATABASE_ERROR)
        })?;

        add_breadcrumb("invoice", "Deleted invoice", Some(&[("invoice_id", id.as_str())]));

        self.views.invalidate_path(INVOICES_PATH).await;
        Ok(DeleteOutcome {
            message: DELETED.to_owned(),
            rows_affected,
        })
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use acme_core::invoice::{AMOUNT_NOT_POSITIVE, CUSTOMER_REQUIRED, STATUS_REQUIRED};
    use acme_core::{Cents, CustomerId, InvoiceStatus};

    use super::*;
    use crate::test_support::{MemoryInvoiceStore, RecordingInvalidator};

    fn form(customer_id: &str, amount: &str, status: &str) -> RawInvoiceForm {
        RawInvoiceForm {
            customer_id: Some(customer_id.to_owned()),
            amount: Some(amount.to_owned()),
            status: Some(status.to_owned()),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_create_persists_cents_and_navigates() {
        let store = MemoryInvoiceStore::new();
        let views = RecordingInvalidator::new();
        let service = InvoiceService::new(&store, &views);

        let before = today();
        let nav = service.create(&form("c1", "34.5", "paid")).await.unwrap();
        let after = today();

        assert_eq!(nav, Navigation::to("/dashboard/invoices"));
        let rows = store.invoices();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.customer_id, CustomerId::new("c1"));
        assert_eq!(row.amount, Cents::new(3450));
        assert_eq!(row.status, InvoiceStatus::Paid);
        assert!(row.date == before || row.date == after);
        assert_eq!(views.paths(), ["/dashboard/invoices"]);
    }

    #[tokio::test]
    async fn test_create_uses_given_date() {
        let store = MemoryInvoiceStore::new();
        let views = RecordingInvalidator::new();
        let service = InvoiceService::new(&store, &views);

        service
            .create_on(&form("c1", "10", "pending"), date(2022, 12, 6))
            .await
            .unwrap();
        assert_eq!(store.invoices()[0].date, date(2022, 12, 6));
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_form_without_writing() {
        let store = MemoryInvoiceStore::new();
        let views = RecordingInvalidator::new();
        let service = InvoiceService::new(&store, &views);

        let state = service
            .create(&RawInvoiceForm::default())
            .await
            .unwrap_err();

        assert_eq!(state.message.as_deref(), Some(CREATE_MISSING_FIELDS));
        assert_eq!(state.errors.customer_id(), [CUSTOMER_REQUIRED]);
        assert_eq!(state.errors.amount(), [AMOUNT_NOT_POSITIVE]);
        assert_eq!(state.errors.status(), [STATUS_REQUIRED]);
        assert_eq!(store.write_count(), 0);
        assert!(views.paths().is_empty());
    }

    #[tokio::test]
    async fn test_create_reports_persistence_failure_generically() {
        let store = MemoryInvoiceStore::failing();
        let views = RecordingInvalidator::new();
        let service = InvoiceService::new(&store, &views);

        let state = service.create(&form("c1", "5", "paid")).await.unwrap_err();

        assert_eq!(state.message.as_deref(), Some(CREATE_DATABASE_ERROR));
        assert!(state.errors.is_empty());
        assert!(views.paths().is_empty());
    }

    #[tokio::test]
    async fn test_update_changes_fields() {
        let store = MemoryInvoiceStore::new();
        let views = RecordingInvalidator::new();
        let service = InvoiceService::new(&store, &views);
        service.create(&form("c1", "1", "pending")).await.unwrap();
        let id = store.invoices()[0].id.clone();

        let nav = service.update(&id, &form("c2", "99.99", "paid")).await.unwrap();

        assert_eq!(nav.location(), INVOICES_PATH);
        let row = store.get(&id).unwrap();
        assert_eq!(row.customer_id, CustomerId::new("c2"));
        assert_eq!(row.amount, Cents::new(9999));
        assert_eq!(row.status, InvoiceStatus::Paid);
        assert_eq!(views.paths().len(), 2);
    }

    #[tokio::test]
    async fn test_update_validation_message() {
        let store = MemoryInvoiceStore::new();
        let views = RecordingInvalidator::new();
        let service = InvoiceService::new(&store, &views);

        let state = service
            .update(&InvoiceId::new("missing"), &form("c1", "0", "paid"))
            .await
            .unwrap_err();

        assert_eq!(state.message.as_deref(), Some(UPDATE_MISSING_FIELDS));
        assert_eq!(state.errors.amount(), [AMOUNT_NOT_POSITIVE]);
    }

    #[tokio::test]
    async fn test_update_persistence_failure() {
        let store = MemoryInvoiceStore::failing();
        let views = RecordingInvalidator::new();
        let service = InvoiceService::new(&store, &views);

        let state = service
            .update(&InvoiceId::new("any"), &form("c1", "3", "paid"))
            .await
            .unwrap_err();

        assert_eq!(state.message.as_deref(), Some(UPDATE_DATABASE_ERROR));
    }

    #[tokio::test]
    async fn test_sequential_updates_last_write_wins() {
        let store = MemoryInvoiceStore::new();
        let views = RecordingInvalidator::new();
        let service = InvoiceService::new(&store, &views);
        service.create(&form("c1", "1", "pending")).await.unwrap();
        let id = store.invoices()[0].id.clone();

        service.update(&id, &form("c1", "2", "pending")).await.unwrap();
        service.update(&id, &form("c1", "3", "paid")).await.unwrap();

        let row = store.get(&id).unwrap();
        assert_eq!(row.amount, Cents::new(300));
        assert_eq!(row.status, InvoiceStatus::Paid);
    }

    #[tokio::test]
    async fn test_concurrent_updates_leave_one_complete_write() {
        let store = Arc::new(MemoryInvoiceStore::new());
        let views = Arc::new(RecordingInvalidator::new());
        InvoiceService::new(store.as_ref(), views.as_ref())
            .create(&form("c1", "1", "pending"))
            .await
            .unwrap();
        let id = store.invoices()[0].id.clone();

        let handles: Vec<_> = (1..=8)
            .map(|n| {
                let store = Arc::clone(&store);
                let views = Arc::clone(&views);
                let id = id.clone();
                tokio::spawn(async move {
                    let amount = n.to_string();
                    InvoiceService::new(store.as_ref(), views.as_ref())
                        .update(&id, &form(&format!("c{n}"), &amount, "paid"))
                        .await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        // Whichever write landed last is stored whole, never a mix of two.
        let row = store.get(&id).unwrap();
        let n = row.customer_id.as_str().trim_start_matches('c').parse::<i64>().unwrap();
        assert_eq!(row.amount, Cents::new(n * 100));
    }

    #[tokio::test]
    async fn test_delete_twice_reports_success_both_times() {
        let store = MemoryInvoiceStore::new();
        let views = RecordingInvalidator::new();
        let service = InvoiceService::new(&store, &views);
        service.create(&form("c1", "1", "pending")).await.unwrap();
        let id = store.invoices()[0].id.clone();

        let first = service.delete(&id).await.unwrap();
        let second = service.delete(&id).await.unwrap();

        assert_eq!(first.message, DELETED);
        assert_eq!(first.rows_affected, 1);
        assert_eq!(second.message, DELETED);
        assert_eq!(second.rows_affected, 0);
        assert!(store.invoices().is_empty());
        assert_eq!(views.paths().len(), 3);
    }

    #[tokio::test]
    async fn test_delete_persistence_failure() {
        let store = MemoryInvoiceStore::failing();
        let views = RecordingInvalidator::new();
        let service = InvoiceService::new(&store, &views);

        let state = service.delete(&InvoiceId::new("any")).await.unwrap_err();

        assert_eq!(state.message.as_deref(), Some(DELETE_DATABASE_ERROR));
        assert!(views.paths().is_empty());
    }

    #[test]
    fn test_navigation_is_see_other() {
        let response = Navigation::to(INVOICES_PATH).into_response();
        assert_eq!(response.status(), axum::http::StatusCode::SEE_OTHER);
        assert_eq!(response.headers()["location"], INVOICES_PATH);
    }
}
