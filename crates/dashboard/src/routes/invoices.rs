//! Invoice route handlers.
//!
//! Listing pages read through the page cache. Writes go through
//! [`InvoiceService`], which invalidates the listing on success; a failed
//! create or update re-renders the form with `422 Unprocessable Entity`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use acme_core::format::{format_currency, format_date};
use acme_core::pagination::{PageItem, generate_pagination, parse_page};
use acme_core::{InvoiceId, InvoiceStatus, RawInvoiceForm};

use crate::cache::{CacheKey, InvoicePage};
use crate::db::{CustomerRepository, InvoiceRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{CustomerField, Invoice, InvoiceListRow, session_keys};
use crate::services::invoices::INVOICES_PATH;
use crate::services::{FormState, InvoiceService};
use crate::state::AppState;

use super::Shell;

/// Listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub query: Option<String>,
    pub page: Option<String>,
}

// =============================================================================
// View Types
// =============================================================================

/// Invoice table row for templates.
#[derive(Debug, Clone)]
pub struct InvoiceRowView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub amount: String,
    pub date: String,
    pub status_label: &'static str,
    pub paid: bool,
}

impl From<&InvoiceListRow> for InvoiceRowView {
    fn from(row: &InvoiceListRow) -> Self {
        Self {
            id: row.id.to_string(),
            name: row.name.clone(),
            email: row.email.clone(),
            image_url: row.image_url.clone(),
            amount: format_currency(row.amount),
            date: format_date(row.date),
            status_label: row.status.label(),
            paid: row.status == InvoiceStatus::Paid,
        }
    }
}

/// One slot of the pagination control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLinkView {
    pub label: String,
    /// `None` for an ellipsis.
    pub href: Option<String>,
    pub active: bool,
}

/// Pagination control for templates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationView {
    pub previous: Option<String>,
    pub next: Option<String>,
    pub items: Vec<PageLinkView>,
}

impl PaginationView {
    /// Build links for `current` of `total` pages, keeping the search query.
    #[must_use]
    pub fn new(query: &str, current: u32, total: u32) -> Self {
        if total <= 1 {
            return Self::default();
        }

        let items = generate_pagination(current, total)
            .into_iter()
            .map(|item| match item {
                PageItem::Page(page) => PageLinkView {
                    label: page.to_string(),
                    href: Some(page_href(query, page)),
                    active: page == current,
                },
                PageItem::Ellipsis => PageLinkView {
                    label: "...".to_owned(),
                    href: None,
                    active: false,
                },
            })
            .collect();

        Self {
            previous: (current > 1).then(|| page_href(query, current - 1)),
            next: (current < total).then(|| page_href(query, current + 1)),
            items,
        }
    }
}

/// Listing URL for `page`, keeping the search query.
fn page_href(query: &str, page: u32) -> String {
    let mut params = url::form_urlencoded::Serializer::new(String::new());
    if !query.is_empty() {
        params.append_pair("query", query);
    }
    params.append_pair("page", &page.to_string());
    format!("{INVOICES_PATH}?{}", params.finish())
}

/// Customer `<option>` for templates.
#[derive(Debug, Clone)]
pub struct CustomerOption {
    pub id: String,
    pub name: String,
    pub selected: bool,
}

/// Values shown in the invoice form inputs.
#[derive(Debug, Clone, Default)]
pub struct FormValues {
    pub customer_id: String,
    pub amount: String,
    pub status: String,
}

impl FormValues {
    fn from_invoice(invoice: &Invoice) -> Self {
        Self {
            customer_id: invoice.customer_id.to_string(),
            amount: invoice.amount.to_dollars().normalize().to_string(),
            status: invoice.status.as_str().to_owned(),
        }
    }

    /// Echo a rejected submission back into the form.
    fn from_form(form: RawInvoiceForm) -> Self {
        Self {
            customer_id: form.customer_id.unwrap_or_default(),
            amount: form.amount.unwrap_or_default(),
            status: form.status.unwrap_or_default(),
        }
    }
}

/// Status radio button for templates.
#[derive(Debug, Clone)]
pub struct StatusOption {
    pub value: &'static str,
    pub label: &'static str,
    pub checked: bool,
}

fn customer_options(customers: &[CustomerField], selected: &str) -> Vec<CustomerOption> {
    customers
        .iter()
        .map(|customer| CustomerOption {
            id: customer.id.to_string(),
            name: customer.name.clone(),
            selected: customer.id.as_str() == selected,
        })
        .collect()
}

fn status_options(selected: &str) -> Vec<StatusOption> {
    InvoiceStatus::ALL
        .iter()
        .map(|status| StatusOption {
            value: status.as_str(),
            label: status.label(),
            checked: status.as_str() == selected,
        })
        .collect()
}

// =============================================================================
// Templates
// =============================================================================

/// Invoices listing template.
#[derive(Template, WebTemplate)]
#[template(path = "invoices/list.html")]
pub struct InvoicesTemplate {
    pub shell: Shell,
    pub query: String,
    pub flash: Option<String>,
    pub rows: Vec<InvoiceRowView>,
    pub pagination: PaginationView,
}

/// Create and edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "invoices/form.html")]
pub struct InvoiceFormTemplate {
    pub shell: Shell,
    pub title: &'static str,
    pub action: String,
    pub submit_label: &'static str,
    pub customers: Vec<CustomerOption>,
    pub amount: String,
    pub statuses: Vec<StatusOption>,
    pub state: FormState,
}

impl InvoiceFormTemplate {
    fn create(shell: Shell, customers: &[CustomerField], values: &FormValues, state: FormState) -> Self {
        Self {
            shell,
            title: "Create Invoice",
            action: INVOICES_PATH.to_owned(),
            submit_label: "Create Invoice",
            customers: customer_options(customers, &values.customer_id),
            amount: values.amount.clone(),
            statuses: status_options(&values.status),
            state,
        }
    }

    fn edit(
        shell: Shell,
        id: &InvoiceId,
        customers: &[CustomerField],
        values: &FormValues,
        state: FormState,
    ) -> Self {
        Self {
            shell,
            title: "Edit Invoice",
            action: format!("{INVOICES_PATH}/{id}"),
            submit_label: "Edit Invoice",
            customers: customer_options(customers, &values.customer_id),
            amount: values.amount.clone(),
            statuses: status_options(&values.status),
            state,
        }
    }
}

// =============================================================================
// Listing
// =============================================================================

/// Load one listing page, from the cache when possible.
async fn load_page(state: &AppState, query: &str, page: u32) -> Result<InvoicePage> {
    let key = CacheKey::new(INVOICES_PATH, format!("query={query}&page={page}"));
    if let Some(cached) = state.pages().invoices(&key).await {
        return Ok(cached);
    }

    let generation = state.pages().generation();
    let repo = InvoiceRepository::new(state.pool());
    let (rows, total_pages) =
        tokio::try_join!(repo.fetch_filtered(query, page), repo.fetch_pages(query))?;

    let loaded = InvoicePage { rows, total_pages };
    state
        .pages()
        .insert_invoices(key, loaded.clone(), generation)
        .await;
    Ok(loaded)
}

/// Invoices listing handler.
#[instrument(skip_all)]
pub async fn index(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<ListQuery>,
) -> Result<InvoicesTemplate> {
    let query = params.query.unwrap_or_default();
    let current = parse_page(params.page.as_deref());
    let page = load_page(&state, &query, current).await?;

    let flash = session.remove::<String>(session_keys::FLASH).await?;

    Ok(InvoicesTemplate {
        shell: Shell::new(&user, INVOICES_PATH),
        pagination: PaginationView::new(&query, current, page.total_pages),
        rows: page.rows.iter().map(InvoiceRowView::from).collect(),
        query,
        flash,
    })
}

// =============================================================================
// Create
// =============================================================================

/// Create form handler.
#[instrument(skip_all)]
pub async fn create_page(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<InvoiceFormTemplate> {
    let customers = CustomerRepository::new(state.pool()).fetch_fields().await?;
    Ok(InvoiceFormTemplate::create(
        Shell::new(&user, INVOICES_PATH),
        &customers,
        &FormValues::default(),
        FormState::default(),
    ))
}

/// Create action handler.
#[instrument(skip_all)]
pub async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Form(form): Form<RawInvoiceForm>,
) -> Result<Response> {
    let service = InvoiceService::new(state.invoices(), state.pages());
    match service.create(&form).await {
        Ok(navigation) => Ok(navigation.into_response()),
        Err(failed) => {
            let customers = CustomerRepository::new(state.pool()).fetch_fields().await?;
            let template = InvoiceFormTemplate::create(
                Shell::new(&user, INVOICES_PATH),
                &customers,
                &FormValues::from_form(form),
                failed,
            );
            Ok((StatusCode::UNPROCESSABLE_ENTITY, template).into_response())
        }
    }
}

// =============================================================================
// Edit
// =============================================================================

/// Edit form handler.
#[instrument(skip_all)]
pub async fn edit_page(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<InvoiceFormTemplate> {
    let id = InvoiceId::new(id);
    let invoices = InvoiceRepository::new(state.pool());
    let customers = CustomerRepository::new(state.pool());
    let (invoice, customers) =
        tokio::try_join!(invoices.get_by_id(&id), customers.fetch_fields())?;

    let invoice = invoice.ok_or_else(|| AppError::NotFound("invoice".to_owned()))?;

    Ok(InvoiceFormTemplate::edit(
        Shell::new(&user, INVOICES_PATH),
        &id,
        &customers,
        &FormValues::from_invoice(&invoice),
        FormState::default(),
    ))
}

/// Update action handler.
#[instrument(skip_all)]
pub async fn update(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<RawInvoiceForm>,
) -> Result<Response> {
    let id = InvoiceId::new(id);
    let service = InvoiceService::new(state.invoices(), state.pages());
    match service.update(&id, &form).await {
        Ok(navigation) => Ok(navigation.into_response()),
        Err(failed) => {
            let customers = CustomerRepository::new(state.pool()).fetch_fields().await?;
            let template = InvoiceFormTemplate::edit(
                Shell::new(&user, INVOICES_PATH),
                &id,
                &customers,
                &FormValues::from_form(form),
                failed,
            );
            Ok((StatusCode::UNPROCESSABLE_ENTITY, template).into_response())
        }
    }
}

// =============================================================================
// Delete
// =============================================================================

/// Delete action handler.
///
/// The outcome message is carried to the listing as a one-shot flash.
#[instrument(skip_all)]
pub async fn delete(
    RequireAuth(_): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Redirect> {
    let id = InvoiceId::new(id);
    let service = InvoiceService::new(state.invoices(), state.pages());
    let message = match service.delete(&id).await {
        Ok(outcome) => {
            if outcome.rows_affected == 0 {
                tracing::info!(invoice_id = %id, "Delete matched no invoice");
            }
            outcome.message
        }
        Err(failed) => failed.message.unwrap_or_default(),
    };

    session.insert(session_keys::FLASH, message).await?;
    Ok(Redirect::to(INVOICES_PATH))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use acme_core::{Cents, CustomerId};
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn test_page_href_keeps_query() {
        assert_eq!(page_href("", 2), "/dashboard/invoices?page=2");
        assert_eq!(
            page_href("lee rob", 3),
            "/dashboard/invoices?query=lee+rob&page=3"
        );
    }

    #[test]
    fn test_pagination_single_page_is_empty() {
        assert_eq!(PaginationView::new("", 1, 1), PaginationView::default());
        assert_eq!(PaginationView::new("", 1, 0), PaginationView::default());
    }

    #[test]
    fn test_pagination_links() {
        let view = PaginationView::new("", 1, 3);
        assert_eq!(view.previous, None);
        assert_eq!(view.next.as_deref(), Some("/dashboard/invoices?page=2"));
        assert_eq!(view.items.len(), 3);
        assert!(view.items.first().is_some_and(|item| item.active));

        let view = PaginationView::new("", 5, 10);
        let labels: Vec<&str> = view.items.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, ["1", "...", "4", "5", "6", "...", "10"]);
        assert!(view.items.iter().filter(|i| i.href.is_none()).count() == 2);
        assert_eq!(view.previous.as_deref(), Some("/dashboard/invoices?page=4"));
    }

    #[test]
    fn test_edit_values_show_dollars() {
        let invoice = Invoice {
            id: InvoiceId::new("3958dc9e-712f-4377-85e9-fec4b6a6442a"),
            customer_id: CustomerId::new("c1"),
            amount: Cents::new(3450),
            status: InvoiceStatus::Paid,
            date: NaiveDate::from_ymd_opt(2022, 12, 6).unwrap(),
        };

        let values = FormValues::from_invoice(&invoice);
        assert_eq!(values.amount, "34.5");
        assert_eq!(values.customer_id, "c1");
        assert_eq!(values.status, "paid");
    }

    #[test]
    fn test_rejected_form_is_echoed() {
        let values = FormValues::from_form(RawInvoiceForm {
            customer_id: None,
            amount: Some("abc".to_owned()),
            status: Some("paid".to_owned()),
        });

        let customers = vec![
            CustomerField {
                id: CustomerId::new("c1"),
                name: "Evil Rabbit".to_owned(),
            },
            CustomerField {
                id: CustomerId::new("c2"),
                name: "Lee Robinson".to_owned(),
            },
        ];

        assert_eq!(values.amount, "abc");
        assert!(customer_options(&customers, &values.customer_id).iter().all(|c| !c.selected));
        let statuses = status_options(&values.status);
        assert!(statuses.iter().any(|s| s.value == "paid" && s.checked));
        assert!(statuses.iter().any(|s| s.value == "pending" && !s.checked));
    }

    #[test]
    fn test_row_view_formats_amount_and_date() {
        let row = InvoiceListRow {
            id: InvoiceId::new("i1"),
            name: "Delba de Oliveira".to_owned(),
            email: "delba@oliveira.com".to_owned(),
            image_url: "/customers/delba-de-oliveira.png".to_owned(),
            amount: Cents::new(1_563_800),
            date: NaiveDate::from_ymd_opt(2022, 12, 6).unwrap(),
            status: InvoiceStatus::Pending,
        };

        let view = InvoiceRowView::from(&row);
        assert_eq!(view.amount, "$15,638.00");
        assert_eq!(view.date, "Dec 6, 2022");
        assert_eq!(view.status_label, "Pending");
        assert!(!view.paid);
    }
}
