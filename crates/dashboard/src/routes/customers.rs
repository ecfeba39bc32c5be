//! Customers list route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use serde::Deserialize;
use tracing::instrument;

use acme_core::format::format_currency;

use crate::db::CustomerRepository;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::CustomerSummary;
use crate::state::AppState;

use super::Shell;

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
}

/// Customer view for templates.
#[derive(Debug, Clone)]
pub struct CustomerView {
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub total_invoices: i64,
    pub total_pending: String,
    pub total_paid: String,
}

impl From<CustomerSummary> for CustomerView {
    fn from(customer: CustomerSummary) -> Self {
        Self {
            name: customer.name,
            email: customer.email,
            image_url: customer.image_url,
            total_invoices: customer.total_invoices,
            total_pending: format_currency(customer.total_pending),
            total_paid: format_currency(customer.total_paid),
        }
    }
}

/// Customers list page template.
#[derive(Template, WebTemplate)]
#[template(path = "customers.html")]
pub struct CustomersTemplate {
    pub shell: Shell,
    pub query: String,
    pub customers: Vec<CustomerView>,
}

/// Customers list page handler.
#[instrument(skip_all)]
pub async fn index(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<CustomersTemplate> {
    let query = params.query.unwrap_or_default();
    let customers = CustomerRepository::new(state.pool())
        .fetch_filtered(&query)
        .await?;

    Ok(CustomersTemplate {
        shell: Shell::new(&user, "/dashboard/customers"),
        query,
        customers: customers.into_iter().map(CustomerView::from).collect(),
    })
}
