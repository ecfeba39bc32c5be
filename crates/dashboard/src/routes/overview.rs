//! Dashboard overview route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use acme_core::Cents;
use acme_core::format::format_currency;

use crate::db::{InvoiceRepository, OverviewRepository};
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::{CardData, LatestInvoice, Revenue};
use crate::state::AppState;

use super::Shell;

/// Summary card for templates.
#[derive(Debug, Clone)]
pub struct CardView {
    pub title: &'static str,
    pub value: String,
}

/// Revenue bar for templates.
#[derive(Debug, Clone)]
pub struct RevenueView {
    pub month: String,
    pub amount: String,
    /// Bar height relative to the best month, 0-100.
    pub percent: u32,
}

/// Latest invoice row for templates.
#[derive(Debug, Clone)]
pub struct LatestInvoiceView {
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub amount: String,
}

// =============================================================================
// Type Conversions
// =============================================================================

fn cards(data: &CardData) -> Vec<CardView> {
    vec![
        CardView {
            title: "Collected",
            value: format_currency(data.total_paid),
        },
        CardView {
            title: "Pending",
            value: format_currency(data.total_pending),
        },
        CardView {
            title: "Total Invoices",
            value: data.number_of_invoices.to_string(),
        },
        CardView {
            title: "Total Customers",
            value: data.number_of_customers.to_string(),
        },
    ]
}

fn revenue_views(revenue: &[Revenue]) -> Vec<RevenueView> {
    let top = revenue.iter().map(|r| r.revenue).max().unwrap_or(0).max(1);

    revenue
        .iter()
        .map(|r| {
            let clamped = r.revenue.clamp(0, top);
            let percent = u32::try_from(i64::from(clamped) * 100 / i64::from(top)).unwrap_or(0);
            RevenueView {
                month: r.month.clone(),
                amount: format_currency(Cents::new(i64::from(r.revenue) * 100)),
                percent,
            }
        })
        .collect()
}

impl From<LatestInvoice> for LatestInvoiceView {
    fn from(invoice: LatestInvoice) -> Self {
        Self {
            name: invoice.name,
            email: invoice.email,
            image_url: invoice.image_url,
            amount: format_currency(invoice.amount),
        }
    }
}

/// Overview page template.
#[derive(Template, WebTemplate)]
#[template(path = "overview.html")]
pub struct OverviewTemplate {
    pub shell: Shell,
    pub cards: Vec<CardView>,
    pub revenue: Vec<RevenueView>,
    pub latest: Vec<LatestInvoiceView>,
}

/// Overview page handler.
#[instrument(skip_all)]
pub async fn index(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<OverviewTemplate> {
    let overview = OverviewRepository::new(state.pool());
    let invoices = InvoiceRepository::new(state.pool());

    let (card_data, revenue, latest) = tokio::try_join!(
        overview.fetch_card_data(),
        overview.fetch_revenue(),
        invoices.fetch_latest(),
    )?;

    Ok(OverviewTemplate {
        shell: Shell::new(&user, "/dashboard"),
        cards: cards(&card_data),
        revenue: revenue_views(&revenue),
        latest: latest.into_iter().map(LatestInvoiceView::from).collect(),
    })
}
