//! HTTP route handlers for the dashboard.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                               - Landing page
//! GET  /health                         - Liveness check
//! GET  /health/ready                   - Readiness check (database)
//!
//! # Auth
//! GET  /login                          - Login page
//! POST /login                          - Login action
//! POST /api/auth/signout               - Logout action
//!
//! # Dashboard (requires auth)
//! GET  /dashboard                      - Overview cards, revenue, latest invoices
//! GET  /dashboard/invoices             - Invoice listing (?query=&page=)
//! POST /dashboard/invoices             - Create invoice
//! GET  /dashboard/invoices/create      - Create form
//! POST /dashboard/invoices/{id}        - Update invoice
//! GET  /dashboard/invoices/{id}/edit   - Edit form
//! POST /dashboard/invoices/{id}/delete - Delete invoice
//! GET  /dashboard/customers            - Customer listing (?query=)
//! ```

pub mod auth;
pub mod customers;
pub mod health;
pub mod home;
pub mod invoices;
pub mod overview;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tower_sessions::{SessionManagerLayer, SessionStore};
use tracing::Span;

use crate::error::AppError;
use crate::middleware::{authorize_route, request_id_middleware};
use crate::models::CurrentUser;
use crate::state::AppState;

/// Directory served under `/static`, relative to the workspace root.
pub const STATIC_DIR: &str = "crates/dashboard/static";

/// Layout data shared by every signed-in page.
#[derive(Debug, Clone)]
pub struct Shell {
    pub user_name: String,
    pub current_path: &'static str,
}

impl Shell {
    #[must_use]
    pub fn new(user: &CurrentUser, current_path: &'static str) -> Self {
        Self {
            user_name: user.name.clone(),
            current_path,
        }
    }
}

/// Create the dashboard routes router.
pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(overview::index))
        .route("/invoices", get(invoices::index).post(invoices::create))
        .route("/invoices/create", get(invoices::create_page))
        .route("/invoices/{id}", post(invoices::update))
        .route("/invoices/{id}/edit", get(invoices::edit_page))
        .route("/invoices/{id}/delete", post(invoices::delete))
        .route("/customers", get(customers::index))
}

/// Create all routes for the dashboard.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/api/auth/signout", post(auth::logout))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/dashboard", dashboard_routes())
}

/// Build the complete application with its middleware stack.
///
/// The session layer is passed in so that tests can use an in-memory store.
pub fn app<S>(state: AppState, sessions: SessionManagerLayer<S>) -> Router
where
    S: SessionStore + Clone,
{
    Router::new()
        .merge(routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state.clone(), authorize_route))
        .layer(sessions)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Fallback for unknown paths.
async fn not_found() -> AppError {
    AppError::NotFound("page".to_owned())
}
