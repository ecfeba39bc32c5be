//! HTTP middleware stack for the dashboard.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with status and latency)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions)
//! 5. Route authorization (redirects before any handler runs)

pub mod auth;
pub mod request_id;
pub mod session;

pub use auth::{RequireAuth, authorize_route, clear_current_user, set_current_user};
pub use request_id::request_id_middleware;
pub use session::{create_session_layer, session_layer};
