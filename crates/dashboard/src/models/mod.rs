//! Domain models for the dashboard.
//!
//! Row types decode straight from `sqlx` queries; view-facing strings are
//! produced by the route handlers.

pub mod customer;
pub mod invoice;
pub mod session;
pub mod user;

pub use customer::{CustomerField, CustomerSummary};
pub use invoice::{CardData, Invoice, InvoiceListRow, LatestInvoice, NewInvoice, Revenue};
pub use session::{CurrentUser, keys as session_keys};
pub use user::User;
