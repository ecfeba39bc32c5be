//! Business services for the dashboard.

pub mod auth;
pub mod invoices;

pub use auth::{AuthOutcome, AuthService};
pub use invoices::{DeleteOutcome, FormState, InvoiceService, Navigation};
