//! Acme Core - Shared domain library for the invoicing dashboard.
//!
//! This crate provides the pieces of the dashboard that do not touch I/O:
//! - `dashboard` - Server-rendered dashboard binary (uses every module here)
//! - `cli` - Command-line tools for migrations, seeding and user management
//!
//! # Architecture
//!
//! The core crate contains only types, validation and pure decision logic -
//! no database access, no HTTP. Everything here is deterministic and can be
//! tested without a runtime.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, emails, money and invoice status
//! - [`invoice`] - Invoice form schema validation and coercion
//! - [`access`] - Route authorization predicate and its configuration
//! - [`pagination`] - Page-number model for paginated listings
//! - [`format`] - Display formatting for currency and dates

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod access;
pub mod format;
pub mod invoice;
pub mod pagination;
pub mod types;

pub use access::{Access, AuthConfig};
pub use invoice::{FieldErrors, InvoiceInput, RawInvoiceForm, validate_invoice};
pub use types::*;
