//! Invoice form schema.
//!
//! Raw form fields arrive as optional strings. [`validate_invoice`] coerces
//! them into an [`InvoiceInput`] or collects every problem into
//! [`FieldErrors`], keyed by the form field name. Validation has no side
//! effects; the mutation handlers decide what happens next.

use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Cents, CustomerId, InvoiceStatus};

/// Message shown when no customer was selected.
pub const CUSTOMER_REQUIRED: &str = "Please select a customer.";
/// Message shown when the amount is zero, negative, or not a number.
pub const AMOUNT_NOT_POSITIVE: &str = "Please enter an amount greater than $0.";
/// Message shown when the amount cannot be represented in cents.
pub const AMOUNT_TOO_LARGE: &str = "Please enter a smaller amount.";
/// Message shown when the status is not one of the known values.
pub const STATUS_REQUIRED: &str = "Please select an invoice status.";

/// Invoice form fields as submitted, before any validation.
///
/// Field names match the HTML form (`customerId`, `amount`, `status`).
/// Missing fields deserialize to `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawInvoiceForm {
    #[serde(rename = "customerId")]
    pub customer_id: Option<String>,
    pub amount: Option<String>,
    pub status: Option<String>,
}

/// Validated invoice fields supplied by the user.
///
/// `id` and `date` are never user-supplied; the create handler assigns them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceInput {
    pub customer_id: CustomerId,
    pub amount: Cents,
    pub status: InvoiceStatus,
}

/// A field of the invoice form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum InvoiceField {
    #[serde(rename = "customerId")]
    CustomerId,
    #[serde(rename = "amount")]
    Amount,
    #[serde(rename = "status")]
    Status,
}

impl InvoiceField {
    /// The HTML form field name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CustomerId => "customerId",
            Self::Amount => "amount",
            Self::Status => "status",
        }
    }
}

/// Per-field validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<InvoiceField, Vec<String>>);

impl FieldErrors {
    /// No errors.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Record a message against a field.
    pub fn add(&mut self, field: InvoiceField, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    /// Messages recorded for `field`, empty if none.
    #[must_use]
    pub fn get(&self, field: InvoiceField) -> &[String] {
        self.0.get(&field).map(Vec::as_slice).unwrap_or_default()
    }

    /// Whether `field` has at least one message.
    #[must_use]
    pub fn has(&self, field: InvoiceField) -> bool {
        !self.get(field).is_empty()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate fields with their messages, in form order.
    pub fn iter(&self) -> impl Iterator<Item = (InvoiceField, &[String])> {
        self.0.iter().map(|(field, messages)| (*field, messages.as_slice()))
    }

    /// Messages for `customerId`.
    #[must_use]
    pub fn customer_id(&self) -> &[String] {
        self.get(InvoiceField::CustomerId)
    }

    /// Messages for `amount`.
    #[must_use]
    pub fn amount(&self) -> &[String] {
        self.get(InvoiceField::Amount)
    }

    /// Messages for `status`.
    #[must_use]
    pub fn status(&self) -> &[String] {
        self.get(InvoiceField::Status)
    }
}

/// Coerce an amount string to a number.
///
/// Surrounding whitespace is ignored. Empty, missing, or non-numeric input
/// coerces to zero, which the positivity rule then rejects.
#[must_use]
pub fn coerce_amount(raw: Option<&str>) -> Decimal {
    let trimmed = raw.map_or("", str::trim);
    if trimmed.is_empty() {
        return Decimal::ZERO;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .unwrap_or(Decimal::ZERO)
}

/// Validate and coerce raw invoice form fields.
///
/// # Errors
///
/// Returns [`FieldErrors`] holding one entry per failing field when any
/// field is invalid.
///
/// # Example
///
/// ```
/// use acme_core::invoice::{RawInvoiceForm, validate_invoice};
///
/// let form = RawInvoiceForm {
///     customer_id: Some("c1".into()),
///     amount: Some("34.5".into()),
///     status: Some("paid".into()),
/// };
/// let input = validate_invoice(&form).unwrap();
/// assert_eq!(input.amount.as_i64(), 3450);
/// ```
pub fn validate_invoice(form: &RawInvoiceForm) -> Result<InvoiceInput, FieldErrors> {
    let mut errors = FieldErrors::new();

    let customer_id = match form.customer_id.as_deref() {
        Some(id) if !id.is_empty() => Some(CustomerId::new(id)),
        _ => {
            errors.add(InvoiceField::CustomerId, CUSTOMER_REQUIRED);
            None
        }
    };

    let dollars = coerce_amount(form.amount.as_deref());
    let amount = if dollars > Decimal::ZERO {
        match Cents::from_dollars(dollars) {
            Some(cents) if cents.is_positive() => Some(cents),
            Some(_) => {
                errors.add(InvoiceField::Amount, AMOUNT_NOT_POSITIVE);
                None
            }
            None => {
                errors.add(InvoiceField::Amount, AMOUNT_TOO_LARGE);
                None
            }
        }
    } else {
        errors.add(InvoiceField::Amount, AMOUNT_NOT_POSITIVE);
        None
    };

    let status = match form.status.as_deref().map(InvoiceStatus::from_str) {
        Some(Ok(status)) => Some(status),
        _ => {
            errors.add(InvoiceField::Status, STATUS_REQUIRED);
            None
        }
    };

    match (customer_id, amount, status) {
        (Some(customer_id), Some(amount), Some(status)) if errors.is_empty() => Ok(InvoiceInput {
            customer_id,
            amount,
            status,
        }),
        _ => Err(errors),
    }
}
