//! Invoice create, update and delete through the full router.
//!
//! Successful writes answer `303 See Other` without reading the database,
//! so they can run against the in-memory invoice store.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;

use acme_core::{Cents, InvoiceStatus};
use acme_dashboard::test_support::MemoryInvoiceStore;
use acme_integration_tests::{TestApp, form_post, location};

#[tokio::test]
async fn test_create_stores_cents_and_redirects_to_listing() {
    let app = TestApp::new();
    let cookie = app.login().await;

    let response = app
        .send(form_post(
            "/dashboard/invoices",
            "customerId=c1&amount=34.5&status=paid",
            Some(&cookie),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/dashboard/invoices"));

    let stored = app.invoices.invoices();
    assert_eq!(stored.len(), 1);
    let invoice = stored.first().unwrap();
    assert_eq!(invoice.customer_id.as_str(), "c1");
    assert_eq!(invoice.amount, Cents::new(3450));
    assert_eq!(invoice.status, InvoiceStatus::Paid);
    assert_eq!(invoice.date, chrono::Utc::now().date_naive());
}

#[tokio::test]
async fn test_create_requires_login() {
    let app = TestApp::new();

    let response = app
        .send(form_post(
            "/dashboard/invoices",
            "customerId=c1&amount=34.5&status=paid",
            None,
        ))
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response),
        Some("/login?callbackUrl=%2Fdashboard%2Finvoices")
    );
    assert_eq!(app.invoices.write_count(), 0);
}

#[tokio::test]
async fn test_update_overwrites_fields() {
    let app = TestApp::new();
    let cookie = app.login().await;

    app.send(form_post(
        "/dashboard/invoices",
        "customerId=c1&amount=10&status=pending",
        Some(&cookie),
    ))
    .await;
    let id = app.invoices.invoices().first().unwrap().id.clone();

    let response = app
        .send(form_post(
            &format!("/dashboard/invoices/{id}"),
            "customerId=c2&amount=99.99&status=paid",
            Some(&cookie),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/dashboard/invoices"));

    let invoice = app.invoices.get(&id).unwrap();
    assert_eq!(invoice.customer_id.as_str(), "c2");
    assert_eq!(invoice.amount, Cents::new(9999));
    assert_eq!(invoice.status, InvoiceStatus::Paid);
}

#[tokio::test]
async fn test_delete_twice_redirects_both_times() {
    let app = TestApp::new();
    let cookie = app.login().await;

    app.send(form_post(
        "/dashboard/invoices",
        "customerId=c1&amount=5&status=paid",
        Some(&cookie),
    ))
    .await;
    let id = app.invoices.invoices().first().unwrap().id.clone();
    let path = format!("/dashboard/invoices/{id}/delete");

    for _ in 0..2 {
        let response = app.send(form_post(&path, "", Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), Some("/dashboard/invoices"));
    }

    assert!(app.invoices.invoices().is_empty());
}

#[tokio::test]
async fn test_failed_delete_still_redirects() {
    let app = TestApp::with_invoice_store(MemoryInvoiceStore::failing());
    let cookie = app.login().await;

    let response = app
        .send(form_post("/dashboard/invoices/missing/delete", "", Some(&cookie)))
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/dashboard/invoices"));
    assert_eq!(app.invoices.write_count(), 1);
}
