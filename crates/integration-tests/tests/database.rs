//! Repository tests against a real `PostgreSQL` database.
//!
//! These tests require:
//! - A running `PostgreSQL` database
//! - `TEST_DATABASE_URL` pointing at a database the tests may write to
//!
//! Migrations are applied on connect. Run with:
//! `cargo test -p acme-integration-tests -- --ignored`

#![allow(clippy::unwrap_used, clippy::expect_used)]

use chrono::NaiveDate;
use sqlx::PgPool;

use acme_core::{Cents, CustomerId, Email, InvoiceId, InvoiceInput, InvoiceStatus};
use acme_dashboard::db::{
    CustomerRepository, InvoiceRepository, OverviewRepository, RepositoryError, UserRepository,
};
use acme_dashboard::models::NewInvoice;
use acme_dashboard::services::auth::hash_password;

async fn pool() -> PgPool {
    let url = std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL not set");
    let pool = PgPool::connect(&url).await.expect("Failed to connect");
    sqlx::migrate!("../dashboard/migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// Insert a throwaway customer and return its id.
async fn insert_customer(pool: &PgPool) -> CustomerId {
    let suffix = uuid::Uuid::new_v4();
    let id: String = sqlx::query_scalar(
        r"
        INSERT INTO customers (name, email, image_url)
        VALUES ($1, $2, '/static/customers/test.png')
        RETURNING id::text
        ",
    )
    .bind(format!("Test Customer {suffix}"))
    .bind(format!("test-{suffix}@example.com"))
    .fetch_one(pool)
    .await
    .unwrap();
    CustomerId::new(id)
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_invoice_round_trip_and_double_delete() {
    let pool = pool().await;
    let customer_id = insert_customer(&pool).await;
    let repo = InvoiceRepository::new(&pool);

    let id = repo
        .insert(&NewInvoice {
            customer_id: customer_id.clone(),
            amount: Cents::new(3450),
            status: InvoiceStatus::Paid,
            date: NaiveDate::from_ymd_opt(2023, 6, 9).unwrap(),
        })
        .await
        .unwrap();

    let stored = repo.get_by_id(&id).await.unwrap().unwrap();
    assert_eq!(stored.customer_id, customer_id);
    assert_eq!(stored.amount, Cents::new(3450));
    assert_eq!(stored.status, InvoiceStatus::Paid);

    let updated = repo
        .update(
            &id,
            &InvoiceInput {
                customer_id: customer_id.clone(),
                amount: Cents::new(100),
                status: InvoiceStatus::Pending,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated, 1);
    assert_eq!(
        repo.get_by_id(&id).await.unwrap().unwrap().amount,
        Cents::new(100)
    );

    assert_eq!(repo.delete(&id).await.unwrap(), 1);
    assert_eq!(repo.delete(&id).await.unwrap(), 0);
    assert!(repo.get_by_id(&id).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_non_uuid_ids_match_nothing() {
    let pool = pool().await;
    let repo = InvoiceRepository::new(&pool);
    let id = InvoiceId::new("not-a-uuid");

    assert!(repo.get_by_id(&id).await.unwrap().is_none());
    assert_eq!(repo.delete(&id).await.unwrap(), 0);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_search_finds_customer_by_partial_name() {
    let pool = pool().await;
    let customer_id = insert_customer(&pool).await;
    let repo = InvoiceRepository::new(&pool);

    repo.insert(&NewInvoice {
        customer_id: customer_id.clone(),
        amount: Cents::new(1_563_800),
        status: InvoiceStatus::Pending,
        date: NaiveDate::from_ymd_opt(2022, 12, 6).unwrap(),
    })
    .await
    .unwrap();

    let rows = repo.fetch_filtered("TEST CUSTOMER", 1).await.unwrap();
    assert!(!rows.is_empty());
    assert!(repo.fetch_pages("test customer").await.unwrap() >= 1);

    let customers = CustomerRepository::new(&pool)
        .fetch_filtered("test customer")
        .await
        .unwrap();
    assert!(customers.iter().any(|c| c.id == customer_id && c.total_invoices >= 1));

    let cards = OverviewRepository::new(&pool).fetch_card_data().await.unwrap();
    assert!(cards.number_of_invoices >= 1);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_duplicate_user_email_conflicts() {
    let pool = pool().await;
    let repo = UserRepository::new(&pool);
    let email = Email::parse(&format!("user-{}@example.com", uuid::Uuid::new_v4())).unwrap();
    let hash = hash_password("123456").unwrap();

    let user = repo.create_with_password("User", &email, &hash).await.unwrap();
    assert_eq!(repo.get_by_email(&email).await.unwrap().map(|u| u.id), Some(user.id));

    let duplicate = repo.create_with_password("User", &email, &hash).await;
    assert!(matches!(duplicate, Err(RepositoryError::Conflict(_))));
}
