//! Seed the dashboard database with placeholder data.
//!
//! Inserts one user, six customers, a handful of invoices and twelve months
//! of revenue. Every insert is idempotent, so the command can be re-run.

use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::info;

use acme_dashboard::services::auth::hash_password;

struct SeedUser {
    id: &'static str,
    name: &'static str,
    email: &'static str,
    password: &'static str,
}

struct SeedCustomer {
    id: &'static str,
    name: &'static str,
    email: &'static str,
    image_url: &'static str,
}

struct SeedInvoice {
    customer: usize,
    /// Cents.
    amount: i64,
    status: &'static str,
    date: (i32, u32, u32),
}

const USERS: &[SeedUser] = &[SeedUser {
    id: "410544b2-4001-4271-9855-fec4b6a6442a",
    name: "User",
    email: "user@nextmail.com",
    password: "123456",
}];

const CUSTOMERS: &[SeedCustomer] = &[
    SeedCustomer {
        id: "d6e15727-9fe1-4961-8c5b-ea44a9bd81aa",
        name: "Evil Rabbit",
        email: "evil@rabbit.com",
        image_url: "/static/customers/evil-rabbit.png",
    },
    SeedCustomer {
        id: "3958dc9e-712f-4377-85e9-fec4b6a6442a",
        name: "Delba de Oliveira",
        email: "delba@oliveira.com",
        image_url: "/static/customers/delba-de-oliveira.png",
    },
    SeedCustomer {
        id: "3958dc9e-742f-4377-85e9-fec4b6a6442a",
        name: "Lee Robinson",
        email: "lee@robinson.com",
        image_url: "/static/customers/lee-robinson.png",
    },
    SeedCustomer {
        id: "76d65c26-f784-44a2-ac19-586678f7c2f2",
        name: "Michael Novotny",
        email: "michael@novotny.com",
        image_url: "/static/customers/michael-novotny.png",
    },
    SeedCustomer {
        id: "cc27c14a-0acf-4f4a-a6c9-d45682c144b9",
        name: "Amy Burns",
        email: "amy@burns.com",
        image_url: "/static/customers/amy-burns.png",
    },
    SeedCustomer {
        id: "13d07535-c59e-4157-a011-f8d2ef4e0cbb",
        name: "Balazs Orban",
        email: "balazs@orban.com",
        image_url: "/static/customers/balazs-orban.png",
    },
];

const INVOICES: &[SeedInvoice] = &[
    SeedInvoice { customer: 0, amount: 15795, status: "pending", date: (2022, 12, 6) },
    SeedInvoice { customer: 1, amount: 20348, status: "pending", date: (2022, 11, 14) },
    SeedInvoice { customer: 4, amount: 3040, status: "paid", date: (2022, 10, 29) },
    SeedInvoice { customer: 3, amount: 44800, status: "paid", date: (2023, 9, 10) },
    SeedInvoice { customer: 5, amount: 34577, status: "pending", date: (2023, 8, 5) },
    SeedInvoice { customer: 2, amount: 54246, status: "pending", date: (2023, 7, 16) },
    SeedInvoice { customer: 0, amount: 666, status: "pending", date: (2023, 6, 27) },
    SeedInvoice { customer: 3, amount: 32545, status: "paid", date: (2023, 6, 9) },
    SeedInvoice { customer: 4, amount: 1250, status: "paid", date: (2023, 6, 17) },
    SeedInvoice { customer: 5, amount: 8546, status: "paid", date: (2023, 6, 7) },
    SeedInvoice { customer: 1, amount: 500, status: "paid", date: (2023, 8, 19) },
    SeedInvoice { customer: 5, amount: 8945, status: "paid", date: (2023, 6, 3) },
    SeedInvoice { customer: 2, amount: 1000, status: "paid", date: (2022, 6, 5) },
];

/// Monthly revenue in whole dollars, January first.
const REVENUE: &[(&str, i32)] = &[
    ("Jan", 2000),
    ("Feb", 1800),
    ("Mar", 2200),
    ("Apr", 2500),
    ("May", 2300),
    ("Jun", 3200),
    ("Jul", 3500),
    ("Aug", 3700),
    ("Sep", 2500),
    ("Oct", 2800),
    ("Nov", 3000),
    ("Dec", 4800),
];

/// Seed all placeholder data.
///
/// # Errors
///
/// Returns an error if the database is unreachable or an insert fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;

    let users = seed_users(&pool).await?;
    let customers = seed_customers(&pool).await?;
    let invoices = seed_invoices(&pool).await?;
    let revenue = seed_revenue(&pool).await?;

    info!("Seeding complete!");
    info!("  Users inserted: {users}");
    info!("  Customers inserted: {customers}");
    info!("  Invoices inserted: {invoices}");
    info!("  Revenue months inserted: {revenue}");
    Ok(())
}

async fn seed_users(pool: &PgPool) -> Result<u64, Box<dyn std::error::Error>> {
    let mut inserted = 0;
    for user in USERS {
        let password_hash = hash_password(user.password)?;
        inserted += sqlx::query(
            r"
            INSERT INTO users (id, name, email, password)
            VALUES ($1::uuid, $2, $3, $4)
            ON CONFLICT DO NOTHING
            ",
        )
        .bind(user.id)
        .bind(user.name)
        .bind(user.email)
        .bind(password_hash)
        .execute(pool)
        .await?
        .rows_affected();
    }
    Ok(inserted)
}

async fn seed_customers(pool: &PgPool) -> Result<u64, sqlx::Error> {
    let mut inserted = 0;
    for customer in CUSTOMERS {
        inserted += sqlx::query(
            r"
            INSERT INTO customers (id, name, email, image_url)
            VALUES ($1::uuid, $2, $3, $4)
            ON CONFLICT (id) DO NOTHING
            ",
        )
        .bind(customer.id)
        .bind(customer.name)
        .bind(customer.email)
        .bind(customer.image_url)
        .execute(pool)
        .await?
        .rows_affected();
    }
    Ok(inserted)
}

async fn seed_invoices(pool: &PgPool) -> Result<u64, Box<dyn std::error::Error>> {
    let mut inserted = 0;
    for invoice in INVOICES {
        let customer = CUSTOMERS
            .get(invoice.customer)
            .ok_or("seed invoice references an unknown customer")?;
        let (year, month, day) = invoice.date;
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or("invalid seed date")?;

        // Invoices have generated ids, so an existing identical row counts as seeded.
        inserted += sqlx::query(
            r"
            INSERT INTO invoices (customer_id, amount, status, date)
            SELECT $1::uuid, $2, $3, $4
            WHERE NOT EXISTS (
                SELECT 1 FROM invoices
                WHERE customer_id = $1::uuid AND amount = $2 AND status = $3 AND date = $4
            )
            ",
        )
        .bind(customer.id)
        .bind(invoice.amount)
        .bind(invoice.status)
        .bind(date)
        .execute(pool)
        .await?
        .rows_affected();
    }
    Ok(inserted)
}

async fn seed_revenue(pool: &PgPool) -> Result<u64, sqlx::Error> {
    let mut inserted = 0;
    for (position, (month, revenue)) in (1_i16..).zip(REVENUE) {
        inserted += sqlx::query(
            r"
            INSERT INTO revenue (month, revenue, position)
            VALUES ($1, $2, $3)
            ON CONFLICT (month) DO NOTHING
            ",
        )
        .bind(*month)
        .bind(*revenue)
        .bind(position)
        .execute(pool)
        .await?
        .rows_affected();
    }
    Ok(inserted)
}
