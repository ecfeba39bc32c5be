//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::cache::PageCache;
use crate::config::DashboardConfig;
use crate::db::{PgInvoiceStore, PgUserStore};
use crate::stores::{InvoiceStore, UserStore};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: DashboardConfig,
    pool: PgPool,
    invoices: Arc<dyn InvoiceStore>,
    users: Arc<dyn UserStore>,
    pages: PageCache,
}

impl AppState {
    /// Create application state backed by `PostgreSQL` stores.
    #[must_use]
    pub fn new(config: DashboardConfig, pool: PgPool) -> Self {
        let invoices = Arc::new(PgInvoiceStore::new(pool.clone()));
        let users = Arc::new(PgUserStore::new(pool.clone()));
        Self::with_stores(config, pool, invoices, users)
    }

    /// Create application state with explicit write and credential stores.
    ///
    /// Read-side pages still query `pool`.
    #[must_use]
    pub fn with_stores(
        config: DashboardConfig,
        pool: PgPool,
        invoices: Arc<dyn InvoiceStore>,
        users: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                invoices,
                users,
                pages: PageCache::new(),
            }),
        }
    }

    /// Get a reference to the dashboard configuration.
    #[must_use]
    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Invoice write store.
    #[must_use]
    pub fn invoices(&self) -> &dyn InvoiceStore {
        self.inner.invoices.as_ref()
    }

    /// User credential store.
    #[must_use]
    pub fn users(&self) -> &dyn UserStore {
        self.inner.users.as_ref()
    }

    /// Listing page cache.
    #[must_use]
    pub fn pages(&self) -> &PageCache {
        &self.inner.pages
    }
}
