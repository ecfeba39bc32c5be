//! Rendered-data cache for listing pages.
//!
//! Listing data is cached per (path, query string) using `moka` with a
//! 5-minute TTL. Mutation handlers mark a path stale through
//! [`ViewInvalidator`], which drops every entry cached for that path.
//!
//! Every invalidation bumps a generation counter. A reader captures the
//! generation before loading from the database and the fill is discarded if
//! a write invalidated the cache in between.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;

use crate::models::InvoiceListRow;

/// Cache key: a page path and its normalized query string.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct CacheKey {
    pub path: String,
    pub query: String,
}

impl CacheKey {
    #[must_use]
    pub fn new(path: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: query.into(),
        }
    }
}

/// One page of the invoices listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoicePage {
    pub rows: Vec<InvoiceListRow>,
    pub total_pages: u32,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Invoices(InvoicePage),
}

/// Marks cached views stale after a write.
#[async_trait]
pub trait ViewInvalidator: Send + Sync {
    /// Drop everything cached for `path`, whatever its query string.
    async fn invalidate_path(&self, path: &str);
}

/// In-process page cache.
#[derive(Clone)]
pub struct PageCache {
    cache: Cache<CacheKey, CacheValue>,
    generation: Arc<AtomicU64>,
}

impl Default for PageCache {
    fn default() -> Self {
        Self::new()
    }
}

impl PageCache {
    /// Create an empty cache with a 5-minute TTL.
    #[must_use]
    pub fn new() -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            cache,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Current invalidation generation. Capture it before reading the data
    /// that will be passed to an insert.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Cached invoices page for `key`, if present.
    pub async fn invoices(&self, key: &CacheKey) -> Option<InvoicePage> {
        match self.cache.get(key).await {
            Some(CacheValue::Invoices(page)) => Some(page),
            None => None,
        }
    }

    /// Store an invoices page read at `generation`.
    ///
    /// The page is dropped if any path was invalidated since `generation`.
    pub async fn insert_invoices(&self, key: CacheKey, page: InvoicePage, generation: u64) {
        if self.generation() != generation {
            tracing::debug!(path = %key.path, "Skipped caching a page read before a write");
            return;
        }
        self.cache
            .insert(key.clone(), CacheValue::Invoices(page))
            .await;

        // An invalidation that ran between the check and the insert may have
        // missed this entry.
        if self.generation() != generation {
            self.cache.invalidate(&key).await;
        }
    }
}

#[async_trait]
impl ViewInvalidator for PageCache {
    async fn invalidate_path(&self, path: &str) {
        self.generation.fetch_add(1, Ordering::SeqCst);

        let stale: Vec<CacheKey> = self
            .cache
            .iter()
            .filter(|(key, _)| key.path == path)
            .map(|(key, _)| (*key).clone())
            .collect();

        for key in &stale {
            self.cache.invalidate(key).await;
        }

        tracing::debug!(path, entries = stale.len(), "Invalidated cached views");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(total_pages: u32) -> InvoicePage {
        InvoicePage {
            rows: Vec::new(),
            total_pages,
        }
    }

    #[tokio::test]
    async fn test_get_after_insert() {
        let cache = PageCache::new();
        let key = CacheKey::new("/dashboard/invoices", "query=&page=1");

        assert!(cache.invoices(&key).await.is_none());
        cache
            .insert_invoices(key.clone(), page(3), cache.generation())
            .await;
        assert_eq!(cache.invoices(&key).await, Some(page(3)));
    }

    #[tokio::test]
    async fn test_invalidate_path_drops_every_query() {
        let cache = PageCache::new();
        let first = CacheKey::new("/dashboard/invoices", "query=&page=1");
        let second = CacheKey::new("/dashboard/invoices", "query=lee&page=2");
        let other = CacheKey::new("/dashboard/other", "");

        cache.insert_invoices(first.clone(), page(1), cache.generation()).await;
        cache.insert_invoices(second.clone(), page(2), cache.generation()).await;
        cache.insert_invoices(other.clone(), page(9), cache.generation()).await;

        cache.invalidate_path("/dashboard/invoices").await;

        assert!(cache.invoices(&first).await.is_none());
        assert!(cache.invoices(&second).await.is_none());
        assert_eq!(cache.invoices(&other).await, Some(page(9)));
    }

    #[tokio::test]
    async fn test_page_read_before_invalidation_is_not_cached() {
        let cache = PageCache::new();
        let key = CacheKey::new("/dashboard/invoices", "query=&page=1");

        assert!(cache.invoices(&key).await.is_none());
        let read_at = cache.generation();
        cache.invalidate_path("/dashboard/invoices").await;
        cache.insert_invoices(key.clone(), page(1), read_at).await;

        assert!(cache.invoices(&key).await.is_none());

        cache.insert_invoices(key.clone(), page(2), cache.generation()).await;
        assert_eq!(cache.invoices(&key).await, Some(page(2)));
    }
}
