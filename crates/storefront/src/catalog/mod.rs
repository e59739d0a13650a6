//! Product catalog with an in-process listing cache.
//!
//! Listings are cached per category using `moka` with a configurable TTL
//! (5 minutes by default). A running server picks up a re-seeded catalog
//! once its cached entries expire. Search runs over the cached full
//! listing.

pub mod search;
pub mod seed;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;
use vitrine_core::Product;

use crate::db::{ProductRepository, RepositoryError};

pub use search::{ALL_CATEGORIES, SUGGESTION_LIMIT, SearchQuery};
pub use seed::{SeedError, SeedResult, load_seed_dir, seed_from_dir};

/// Default listing cache lifetime.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Where catalog listings come from.
pub trait ProductSource: Send + Sync + 'static {
    /// All products, or those of one category, in catalog order.
    fn list(
        &self,
        category: Option<&str>,
    ) -> impl Future<Output = Result<Vec<Product>, RepositoryError>> + Send;
}

impl ProductSource for PgPool {
    async fn list(&self, category: Option<&str>) -> Result<Vec<Product>, RepositoryError> {
        ProductRepository::new(self).list(category).await
    }
}

/// Cached catalog reader.
pub struct Catalog<S = PgPool> {
    inner: Arc<CatalogInner<S>>,
}

struct CatalogInner<S> {
    source: S,
    cache: Cache<Option<String>, Arc<Vec<Product>>>,
}

impl<S> Clone for Catalog<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: ProductSource> Catalog<S> {
    #[must_use]
    pub fn new(source: S, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(ttl)
            .build();

        Self {
            inner: Arc::new(CatalogInner { source, cache }),
        }
    }

    /// The underlying product source.
    #[must_use]
    pub fn source(&self) -> &S {
        &self.inner.source
    }

    /// Products of `category`, or every product when `None`.
    ///
    /// An empty category string lists every product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the listing is not cached and the source
    /// fails. Failures are not cached.
    #[tracing::instrument(skip(self))]
    pub async fn products(&self, category: Option<&str>) -> Result<Arc<Vec<Product>>, RepositoryError> {
        let key = category
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(String::from);

        if let Some(products) = self.inner.cache.get(&key).await {
            tracing::debug!("Catalog cache hit");
            return Ok(products);
        }

        let products = Arc::new(self.inner.source.list(key.as_deref()).await?);
        tracing::debug!(count = products.len(), "Catalog listing loaded");
        self.inner.cache.insert(key, Arc::clone(&products)).await;
        Ok(products)
    }

    /// Suggestions for `text`, optionally within one category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the full listing cannot be loaded.
    #[tracing::instrument(skip(self))]
    pub async fn search(
        &self,
        text: &str,
        category: Option<&str>,
    ) -> Result<Vec<Product>, RepositoryError> {
        let products = self.products(None).await?;
        let hits = SearchQuery::new(text, category).run(&products);
        tracing::debug!(hits = hits.len(), "Catalog searched");
        Ok(hits.into_iter().cloned().collect())
    }

    /// Category filter chips, `All` first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the full listing cannot be loaded.
    pub async fn categories(&self) -> Result<Vec<String>, RepositoryError> {
        Ok(search::categories(&self.products(None).await?))
    }

    /// Drop every cached listing.
    pub async fn invalidate(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use rust_decimal::Decimal;
    use vitrine_core::ProductId;

    use super::*;

    struct FixedSource {
        products: Vec<Product>,
        calls: AtomicUsize,
    }

    impl ProductSource for FixedSource {
        async fn list(&self, category: Option<&str>) -> Result<Vec<Product>, RepositoryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .products
                .iter()
                .filter(|p| category.is_none() || p.category.as_deref() == category)
                .cloned()
                .collect())
        }
    }

    fn product(id: i32, name: &str, category: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            price: Decimal::new(2500, 2),
            old_price: None,
            img: format!("{name}.png"),
            tags: Vec::new(),
            category: Some(category.to_string()),
            length: None,
            lace_type: None,
            hair_type: None,
        }
    }

    fn catalog() -> Catalog<FixedSource> {
        Catalog::new(
            FixedSource {
                products: vec![product(1, "RedWig", "wigs"), product(2, "Comb", "tools")],
                calls: AtomicUsize::new(0),
            },
            DEFAULT_CACHE_TTL,
        )
    }

    #[tokio::test]
    async fn test_filters_by_category() {
        let catalog = catalog();
        let wigs = catalog.products(Some("wigs")).await.unwrap();
        assert_eq!(wigs.len(), 1);
        assert_eq!(wigs[0].name, "RedWig");

        assert_eq!(catalog.products(None).await.unwrap().len(), 2);
        assert_eq!(catalog.products(Some("")).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_listings_are_cached_until_invalidated() {
        let catalog = catalog();
        catalog.products(Some("wigs")).await.unwrap();
        catalog.products(Some("wigs")).await.unwrap();
        assert_eq!(catalog.source().calls.load(Ordering::SeqCst), 1);

        catalog.invalidate().await;
        catalog.products(Some("wigs")).await.unwrap();
        assert_eq!(catalog.source().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_search_reuses_full_listing() {
        let catalog = catalog();
        let hits = catalog.search("TOOLS", None).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Comb");

        assert!(catalog.search("tools", Some("wigs")).await.unwrap().is_empty());
        assert_eq!(
            catalog.categories().await.unwrap(),
            vec!["All", "wigs", "tools"]
        );
        assert_eq!(catalog.source().calls.load(Ordering::SeqCst), 1);
    }
}
