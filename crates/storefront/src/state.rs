//! State shared by the listing handlers.

use std::time::Duration;

use sqlx::PgPool;

use crate::catalog::Catalog;

/// Handler state. Clones share one catalog and its cache.
#[derive(Clone)]
pub struct AppState {
    catalog: Catalog,
}

impl AppState {
    /// Catalog over `pool` whose listings live for `cache_ttl`.
    #[must_use]
    pub fn new(pool: PgPool, cache_ttl: Duration) -> Self {
        Self {
            catalog: Catalog::new(pool, cache_ttl),
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Pool behind the catalog, for readiness checks.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        self.catalog.source()
    }
}
