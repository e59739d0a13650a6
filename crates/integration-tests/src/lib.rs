//! Integration tests for Vitrine.
//!
//! # Running Tests
//!
//! ```bash
//! # Cart engine scenarios (no services needed)
//! cargo test -p vitrine-integration-tests
//!
//! # Listing API tests against a running, seeded storefront
//! cargo test -p vitrine-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `cart_tabs` - Several browsing contexts sharing one storage area
//! - `cart_currency` - Currency switching and checkout
//! - `storefront_api` - Listing endpoints over HTTP

use std::sync::Arc;

use vitrine_storefront::cart::{CartSession, Page, Projector, StorageArea};
use vitrine_storefront::currency::CurrencySelector;

/// Base URL for the storefront (configurable via environment).
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// A browsing context as a page would set it up: currency selector feeding
/// the projector, site chrome on the page.
pub struct Tab {
    pub currency: Arc<CurrencySelector>,
    pub session: CartSession,
}

impl Tab {
    /// Open a context on `storage`.
    #[must_use]
    pub fn open(storage: Arc<dyn StorageArea>) -> Self {
        let currency = Arc::new(CurrencySelector::load(Arc::clone(&storage)));
        let projector = Projector::new().with_currency(Arc::clone(&currency) as _);
        let session = CartSession::open(storage, projector, Page::with_chrome());
        Self { currency, session }
    }

    /// Cart panel total as displayed.
    #[must_use]
    pub fn total(&self) -> &str {
        self.session
            .page()
            .cart_panel
            .as_ref()
            .map_or("", |panel| panel.total.as_str())
    }

    /// Header badge text as displayed.
    #[must_use]
    pub fn badge(&self) -> &str {
        self.session
            .page()
            .badge
            .as_ref()
            .map_or("", |badge| badge.text.as_str())
    }
}
