//! One browsing context's cart: aggregate, store, projector and page.
//!
//! [`CartSession::apply`] is the only way the cart changes from user input.
//! It always mutates, then writes the slot, then re-projects the whole page,
//! so no caller can leave the page or the slot stale.

use std::sync::Arc;

use rust_decimal::Decimal;
use vitrine_core::{Cart, CartMutation, MutationOutcome, ProductIdentity};

use super::page::{Page, ProductSurface};
use super::projector::Projector;
use super::storage::StorageArea;
use super::store::CartStore;
use super::sync::CrossTabListener;
use crate::checkout::{self, CheckoutError};

/// The cart state of one browsing context.
pub struct CartSession {
    cart: Cart,
    store: CartStore,
    projector: Projector,
    page: Page,
    listener: Option<CrossTabListener>,
}

impl CartSession {
    /// Start a browsing context on `storage`.
    ///
    /// Subscribes to cross-tab changes, hydrates the cart from the slot and
    /// projects it onto `page`.
    #[must_use]
    pub fn open(storage: Arc<dyn StorageArea>, projector: Projector, page: Page) -> Self {
        // Subscribe before loading so a write landing in between is not lost.
        let listener = CrossTabListener::attach(storage.as_ref());
        let store = CartStore::new(Arc::clone(&storage));
        let cart = store.load();

        let mut session = Self {
            cart,
            store,
            projector,
            page,
            listener,
        };
        session.refresh();

        tracing::debug!(
            context = %storage.context(),
            lines = session.cart.len(),
            cross_tab = session.listener.is_some(),
            "Cart session opened"
        );
        session
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub const fn page(&self) -> &Page {
        &self.page
    }

    #[must_use]
    pub const fn projector(&self) -> &Projector {
        &self.projector
    }

    /// Apply a mutation: mutate, persist, re-project.
    ///
    /// Mutations of an absent identity change nothing but are still
    /// persisted and projected.
    pub fn apply(&mut self, mutation: CartMutation) -> MutationOutcome {
        let outcome = self.cart.apply(&mutation);
        self.store.save(&self.cart);
        self.projector.project_all(&self.cart, &mut self.page);

        tracing::debug!(
            identity = %mutation.identity(),
            ?outcome,
            total_quantity = self.cart.total_quantity(),
            "Cart mutation applied"
        );
        outcome
    }

    /// Add one unit from a product surface. Returns the new quantity.
    pub fn add_to_cart(&mut self, identity: ProductIdentity, unit_price_base: Decimal) -> u32 {
        self.apply(CartMutation::AddOrIncrement {
            identity,
            unit_price_base,
        })
        .quantity()
    }

    pub fn increment(&mut self, identity: ProductIdentity) -> MutationOutcome {
        self.apply(CartMutation::Increment(identity))
    }

    pub fn decrement(&mut self, identity: ProductIdentity) -> MutationOutcome {
        self.apply(CartMutation::Decrement(identity))
    }

    pub fn remove(&mut self, identity: ProductIdentity) -> MutationOutcome {
        self.apply(CartMutation::Remove(identity))
    }

    /// Re-project everything without touching the cart, e.g. after the
    /// display currency changed.
    pub fn refresh(&mut self) {
        self.projector.project_all(&self.cart, &mut self.page);
    }

    /// Replace the product grid and bring its cards in line with the cart.
    pub fn show_products(&mut self, products: Vec<ProductSurface>) {
        self.page.gallery = products;
        self.projector.project_product_prices(&mut self.page);
        self.projector
            .sync_all_product_controls(&self.cart, &mut self.page);
    }

    /// Open the detail overlay for a product.
    pub fn open_detail(&mut self, product: ProductSurface) {
        self.page.detail = Some(product);
        self.projector.project_product_prices(&mut self.page);
        self.projector
            .sync_all_product_controls(&self.cart, &mut self.page);
    }

    pub fn close_detail(&mut self) {
        self.page.detail = None;
    }

    /// Replace the cart wholesale from the slot and re-project. Never writes.
    pub fn reload_from_store(&mut self) {
        self.cart = self.store.load();
        self.refresh();
        tracing::debug!(lines = self.cart.len(), "Cart reloaded from storage");
    }

    /// Apply any cart changes other contexts made since the last call.
    ///
    /// Returns whether the cart was reloaded.
    pub fn sync_pending(&mut self) -> bool {
        let changed = self
            .listener
            .as_mut()
            .is_some_and(CrossTabListener::poll);
        if changed {
            self.reload_from_store();
        }
        changed
    }

    /// Wait for the next cart change from another context and apply it.
    ///
    /// Returns `false` immediately when the storage cannot notify, or once
    /// it is gone.
    pub async fn follow_external_change(&mut self) -> bool {
        let Some(listener) = self.listener.as_mut() else {
            return false;
        };
        if !listener.changed().await {
            return false;
        }
        self.reload_from_store();
        true
    }

    /// Gate for the checkout button.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` when there is nothing to check out.
    pub fn begin_checkout(&self) -> Result<(), CheckoutError> {
        checkout::ensure_not_empty(&self.cart)
    }
}
