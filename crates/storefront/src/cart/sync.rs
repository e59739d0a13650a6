//! Cross-tab consistency listener.
//!
//! Watches the storage area for cart changes made by other browsing
//! contexts. The listener never writes; the owning session reloads its cart
//! from the store and re-projects when told the slot changed.

use super::storage::{Notification, StorageArea, StorageSubscription};
use super::store::CART_SLOT;

/// Reports changes to the cart slot made elsewhere.
pub struct CrossTabListener {
    subscription: StorageSubscription,
}

impl CrossTabListener {
    #[must_use]
    pub const fn new(subscription: StorageSubscription) -> Self {
        Self { subscription }
    }

    /// Subscribe to `storage`, if it can deliver notifications.
    #[must_use]
    pub fn attach(storage: &dyn StorageArea) -> Option<Self> {
        storage.subscribe().map(Self::new)
    }

    /// Drain pending notifications without waiting.
    ///
    /// Returns `true` if any of them may have changed the cart slot. Any
    /// number of pending changes collapses into a single reload.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Some(notification) = self.subscription.try_next() {
            changed |= touches_cart(&notification);
        }
        changed
    }

    /// Wait until the cart slot changes in another context.
    ///
    /// Returns `false` once the storage area is gone.
    pub async fn changed(&mut self) -> bool {
        while let Some(notification) = self.subscription.next().await {
            if touches_cart(&notification) {
                return true;
            }
        }
        false
    }
}

fn touches_cart(notification: &Notification) -> bool {
    match notification {
        Notification::Changed(event) => event.affects(CART_SLOT),
        Notification::Missed(missed) => {
            tracing::debug!(missed, "Storage notifications dropped, resynchronizing");
            true
        }
    }
}
