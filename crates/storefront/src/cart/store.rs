//! Persistent cart store: the cart's durable slot.
//!
//! The slot holds the whole cart as one JSON array under [`CART_SLOT`].
//! Loading never fails (absent or unreadable content yields an empty cart)
//! and saving is fire-and-forget.

use std::sync::Arc;

use vitrine_core::Cart;

use super::storage::StorageArea;

/// Storage key of the serialized cart.
pub const CART_SLOT: &str = "cart";

/// Reads and writes the cart slot of a storage area.
#[derive(Clone)]
pub struct CartStore {
    storage: Arc<dyn StorageArea>,
}

impl CartStore {
    #[must_use]
    pub fn new(storage: Arc<dyn StorageArea>) -> Self {
        Self { storage }
    }

    /// The storage area this store writes to.
    #[must_use]
    pub fn storage(&self) -> &Arc<dyn StorageArea> {
        &self.storage
    }

    /// Load the cart from the slot.
    ///
    /// An absent slot, a JSON `null` or content that does not parse as a
    /// list of line items all yield an empty cart.
    #[must_use]
    pub fn load(&self) -> Cart {
        let Some(raw) = self.storage.get_item(CART_SLOT) else {
            return Cart::new();
        };

        match serde_json::from_str::<Option<Cart>>(&raw) {
            Ok(cart) => cart.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "Stored cart is unreadable, starting empty");
                Cart::new()
            }
        }
    }

    /// Overwrite the slot with `cart`.
    ///
    /// Failures are logged; the in-memory cart stays authoritative.
    pub fn save(&self, cart: &Cart) {
        let serialized = match serde_json::to_string(cart) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize cart");
                return;
            }
        };

        if let Err(e) = self.storage.set_item(CART_SLOT, &serialized) {
            tracing::warn!(error = %e, "Failed to persist cart");
        }
    }

    /// Delete the slot, e.g. after a completed checkout.
    pub fn clear(&self) {
        if let Err(e) = self.storage.remove_item(CART_SLOT) {
            tracing::warn!(error = %e, "Failed to clear stored cart");
        }
    }
}
