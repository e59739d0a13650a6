//! Visible page state the projector writes into.
//!
//! A [`Page`] is the retained model of every surface that shows cart data in
//! one browsing context. A surface that is absent from the page is `None` and
//! projections targeting it are skipped.

use rust_decimal::Decimal;
use vitrine_core::{Product, ProductIdentity};

/// Control shown for a product on a card or in the detail overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlState {
    /// "Add to cart" button; quantity is zero.
    #[default]
    Add,
    /// Quantity stepper showing the current quantity.
    Stepper { quantity: u32 },
}

impl ControlState {
    /// The control for a given cart quantity.
    #[must_use]
    pub const fn for_quantity(quantity: u32) -> Self {
        if quantity == 0 {
            Self::Add
        } else {
            Self::Stepper { quantity }
        }
    }
}

/// One row of the cart panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartRow {
    pub identity: ProductIdentity,
    pub quantity: u32,
    /// Converted unit price with symbol, e.g. `€50.00`.
    pub unit_price: String,
    /// Unit price in USD as stored, e.g. `25.00`.
    pub unit_price_base: String,
}

/// The slide-out cart panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartPanel {
    pub rows: Vec<CartRow>,
    /// Rendered item list markup.
    pub items_html: String,
    pub items_visible: bool,
    /// The "your cart is empty" placeholder.
    pub empty_visible: bool,
    /// Converted total with symbol.
    pub total: String,
}

impl Default for CartPanel {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            items_html: String::new(),
            items_visible: false,
            empty_visible: true,
            total: String::new(),
        }
    }
}

/// Header cart counter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Badge {
    /// Total quantity, or empty when the cart is empty.
    pub text: String,
    pub active: bool,
}

/// A product shown on the page: a gallery card or the detail overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSurface {
    pub identity: ProductIdentity,
    pub unit_price_base: Decimal,
    pub old_price_base: Option<Decimal>,
    /// Converted price label with symbol.
    pub price_label: String,
    /// Converted old price label; empty when there is no old price.
    pub old_price_label: String,
    pub control: ControlState,
}

impl ProductSurface {
    /// A surface for a product, not yet projected.
    #[must_use]
    pub const fn new(identity: ProductIdentity, unit_price_base: Decimal) -> Self {
        Self {
            identity,
            unit_price_base,
            old_price_base: None,
            price_label: String::new(),
            old_price_label: String::new(),
            control: ControlState::Add,
        }
    }

    #[must_use]
    pub fn with_old_price(mut self, old_price_base: Option<Decimal>) -> Self {
        self.old_price_base = old_price_base;
        self
    }
}

impl From<&Product> for ProductSurface {
    fn from(product: &Product) -> Self {
        Self::new(product.identity(), product.price).with_old_price(product.old_price)
    }
}

/// Everything visible in one browsing context.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Page {
    pub cart_panel: Option<CartPanel>,
    pub badge: Option<Badge>,
    /// Product cards, in grid order. Empty until a grid is rendered.
    pub gallery: Vec<ProductSurface>,
    /// The product-detail overlay, when open.
    pub detail: Option<ProductSurface>,
}

impl Page {
    /// A page with the site chrome (cart panel and badge) but no products.
    #[must_use]
    pub fn with_chrome() -> Self {
        Self {
            cart_panel: Some(CartPanel::default()),
            badge: Some(Badge::default()),
            ..Self::default()
        }
    }

    /// Every surface currently showing `identity`.
    pub fn surfaces_for<'a>(
        &'a mut self,
        identity: &'a ProductIdentity,
    ) -> impl Iterator<Item = &'a mut ProductSurface> + 'a {
        self.gallery
            .iter_mut()
            .chain(self.detail.iter_mut())
            .filter(move |surface| &surface.identity == identity)
    }
}
