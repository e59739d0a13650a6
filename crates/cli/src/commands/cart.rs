//! Local cart commands.
//!
//! Each invocation is one browsing context over a file-backed storage area,
//! so the cart and currency survive between runs just as they survive page
//! reloads.
//!
//! # Usage
//!
//! ```bash
//! vt-cli cart add --img A.png --name RedWig --price 25.00
//! vt-cli cart inc "A.png|RedWig"
//! vt-cli cart currency EUR
//! vt-cli cart show
//! vt-cli cart checkout --name Ana --payment pickup --branch petion-ville
//! ```

use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::info;

use vitrine_core::{CurrencyCode, MutationOutcome, ProductIdentity};
use vitrine_storefront::cart::{CartSession, CartStore, FileStorage, Page, Projector, StorageArea};
use vitrine_storefront::checkout::{
    CheckoutOrder, CheckoutOutcome, CheckoutSummary, PaymentMethod, place_order,
};
use vitrine_storefront::currency::CurrencySelector;

/// One browsing context hosted by the CLI.
pub struct CartHost {
    storage: Arc<dyn StorageArea>,
    selector: Arc<CurrencySelector>,
    session: CartSession,
}

impl CartHost {
    /// Open the context stored at `path`.
    #[must_use]
    pub fn open(path: &Path) -> Self {
        let storage: Arc<dyn StorageArea> = Arc::new(FileStorage::new(path));
        Self::with_storage(storage)
    }

    #[must_use]
    pub fn with_storage(storage: Arc<dyn StorageArea>) -> Self {
        let selector = Arc::new(CurrencySelector::load(Arc::clone(&storage)));
        let projector = Projector::new().with_currency(Arc::clone(&selector) as _);
        let session = CartSession::open(Arc::clone(&storage), projector, Page::with_chrome());

        Self {
            storage,
            selector,
            session,
        }
    }

    #[must_use]
    pub const fn session(&self) -> &CartSession {
        &self.session
    }

    /// Add one unit of a product.
    pub fn add(&mut self, identity: ProductIdentity, price: Decimal) -> String {
        let name = identity.name.clone();
        let quantity = self.session.add_to_cart(identity, price);
        format!("{name}: {quantity}\n{}", render_page(self.session.page()))
    }

    pub fn increment(&mut self, identity: ProductIdentity) -> String {
        let outcome = self.session.increment(identity.clone());
        self.report(&identity, outcome)
    }

    pub fn decrement(&mut self, identity: ProductIdentity) -> String {
        let outcome = self.session.decrement(identity.clone());
        self.report(&identity, outcome)
    }

    pub fn remove(&mut self, identity: ProductIdentity) -> String {
        let outcome = self.session.remove(identity.clone());
        self.report(&identity, outcome)
    }

    fn report(&self, identity: &ProductIdentity, outcome: MutationOutcome) -> String {
        let status = match outcome {
            MutationOutcome::Quantity(0) => format!("{}: removed", identity.name),
            MutationOutcome::Quantity(quantity) => format!("{}: {quantity}", identity.name),
            MutationOutcome::NotFound => format!("{}: not in cart", identity.name),
        };
        format!("{status}\n{}", render_page(self.session.page()))
    }

    #[must_use]
    pub fn show(&self) -> String {
        render_page(self.session.page())
    }

    /// Switch the display currency and re-project.
    ///
    /// # Errors
    ///
    /// Returns an error if the selection cannot be saved.
    pub fn select_currency(&mut self, code: CurrencyCode) -> Result<String, Box<dyn std::error::Error>> {
        self.selector.select(code)?;
        self.session.refresh();
        Ok(format!(
            "Currency: {} {code}\n{}",
            code.flag(),
            render_page(self.session.page())
        ))
    }

    /// The currency panel, one row per currency with the selection marked.
    #[must_use]
    pub fn currencies(&self) -> String {
        let mut out = String::new();
        for option in self.selector.options() {
            let marker = if option.selected { '*' } else { ' ' };
            let _ = writeln!(
                out,
                "{marker} {} {} {:<3} {}",
                option.flag, option.code, option.symbol, option.rate
            );
        }
        out
    }

    /// Print the summary, then place the order.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart is empty or the order is incomplete.
    pub fn checkout(&self, order: &CheckoutOrder) -> Result<String, Box<dyn std::error::Error>> {
        let store = CartStore::new(Arc::clone(&self.storage));
        let summary = CheckoutSummary::from_store(&store, self.selector.as_ref());
        let mut out = render_summary(&summary);

        self.session.begin_checkout()?;
        match place_order(&store, order)? {
            CheckoutOutcome::Redirect(method) => {
                let _ = writeln!(out, "Continue payment with {method}.");
            }
            CheckoutOutcome::Placed { confirmation } => {
                info!("Order placed");
                let _ = writeln!(out, "{confirmation}");
            }
        }
        Ok(out)
    }
}

/// Text rendering of the cart panel and badge.
#[must_use]
pub fn render_page(page: &Page) -> String {
    let mut out = String::new();

    if let Some(badge) = &page.badge {
        let count = if badge.active { badge.text.as_str() } else { "0" };
        let _ = writeln!(out, "Cart ({count})");
    }

    if let Some(panel) = &page.cart_panel {
        if panel.empty_visible {
            let _ = writeln!(out, "  Your cart is empty.");
        }
        for row in &panel.rows {
            let _ = writeln!(
                out,
                "  {} x{}  {}  [{}]",
                row.identity.name, row.quantity, row.unit_price, row.identity
            );
        }
        let _ = writeln!(out, "Total: {}", panel.total);
    }

    out
}

fn render_summary(summary: &CheckoutSummary) -> String {
    let mut out = String::from("Checkout\n");
    if let Some(message) = &summary.message {
        let _ = writeln!(out, "  {message}");
    }
    for line in &summary.lines {
        let _ = writeln!(
            out,
            "  {}  Quantity: {}  {}",
            line.name, line.quantity, line.unit_price
        );
    }
    if !summary.total.is_empty() {
        let _ = writeln!(out, "Total: {}", summary.total);
    }
    out
}

/// Build the order from command-line arguments.
///
/// # Errors
///
/// Returns an error for an unknown payment method.
pub fn order_from_args(
    name: String,
    payment: &str,
    branch: Option<String>,
) -> Result<CheckoutOrder, Box<dyn std::error::Error>> {
    let payment = match payment.parse::<PaymentMethod>()? {
        PaymentMethod::Pickup { .. } => PaymentMethod::Pickup { branch },
        other => other,
    };
    Ok(CheckoutOrder { name, payment })
}
