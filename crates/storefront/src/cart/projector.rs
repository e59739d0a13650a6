//! Render/sync projector: derives visible page state from the cart.
//!
//! Every projection is a pure function of the cart, the current currency and
//! the surfaces present on the page. Running one twice with unchanged input
//! leaves the page unchanged, so callers re-project freely.

use std::sync::Arc;

use askama::Template;
use rust_decimal::Decimal;
use vitrine_core::types::price::format_fixed;
use vitrine_core::{Cart, CurrencyContext, CurrencyProvider, PriceFormatter, ProductIdentity, RateFormatter};

use super::page::{Badge, CartRow, ControlState, Page};

/// Cart panel item list markup.
#[derive(Template)]
#[template(path = "partials/cart_items.html")]
struct CartItemsTemplate {
    rows: Vec<CartRow>,
}

/// Projects a [`Cart`] onto a [`Page`].
///
/// Both collaborators are optional. Without a currency provider prices show
/// in `$` at rate 1; without a formatter the built-in [`RateFormatter`] for
/// the current rate is used.
#[derive(Clone, Default)]
pub struct Projector {
    currency: Option<Arc<dyn CurrencyProvider>>,
    formatter: Option<Arc<dyn PriceFormatter>>,
}

impl Projector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the display currency from `provider` on every projection.
    #[must_use]
    pub fn with_currency(mut self, provider: Arc<dyn CurrencyProvider>) -> Self {
        self.currency = Some(provider);
        self
    }

    /// Format amounts with `formatter` instead of the built-in one.
    #[must_use]
    pub fn with_formatter(mut self, formatter: Arc<dyn PriceFormatter>) -> Self {
        self.formatter = Some(formatter);
        self
    }

    /// The currency in effect right now.
    #[must_use]
    pub fn currency(&self) -> CurrencyContext {
        self.currency
            .as_ref()
            .and_then(|provider| provider.current())
            .unwrap_or_default()
    }

    fn display(&self, currency: &CurrencyContext, amount_base: Decimal) -> String {
        let amount = match &self.formatter {
            Some(formatter) => formatter.format(amount_base),
            None => RateFormatter::new(currency.rate).format(amount_base),
        };
        format!("{}{amount}", currency.symbol)
    }

    /// Item rows, item markup, total and empty placeholder of the cart panel.
    pub fn project_cart_panel(&self, cart: &Cart, page: &mut Page) {
        let Some(panel) = page.cart_panel.as_mut() else {
            return;
        };
        let currency = self.currency();

        if cart.is_empty() {
            panel.rows.clear();
            panel.items_html.clear();
            panel.items_visible = false;
            panel.empty_visible = true;
            panel.total = format!("{}{}", currency.symbol, format_fixed(Decimal::ZERO));
            return;
        }

        let rows: Vec<CartRow> = cart
            .items()
            .iter()
            .map(|item| CartRow {
                identity: item.identity().clone(),
                quantity: item.quantity(),
                unit_price: self.display(&currency, item.unit_price_base()),
                unit_price_base: item.unit_price_base().to_string(),
            })
            .collect();

        let template = CartItemsTemplate { rows };
        panel.items_html = template.render().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to render cart items");
            String::new()
        });
        panel.rows = template.rows;
        panel.items_visible = true;
        panel.empty_visible = false;
        panel.total = self.display(&currency, cart.subtotal_base());
    }

    /// Header counter: total quantity, inactive and blank at zero.
    pub fn project_badge(&self, cart: &Cart, page: &mut Page) {
        let Some(badge) = page.badge.as_mut() else {
            return;
        };
        let count = cart.total_quantity();
        *badge = if count == 0 {
            Badge::default()
        } else {
            Badge {
                text: count.to_string(),
                active: true,
            }
        };
    }

    /// Add button or stepper on every surface showing `identity`.
    pub fn project_product_controls(&self, cart: &Cart, identity: &ProductIdentity, page: &mut Page) {
        let control = ControlState::for_quantity(cart.quantity_of(identity));
        for surface in page.surfaces_for(identity) {
            surface.control = control;
        }
    }

    /// Controls of every product on the page, e.g. after a grid rendered.
    pub fn sync_all_product_controls(&self, cart: &Cart, page: &mut Page) {
        for surface in page.gallery.iter_mut().chain(page.detail.iter_mut()) {
            surface.control = ControlState::for_quantity(cart.quantity_of(&surface.identity));
        }
    }

    /// Converted price labels on cards and the detail overlay.
    pub fn project_product_prices(&self, page: &mut Page) {
        let currency = self.currency();
        for surface in page.gallery.iter_mut().chain(page.detail.iter_mut()) {
            surface.price_label = self.display(&currency, surface.unit_price_base);
            surface.old_price_label = surface
                .old_price_base
                .map(|old| self.display(&currency, old))
                .unwrap_or_default();
        }
    }

    /// Every projection, in order.
    pub fn project_all(&self, cart: &Cart, page: &mut Page) {
        self.project_cart_panel(cart, page);
        self.project_badge(cart, page);
        self.project_product_prices(page);
        self.sync_all_product_controls(cart, page);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use vitrine_core::CurrencyCode;

    use super::*;
    use crate::cart::page::ProductSurface;

    fn red_wig() -> ProductIdentity {
        ProductIdentity::new("A.png", "RedWig")
    }

    fn euro_at_two() -> CurrencyContext {
        CurrencyContext {
            code: CurrencyCode::EUR,
            symbol: "€".to_string(),
            rate: Decimal::TWO,
        }
    }

    struct Unavailable;

    impl CurrencyProvider for Unavailable {
        fn current(&self) -> Option<CurrencyContext> {
            None
        }
    }

    struct Bracketed;

    impl PriceFormatter for Bracketed {
        fn format(&self, amount_base: Decimal) -> String {
            format!("[{amount_base}]")
        }
    }

    #[test]
    fn test_single_item_panel_in_dollars() {
        let mut cart = Cart::new();
        cart.add_or_increment(&red_wig(), Decimal::new(2500, 2));
        let mut page = Page::with_chrome();

        Projector::new().project_all(&cart, &mut page);

        let panel = page.cart_panel.as_ref().unwrap();
        assert_eq!(panel.rows.len(), 1);
        assert_eq!(panel.rows[0].unit_price, "$25.00");
        assert_eq!(panel.total, "$25.00");
        assert!(panel.items_visible);
        assert!(!panel.empty_visible);
        assert!(panel.items_html.contains("RedWig"));
        assert!(panel.items_html.contains("$25.00"));
        assert_eq!(page.badge.as_ref().unwrap().text, "1");
    }

    #[test]
    fn test_currency_switch_converts_rows_and_total() {
        let mut cart = Cart::new();
        cart.add_or_increment(&red_wig(), Decimal::new(2500, 2));
        cart.add_or_increment(&red_wig(), Decimal::new(2500, 2));
        let mut page = Page::with_chrome();

        Projector::new()
            .with_currency(Arc::new(euro_at_two()))
            .project_cart_panel(&cart, &mut page);

        let panel = page.cart_panel.as_ref().unwrap();
        assert_eq!(panel.rows[0].unit_price, "€50.00");
        assert_eq!(panel.rows[0].unit_price_base, "25.00");
        assert_eq!(panel.total, "€100.00");
        assert_eq!(cart.get(&red_wig()).unwrap().unit_price_base(), Decimal::new(2500, 2));
    }

    #[test]
    fn test_empty_cart_shows_placeholder() {
        let mut page = Page::with_chrome();
        Projector::new()
            .with_currency(Arc::new(CurrencyCode::HTG.context()))
            .project_all(&Cart::new(), &mut page);

        let panel = page.cart_panel.as_ref().unwrap();
        assert!(panel.empty_visible);
        assert!(!panel.items_visible);
        assert!(panel.items_html.is_empty());
        assert_eq!(panel.total, "G0.00");

        let badge = page.badge.as_ref().unwrap();
        assert!(badge.text.is_empty());
        assert!(!badge.active);
    }

    #[test]
    fn test_missing_surfaces_are_skipped() {
        let mut cart = Cart::new();
        cart.add_or_increment(&red_wig(), Decimal::ONE);
        let mut page = Page::default();

        Projector::new().project_all(&cart, &mut page);

        assert_eq!(page, Page::default());
    }

    #[test]
    fn test_projection_is_idempotent() {
        let mut cart = Cart::new();
        cart.add_or_increment(&red_wig(), Decimal::new(2500, 2));
        cart.add_or_increment(&ProductIdentity::new("b.png", "Bob <HD>"), Decimal::new(40, 0));
        let mut page = Page::with_chrome();
        page.gallery.push(ProductSurface::new(red_wig(), Decimal::new(2500, 2)));
        let projector = Projector::new().with_currency(Arc::new(CurrencyCode::DOP.context()));

        projector.project_all(&cart, &mut page);
        let first = page.clone();
        projector.project_all(&cart, &mut page);

        assert_eq!(page, first);
    }

    #[test]
    fn test_markup_escapes_product_names() {
        let mut cart = Cart::new();
        cart.add_or_increment(&ProductIdentity::new("b.png", "Bob <HD>"), Decimal::ONE);
        let mut page = Page::with_chrome();

        Projector::new().project_cart_panel(&cart, &mut page);

        let html = &page.cart_panel.as_ref().unwrap().items_html;
        assert!(html.contains("Bob &#60;HD&#62;") || html.contains("Bob &lt;HD&gt;"));
        assert!(!html.contains("<HD>"));
    }

    #[test]
    fn test_unavailable_provider_falls_back_to_dollars() {
        let mut cart = Cart::new();
        cart.add_or_increment(&red_wig(), Decimal::new(10, 0));
        let mut page = Page::with_chrome();

        Projector::new()
            .with_currency(Arc::new(Unavailable))
            .project_cart_panel(&cart, &mut page);

        assert_eq!(page.cart_panel.unwrap().total, "$10.00");
    }

    #[test]
    fn test_custom_formatter_is_used() {
        let mut cart = Cart::new();
        cart.add_or_increment(&red_wig(), Decimal::new(10, 0));
        let mut page = Page::with_chrome();

        Projector::new()
            .with_formatter(Arc::new(Bracketed))
            .project_cart_panel(&cart, &mut page);

        assert_eq!(page.cart_panel.unwrap().total, "$[10]");
    }

    #[test]
    fn test_controls_follow_quantity() {
        let mut cart = Cart::new();
        let mut page = Page::with_chrome();
        page.gallery.push(ProductSurface::new(red_wig(), Decimal::ONE));
        page.detail = Some(ProductSurface::new(red_wig(), Decimal::ONE));
        let projector = Projector::new();

        cart.add_or_increment(&red_wig(), Decimal::ONE);
        cart.add_or_increment(&red_wig(), Decimal::ONE);
        projector.project_product_controls(&cart, &red_wig(), &mut page);
        assert_eq!(page.gallery[0].control, ControlState::Stepper { quantity: 2 });
        assert_eq!(page.detail.as_ref().unwrap().control, ControlState::Stepper { quantity: 2 });

        cart.remove(&red_wig());
        projector.project_product_controls(&cart, &red_wig(), &mut page);
        assert_eq!(page.gallery[0].control, ControlState::Add);
        assert_eq!(page.detail.as_ref().unwrap().control, ControlState::Add);
    }

    #[test]
    fn test_product_prices_convert_with_currency() {
        let mut page = Page::default();
        page.gallery.push(
            ProductSurface::new(red_wig(), Decimal::new(100, 0))
                .with_old_price(Some(Decimal::new(120, 0))),
        );
        page.gallery.push(ProductSurface::new(ProductIdentity::new("b.png", "Bob"), Decimal::ONE));

        Projector::new()
            .with_currency(Arc::new(CurrencyCode::EUR.context()))
            .project_product_prices(&mut page);

        assert_eq!(page.gallery[0].price_label, "€92.00");
        assert_eq!(page.gallery[0].old_price_label, "€110.40");
        assert_eq!(page.gallery[1].old_price_label, "");
    }
}
