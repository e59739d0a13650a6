//! Checkout summary and order placement.
//!
//! Checkout reads the cart straight from the durable slot rather than from a
//! session, so it works from any browsing context. Placing an order that is
//! settled on site empties the slot; other contexts see the removal and
//! re-project an empty cart.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;
use vitrine_core::{Cart, CurrencyContext, CurrencyProvider, PriceFormatter, RateFormatter};

use crate::cart::store::CartStore;

/// Shown instead of the line list when the cart is empty.
pub const EMPTY_SUMMARY: &str = "Your cart is empty.";

/// Checkout errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("Your cart is empty!")]
    EmptyCart,
    #[error("Please select a pickup branch.")]
    MissingBranch,
    #[error("Unknown payment method: {0}")]
    UnknownPaymentMethod(String),
}

/// Refuse to check out an empty cart.
///
/// # Errors
///
/// Returns `CheckoutError::EmptyCart` when `cart` has no lines.
pub fn ensure_not_empty(cart: &Cart) -> Result<(), CheckoutError> {
    if cart.is_empty() {
        Err(CheckoutError::EmptyCart)
    } else {
        Ok(())
    }
}

// =============================================================================
// Summary
// =============================================================================

/// One line of the checkout summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutLine {
    pub name: String,
    pub img: String,
    pub quantity: u32,
    /// Converted unit price with symbol.
    pub unit_price: String,
}

/// What the checkout page shows next to the order form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSummary {
    pub lines: Vec<CheckoutLine>,
    /// Converted total with symbol; empty when the cart is empty.
    pub total: String,
    /// Message replacing the line list, if any.
    pub message: Option<String>,
    pub submit_enabled: bool,
}

impl CheckoutSummary {
    /// Summarize `cart` in the currency `currency` currently provides.
    #[must_use]
    pub fn build(cart: &Cart, currency: &dyn CurrencyProvider) -> Self {
        if cart.is_empty() {
            return Self {
                lines: Vec::new(),
                total: String::new(),
                message: Some(EMPTY_SUMMARY.to_string()),
                submit_enabled: false,
            };
        }

        let currency = currency.current().unwrap_or_default();
        let lines = cart
            .items()
            .iter()
            .map(|item| CheckoutLine {
                name: item.name().to_string(),
                img: item.img().to_string(),
                quantity: item.quantity(),
                unit_price: display(&currency, item.unit_price_base()),
            })
            .collect();

        Self {
            lines,
            total: display(&currency, cart.subtotal_base()),
            message: None,
            submit_enabled: true,
        }
    }

    /// Summarize whatever the durable slot holds.
    #[must_use]
    pub fn from_store(store: &CartStore, currency: &dyn CurrencyProvider) -> Self {
        Self::build(&store.load(), currency)
    }
}

fn display(currency: &CurrencyContext, amount_base: Decimal) -> String {
    let formatted = RateFormatter::new(currency.rate).format(amount_base);
    format!("{}{formatted}", currency.symbol)
}

// =============================================================================
// Order placement
// =============================================================================

/// How the shopper pays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentMethod {
    PayPal,
    Card,
    MonCash,
    /// Pay on collection at a store branch.
    Pickup { branch: Option<String> },
    /// Pay on delivery.
    Delivery,
}

impl PaymentMethod {
    /// Whether payment happens with an external provider before the order
    /// is settled.
    #[must_use]
    pub const fn is_external(&self) -> bool {
        matches!(self, Self::PayPal | Self::Card | Self::MonCash)
    }
}

impl FromStr for PaymentMethod {
    type Err = CheckoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "paypal" => Ok(Self::PayPal),
            "card" => Ok(Self::Card),
            "moncash" => Ok(Self::MonCash),
            "pickup" => Ok(Self::Pickup { branch: None }),
            "delivery" => Ok(Self::Delivery),
            other => Err(CheckoutError::UnknownPaymentMethod(other.to_string())),
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::PayPal => "paypal",
            Self::Card => "card",
            Self::MonCash => "moncash",
            Self::Pickup { .. } => "pickup",
            Self::Delivery => "delivery",
        })
    }
}

/// The submitted checkout form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutOrder {
    pub name: String,
    pub payment: PaymentMethod,
}

/// Result of submitting the checkout form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Payment continues with an external provider; the cart is kept.
    Redirect(PaymentMethod),
    /// The order is placed and the cart slot cleared.
    Placed { confirmation: String },
}

/// Submit `order` for the cart in `store`.
///
/// # Errors
///
/// Returns `CheckoutError::EmptyCart` if the slot holds no cart and
/// `CheckoutError::MissingBranch` for a pickup without a branch.
pub fn place_order(store: &CartStore, order: &CheckoutOrder) -> Result<CheckoutOutcome, CheckoutError> {
    ensure_not_empty(&store.load())?;

    let confirmation = match &order.payment {
        method if method.is_external() => {
            tracing::info!(payment = %method, "Checkout handed to payment provider");
            return Ok(CheckoutOutcome::Redirect(method.clone()));
        }
        PaymentMethod::Pickup { branch } => {
            let branch = branch
                .as_deref()
                .map(str::trim)
                .filter(|b| !b.is_empty())
                .ok_or(CheckoutError::MissingBranch)?;
            format!(
                "Thank you {}, your order will be ready for pickup at {}.",
                order.name,
                branch.replacen('-', " ", 1)
            )
        }
        _ => format!("Thank you {}, your delivery is on its way!", order.name),
    };

    store.clear();
    tracing::info!(payment = %order.payment, "Order placed, cart cleared");
    Ok(CheckoutOutcome::Placed { confirmation })
}
