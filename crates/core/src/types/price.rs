//! Decimal price arithmetic and display formatting.
//!
//! All stored prices are in the store reference currency (USD). Conversion
//! to the selected display currency happens only at formatting time; the
//! converted value is never written back.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places shown for every displayed amount.
pub const DISPLAY_SCALE: u32 = 2;

/// Formats a base-currency amount for display.
///
/// Implementations decide how the base amount is converted; the projector
/// only prepends the currency symbol.
pub trait PriceFormatter: Send + Sync {
    /// Render `amount_base` (reference currency) as display text without a
    /// currency symbol.
    fn format(&self, amount_base: Decimal) -> String;
}

/// Built-in formatter: multiply by a conversion rate, show two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateFormatter {
    rate: Decimal,
}

impl RateFormatter {
    /// Create a formatter for the given conversion rate.
    #[must_use]
    pub const fn new(rate: Decimal) -> Self {
        Self { rate }
    }
}

impl Default for RateFormatter {
    fn default() -> Self {
        Self::new(Decimal::ONE)
    }
}

impl PriceFormatter for RateFormatter {
    fn format(&self, amount_base: Decimal) -> String {
        format_fixed(convert(amount_base, self.rate))
    }
}

/// Convert a base amount with the given rate.
#[must_use]
pub fn convert(amount_base: Decimal, rate: Decimal) -> Decimal {
    amount_base.saturating_mul(rate)
}

/// Round half away from zero to two places and always render two places.
///
/// `25` renders as `25.00`, `1.005` as `1.01`.
#[must_use]
pub fn format_fixed(amount: Decimal) -> String {
    let mut rounded =
        amount.round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(DISPLAY_SCALE);
    rounded.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_fixed_pads_and_rounds() {
        assert_eq!(format_fixed(Decimal::new(25, 0)), "25.00");
        assert_eq!(format_fixed(Decimal::new(255, 1)), "25.50");
        assert_eq!(format_fixed(Decimal::new(1005, 3)), "1.01");
        assert_eq!(format_fixed(Decimal::ZERO), "0.00");
    }

    #[test]
    fn test_rate_formatter_converts() {
        let formatter = RateFormatter::new(Decimal::new(92, 2));
        assert_eq!(formatter.format(Decimal::new(100, 0)), "92.00");
        assert_eq!(RateFormatter::default().format(Decimal::new(2500, 2)), "25.00");
    }
}
