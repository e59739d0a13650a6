//! Display currencies and the currency context read by projections.
//!
//! Conversion rates are fixed multipliers from the store reference
//! currency (USD). They are display-only: the cart always stores USD.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Currencies the storefront can display prices in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    CAD,
    EUR,
    HTG,
    DOP,
}

impl CurrencyCode {
    /// Every supported currency, in selector order.
    pub const ALL: [Self; 5] = [Self::USD, Self::CAD, Self::EUR, Self::HTG, Self::DOP];

    /// ISO 4217 code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::CAD => "CAD",
            Self::EUR => "EUR",
            Self::HTG => "HTG",
            Self::DOP => "DOP",
        }
    }

    /// Symbol prefixed to displayed amounts.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::USD | Self::CAD => "$",
            Self::EUR => "€",
            Self::HTG => "G",
            Self::DOP => "RD$",
        }
    }

    /// Flag emoji shown in the currency list.
    #[must_use]
    pub const fn flag(self) -> &'static str {
        match self {
            Self::USD => "🇺🇸",
            Self::CAD => "🇨🇦",
            Self::EUR => "🇪🇺",
            Self::HTG => "🇭🇹",
            Self::DOP => "🇩🇴",
        }
    }

    /// Flag icon asset for the header button.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::USD => "assets/icons/american-flag.svg",
            Self::CAD => "assets/icons/canada-flag.svg",
            Self::EUR => "assets/icons/europe-flag.svg",
            Self::HTG => "assets/icons/haitian-flag.svg",
            Self::DOP => "assets/icons/dominican-flag.svg",
        }
    }

    /// Multiplier from USD.
    #[must_use]
    pub const fn rate(self) -> Decimal {
        match self {
            Self::USD => Decimal::ONE,
            Self::CAD => Decimal::from_parts(132, 0, 0, false, 2),
            Self::EUR => Decimal::from_parts(92, 0, 0, false, 2),
            Self::HTG => Decimal::from_parts(13245, 0, 0, false, 2),
            Self::DOP => Decimal::from_parts(5875, 0, 0, false, 2),
        }
    }

    /// The projection context for this currency.
    #[must_use]
    pub fn context(self) -> CurrencyContext {
        CurrencyContext {
            code: self,
            symbol: self.symbol().to_string(),
            rate: self.rate(),
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A currency code that is not in the supported table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown currency code: {0}")]
pub struct UnknownCurrency(pub String);

impl FromStr for CurrencyCode {
    type Err = UnknownCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(code))
            .ok_or_else(|| UnknownCurrency(code.to_string()))
    }
}

/// Symbol and rate used to display base prices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyContext {
    pub code: CurrencyCode,
    pub symbol: String,
    pub rate: Decimal,
}

impl Default for CurrencyContext {
    /// `$` at rate 1, used whenever no provider is available.
    fn default() -> Self {
        CurrencyCode::USD.context()
    }
}

/// Source of the currently selected currency.
///
/// Read on every projection. Returning `None` means the provider is not
/// available right now and the caller falls back to [`CurrencyContext::default`].
pub trait CurrencyProvider: Send + Sync {
    fn current(&self) -> Option<CurrencyContext>;
}

impl CurrencyProvider for CurrencyContext {
    fn current(&self) -> Option<CurrencyContext> {
        Some(self.clone())
    }
}
