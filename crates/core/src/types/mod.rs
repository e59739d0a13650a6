//! Core types for Vitrine.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod currency;
pub mod id;
pub mod identity;
pub mod price;
pub mod product;

pub use currency::{CurrencyCode, CurrencyContext, CurrencyProvider, UnknownCurrency};
pub use id::ProductId;
pub use identity::{IdentityParseError, ProductIdentity};
pub use price::{PriceFormatter, RateFormatter};
pub use product::{NewProduct, Product};
