//! Vitrine Core - Shared types library.
//!
//! This crate provides the domain types used across all Vitrine components:
//! - `storefront` - Product listing API and the browser-side cart engine
//! - `cli` - Command-line host for migrations, seeding and local carts
//!
//! # Architecture
//!
//! The core crate contains only types, traits and pure logic - no I/O, no
//! database access, no rendering. The cart aggregate lives here so that every
//! host mutates a cart through exactly the same rules.
//!
//! # Modules
//!
//! - [`cart`] - The cart aggregate: line items and merge-by-identity mutations
//! - [`types`] - Product identities, prices, currencies and catalog records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::{Cart, CartMutation, LineItem, MutationOutcome};
pub use types::*;
