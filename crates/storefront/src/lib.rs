//! Vitrine Storefront library.
//!
//! Hosts both halves of the storefront:
//!
//! - [`cart`] - The cart engine each browsing context runs: durable slot,
//!   projection onto the page and cross-tab convergence
//! - [`currency`], [`checkout`] and [`search_history`] - Collaborators of
//!   the cart engine that share its storage
//! - [`catalog`], [`db`] and [`routes`] - The product listing service

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod currency;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod search_history;
pub mod state;
