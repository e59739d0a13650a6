//! CLI command implementations.

pub mod cart;
pub mod migrate;
pub mod search;
pub mod seed;
