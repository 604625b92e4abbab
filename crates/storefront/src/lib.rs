//! Fruittura storefront state engine.
//!
//! Cart, wishlist and auth stores with advisory persistence, the order-total
//! computation and the two-step checkout machine that hands off to a payment
//! gateway. Rendering is left to whichever surface links this crate; the CLI
//! in `fruittura-cli` is one such surface.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod checkout;
pub mod config;
pub mod error;
pub mod models;
pub mod navigation;
pub mod pricing;
pub mod services;
pub mod state;
pub mod store;
pub mod telemetry;

#[cfg(test)]
mod test_support;

pub use state::Storefront;
