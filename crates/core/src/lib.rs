//! Fruittura Core - Shared types library.
//!
//! This crate provides common types used across all Fruittura components:
//! - `storefront` - Cart, wishlist, account and checkout state engine
//! - `cli` - Command-line driver for the state engine
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no persistence, no payment
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, money, emails, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
