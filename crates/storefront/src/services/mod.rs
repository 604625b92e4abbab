//! Services layered over the stores.
//!
//! - `auth` - registration and login form handling
//! - `catalog` - product data provider contract and a static implementation

pub mod auth;
pub mod catalog;
