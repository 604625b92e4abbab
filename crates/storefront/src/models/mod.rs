//! Domain models for the storefront.
//!
//! Catalog types ([`Product`], [`ProductVariant`], [`Category`]) are owned by
//! the external product data provider and treated as immutable values once
//! fetched. Cart, wishlist and account types are owned by the stores in
//! [`crate::store`]. Field names serialize in camelCase so persisted blobs and
//! catalog files keep the shape the web client already reads.

pub mod cart;
pub mod order;
pub mod product;
pub mod user;
pub mod wishlist;

pub use cart::CartItem;
pub use order::Order;
pub use product::{Category, NutritionInfo, Product, ProductVariant};
pub use user::{Address, AddressDraft, SessionToken, User, UserUpdate};
pub use wishlist::WishlistItem;
