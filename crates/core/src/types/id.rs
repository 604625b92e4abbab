//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types. Catalog and account
//! identifiers are opaque strings issued by external providers, so every ID
//! wraps a `String`.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<&str>`, `From<String>` and `Into<String>` implementations
///
/// # Example
///
/// ```rust
/// # use fruittura_core::define_id;
/// define_id!(UserId);
/// define_id!(OrderId);
///
/// let user_id = UserId::new("1");
/// let order_id = OrderId::new("1");
///
/// // These are different types, so this won't compile:
/// // let _: UserId = order_id;
/// # let _ = (user_id, order_id);
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the underlying string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }
    };
}

// Define standard entity IDs
define_id!(ProductId);
define_id!(VariantId);
define_id!(CategoryId);
define_id!(UserId);
define_id!(AddressId);
define_id!(OrderId);

/// Prefix for client-generated order identifiers.
pub const ORDER_ID_PREFIX: &str = "ORD-";

impl OrderId {
    /// Generate a client-side order identifier of the form `ORD-<unix millis>`.
    ///
    /// Not globally unique: two orders placed within the same millisecond
    /// share an id. There is no order ledger to reserve ids against.
    #[must_use]
    pub fn generate() -> Self {
        Self::from_millis(chrono::Utc::now().timestamp_millis())
    }

    /// Build an order identifier from a millisecond timestamp.
    #[must_use]
    pub fn from_millis(millis: i64) -> Self {
        Self(format!("{ORDER_ID_PREFIX}{millis}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display_and_eq() {
        let id = ProductId::new("almonds-500");
        assert_eq!(id.to_string(), "almonds-500");
        assert_eq!(id, *"almonds-500");
        assert_eq!(id, ProductId::from("almonds-500"));
    }

    #[test]
    fn test_order_id_from_millis() {
        let id = OrderId::from_millis(1_700_000_000_000);
        assert_eq!(id.as_str(), "ORD-1700000000000");
    }

    #[test]
    fn test_order_id_generate_has_prefix() {
        let id = OrderId::generate();
        let millis = id.as_str().strip_prefix(ORDER_ID_PREFIX);
        assert!(millis.is_some_and(|m| m.parse::<i64>().is_ok()));
    }

    #[test]
    fn test_id_serializes_transparently() {
        let id = VariantId::new("v-250g");
        let json = serde_json::to_string(&id).unwrap_or_default();
        assert_eq!(json, "\"v-250g\"");
    }
}
