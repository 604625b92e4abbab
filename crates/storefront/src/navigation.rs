//! Navigation targets emitted by checkout and account flows.
//!
//! The storefront core never renders anything. Operations that end in a
//! redirect return a [`Navigation`] and leave it to the surface to follow.

use fruittura_core::OrderId;

/// Query parameter carrying the order id on the confirmation view.
pub const ORDER_ID_PARAM: &str = "orderId";

/// Where the shopper should be sent next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Home,
    Cart,
    Checkout,
    Profile,
    /// Confirmation view for a placed order.
    OrderConfirmation { order_id: OrderId },
}

impl Navigation {
    /// Path for this target, with query parameters percent-encoded.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Cart => "/cart".to_string(),
            Self::Checkout => "/checkout".to_string(),
            Self::Profile => "/profile".to_string(),
            Self::OrderConfirmation { order_id } => format!(
                "/order-confirmation?{ORDER_ID_PARAM}={}",
                urlencoding::encode(order_id.as_str())
            ),
        }
    }
}

/// Order id for the confirmation view.
///
/// Reads `orderId` from a query string. When it is missing or blank a fresh
/// id is generated, so the view always has something to show.
#[must_use]
pub fn confirmation_order_id(query: &str) -> OrderId {
    query
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == ORDER_ID_PARAM)
        .and_then(|(_, value)| urlencoding::decode(value).ok())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map_or_else(OrderId::generate, OrderId::new)
}
