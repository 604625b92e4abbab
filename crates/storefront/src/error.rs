//! Unified error handling with Sentry integration.
//!
//! `AppError` gathers every failure a surface can receive from the
//! storefront. Surfaces show [`AppError::user_message`] to the shopper and
//! call [`AppError::report`] so server-side failures reach Sentry.

use thiserror::Error;

use crate::checkout::{CheckoutError, PaymentError};
use crate::config::ConfigError;
use crate::pricing::PricingError;
use crate::services::auth::AuthError;
use crate::services::catalog::CatalogError;
use crate::store::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Persistence backend failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Coupon could not be applied.
    #[error("Pricing error: {0}")]
    Pricing(#[from] PricingError),

    /// Checkout step failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Registration, login or profile edit failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Catalog lookup failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Configuration is invalid.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl AppError {
    /// Whether this failure should be captured to Sentry. Shopper mistakes
    /// and cancellations are not.
    #[must_use]
    pub const fn is_reportable(&self) -> bool {
        match self {
            Self::Storage(_) | Self::Config(_) => true,
            Self::Catalog(err) => !matches!(err, CatalogError::NotFound(_)),
            Self::Checkout(CheckoutError::Payment(err)) => !matches!(err, PaymentError::Cancelled),
            Self::Pricing(_) | Self::Checkout(_) | Self::Auth(_) => false,
        }
    }

    /// Capture to Sentry when reportable. Returns the event ID if one was sent.
    pub fn report(&self) -> Option<sentry::types::Uuid> {
        if !self.is_reportable() {
            return None;
        }
        let event_id = sentry::capture_error(self);
        tracing::error!(
            error = %self,
            sentry_event_id = %event_id,
            "Storefront error"
        );
        Some(event_id)
    }

    /// Message safe to show the shopper.
    #[must_use]
    pub fn user_message(&self) -> String {
        // Don't expose internal error details to shoppers
        match self {
            Self::Storage(_) | Self::Config(_) => "Something went wrong. Please try again.".to_string(),
            Self::Pricing(err) => err.to_string(),
            Self::Checkout(err) => err.user_message(),
            Self::Auth(err) => match err {
                AuthError::Validation(errors) => errors.to_string(),
                AuthError::InvalidEmail(_) => "Invalid email address".to_string(),
                AuthError::NotAuthenticated => "Please sign in to continue".to_string(),
            },
            Self::Catalog(err) => match err {
                CatalogError::NotFound(_) => "Product not found".to_string(),
                _ => "Products are unavailable right now".to_string(),
            },
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for shopper actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "almonds")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
