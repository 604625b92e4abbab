//! Auth store: the signed-in user, their session token and address book.
//!
//! Every user-scoped operation is a silent no-op when nobody is signed in.
//! Logout clears only this store; the cart and wishlist live under their own
//! keys and survive it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use fruittura_core::AddressId;

use super::{Persisted, StorageBackend, StoreState};
use crate::error::{clear_sentry_user, set_sentry_user};
use crate::models::{Address, SessionToken, User, UserUpdate};

/// Serializable session state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    pub user: Option<User>,
    pub token: Option<SessionToken>,
    pub is_authenticated: bool,
}

impl StoreState for AuthState {
    const NAMESPACE: &'static str = "auth";
}

/// Session and address book with durable persistence.
#[derive(Debug)]
pub struct AuthStore {
    inner: Persisted<AuthState>,
}

impl AuthStore {
    /// Load the session from `backend` under `{prefix}-auth`.
    pub fn load(backend: Arc<dyn StorageBackend>, prefix: &str) -> Self {
        let store = Self {
            inner: Persisted::load(backend, prefix),
        };
        if let Some(user) = store.user() {
            set_sentry_user(&user.id, Some(user.email.as_str()));
        }
        store
    }

    /// A signed-out session that is never written anywhere durable.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            inner: Persisted::in_memory(),
        }
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.inner.state().user.as_ref()
    }

    #[must_use]
    pub fn token(&self) -> Option<&SessionToken> {
        self.inner.state().token.as_ref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.state().is_authenticated
    }

    /// Replace the session wholesale.
    pub fn login(&mut self, user: User, token: SessionToken) {
        set_sentry_user(&user.id, Some(user.email.as_str()));
        tracing::info!(user_id = %user.id, "User logged in");

        self.inner.update(|state| {
            *state = AuthState {
                user: Some(user),
                token: Some(token),
                is_authenticated: true,
            };
        });
    }

    /// Clear user, token and the authenticated flag.
    pub fn logout(&mut self) {
        if let Some(user) = self.user() {
            tracing::info!(user_id = %user.id, "User logged out");
        }
        clear_sentry_user();
        self.inner.update(|state| *state = AuthState::default());
    }

    /// Shallow-merge profile fields into the current user.
    pub fn update_user(&mut self, update: UserUpdate) {
        self.with_user(|user| user.apply(update));
    }

    /// Append an address. A new default address first clears the flag on
    /// every existing one.
    pub fn add_address(&mut self, address: Address) {
        self.with_user(|user| {
            if address.is_default {
                for existing in &mut user.addresses {
                    existing.is_default = false;
                }
            }
            user.addresses.push(address);
        });
    }

    /// Delete an address. Removing the default leaves the book with no
    /// default; nothing is promoted in its place.
    pub fn remove_address(&mut self, address_id: &AddressId) {
        self.with_user(|user| user.addresses.retain(|a| &a.id != address_id));
    }

    /// Make one address the default and clear the flag on all others. An
    /// unknown ID leaves every address non-default.
    pub fn set_default_address(&mut self, address_id: &AddressId) {
        self.with_user(|user| {
            for address in &mut user.addresses {
                address.is_default = &address.id == address_id;
            }
        });
    }

    fn with_user(&mut self, mutate: impl FnOnce(&mut User)) {
        if self.user().is_none() {
            tracing::debug!("Ignoring account change while signed out");
            return;
        }
        self.inner.update(|state| {
            if let Some(user) = state.user.as_mut() {
                mutate(user);
            }
        });
    }
}
