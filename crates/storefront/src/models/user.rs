//! Account types owned by the auth store.

use core::fmt;

use serde::{Deserialize, Serialize};

use fruittura_core::{AddressId, Email, UserId};

/// A signed-in shopper together with their address book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub addresses: Vec<Address>,
}

impl User {
    /// Create a user with an empty address book.
    #[must_use]
    pub fn new(id: UserId, email: Email, name: impl Into<String>) -> Self {
        Self {
            id,
            email,
            name: name.into(),
            phone: None,
            avatar: None,
            addresses: Vec::new(),
        }
    }

    /// The address marked as default, if any.
    #[must_use]
    pub fn default_address(&self) -> Option<&Address> {
        self.addresses.iter().find(|a| a.is_default)
    }

    /// Look up an address by ID.
    #[must_use]
    pub fn address(&self, id: &AddressId) -> Option<&Address> {
        self.addresses.iter().find(|a| &a.id == id)
    }

    /// Shallow-merge the fields present in `update`.
    pub fn apply(&mut self, update: UserUpdate) {
        let UserUpdate {
            email,
            name,
            phone,
            avatar,
            addresses,
        } = update;

        if let Some(email) = email {
            self.email = email;
        }
        if let Some(name) = name {
            self.name = name;
        }
        if let Some(phone) = phone {
            self.phone = Some(phone);
        }
        if let Some(avatar) = avatar {
            self.avatar = Some(avatar);
        }
        if let Some(addresses) = addresses {
            self.addresses = addresses;
        }
    }
}

/// Partial user fields for profile edits. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub email: Option<Email>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<String>,
    pub addresses: Option<Vec<Address>>,
}

/// A saved shipping address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: AddressId,
    pub name: String,
    pub phone: String,
    pub line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub pincode: String,
    #[serde(default)]
    pub is_default: bool,
}

/// Address fields as typed into the checkout form, before an ID is assigned.
///
/// `line2` is optional; every other field is required on submit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressDraft {
    pub name: String,
    pub phone: String,
    pub line1: String,
    pub line2: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

impl AddressDraft {
    /// Turn the draft into a saved address.
    #[must_use]
    pub fn into_address(self, id: AddressId, is_default: bool) -> Address {
        let line2 = Some(self.line2.trim().to_owned()).filter(|l| !l.is_empty());
        Address {
            id,
            name: self.name,
            phone: self.phone,
            line1: self.line1,
            line2,
            city: self.city,
            state: self.state,
            pincode: self.pincode,
            is_default,
        }
    }
}

impl From<&Address> for AddressDraft {
    fn from(address: &Address) -> Self {
        Self {
            name: address.name.clone(),
            phone: address.phone.clone(),
            line1: address.line1.clone(),
            line2: address.line2.clone().unwrap_or_default(),
            city: address.city.clone(),
            state: address.state.clone(),
            pincode: address.pincode.clone(),
        }
    }
}

/// Opaque session token issued at login.
///
/// `Debug` is redacted so tokens never reach logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap a token string.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Issue a fresh random token.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    /// Expose the raw token for transport headers.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken([REDACTED])")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn user() -> User {
        User::new(
            UserId::new("u1"),
            Email::parse("priya@fruittura.in").unwrap(),
            "Priya",
        )
    }

    #[test]
    fn test_apply_merges_only_present_fields() {
        let mut user = user();
        user.apply(UserUpdate {
            phone: Some("9876543210".to_string()),
            ..UserUpdate::default()
        });

        assert_eq!(user.name, "Priya");
        assert_eq!(user.phone.as_deref(), Some("9876543210"));
        assert_eq!(user.email.as_str(), "priya@fruittura.in");
    }

    #[test]
    fn test_draft_into_address_drops_blank_line2() {
        let draft = AddressDraft {
            name: "Priya".into(),
            phone: "9876543210".into(),
            line1: "12 MG Road".into(),
            line2: "  ".into(),
            city: "Pune".into(),
            state: "Maharashtra".into(),
            pincode: "411001".into(),
        };
        let address = draft.into_address(AddressId::new("a1"), true);
        assert_eq!(address.line2, None);
        assert!(address.is_default);
        assert_eq!(AddressDraft::from(&address).line2, "");
    }

    #[test]
    fn test_session_token_debug_is_redacted() {
        let token = SessionToken::new("super-secret-token");
        let debug = format!("{token:?}");
        assert!(!debug.contains("super-secret-token"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_generated_tokens_differ() {
        assert_ne!(SessionToken::generate(), SessionToken::generate());
    }
}
