//! Authentication service.
//!
//! Validates the registration and login forms and signs the shopper into the
//! [`AuthStore`]. Credentials are not checked against any server; issuing a
//! session here only means recording it locally.

mod error;

pub use error::{AuthError, FieldErrors, FormField};

use std::sync::LazyLock;

use regex::Regex;
use secrecy::{ExposeSecret, SecretString};

use fruittura_core::{Email, UserId};

use crate::error::add_breadcrumb;
use crate::models::{SessionToken, User, UserUpdate};
use crate::navigation::Navigation;
use crate::store::AuthStore;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Optional leading `+`, then at least ten digits, spaces or dashes.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[\d\s-]{10,}$").expect("Invalid regex"));

/// Registration form as submitted.
#[derive(Debug)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    /// Optional. Blank means not given.
    pub phone: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
    pub accept_terms: bool,
}

impl RegistrationForm {
    /// Check every field, collecting one message per failing field.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` with the failing fields.
    pub fn validate(&self) -> Result<(), AuthError> {
        let mut errors = FieldErrors::default();
        let password = self.password.expose_secret();

        if self.name.trim().is_empty() {
            errors.insert(FormField::Name, "Name is required");
        }
        if Email::parse(&self.email).is_err() {
            errors.insert(FormField::Email, "Valid email is required");
        }
        if !self.phone.is_empty() && !PHONE_RE.is_match(&self.phone) {
            errors.insert(FormField::Phone, "Valid phone number is required");
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            errors.insert(
                FormField::Password,
                "Password must be at least 8 characters",
            );
        }
        if password != self.confirm_password.expose_secret() {
            errors.insert(FormField::ConfirmPassword, "Passwords do not match");
        }
        if !self.accept_terms {
            errors.insert(FormField::Terms, "You must accept the terms");
        }

        errors.into_result()
    }
}

/// Login form as submitted.
#[derive(Debug)]
pub struct LoginForm {
    pub email: String,
    pub password: SecretString,
}

/// Password strength from 0 to 4: one point each for length, an uppercase
/// letter, a digit and a symbol.
#[must_use]
pub fn password_strength(password: &str) -> u8 {
    let checks = [
        password.chars().count() >= MIN_PASSWORD_LENGTH,
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| !c.is_ascii_alphanumeric()),
    ];
    checks.into_iter().map(u8::from).sum()
}

/// Register a new account and sign it in.
///
/// # Errors
///
/// Returns `AuthError::Validation` if any field is invalid. The auth store
/// is left untouched in that case.
pub fn register(form: RegistrationForm, auth: &mut AuthStore) -> Result<Navigation, AuthError> {
    form.validate()?;

    let email = Email::parse(&form.email)?;
    let mut user = User::new(new_user_id(), email, form.name.trim());
    user.phone = Some(form.phone.trim().to_string()).filter(|p| !p.is_empty());

    tracing::info!(user_id = %user.id, "Account registered");
    add_breadcrumb("auth", "Account registered", None);

    auth.login(user, SessionToken::generate());
    Ok(Navigation::Profile)
}

/// Sign in with an email and password.
///
/// # Errors
///
/// Returns `AuthError::InvalidEmail` for a malformed address and
/// `AuthError::Validation` when the password is blank.
pub fn login(form: LoginForm, auth: &mut AuthStore) -> Result<Navigation, AuthError> {
    let email = Email::parse(&form.email)?;

    if form.password.expose_secret().is_empty() {
        let mut errors = FieldErrors::default();
        errors.insert(FormField::Password, "Password is required");
        return Err(AuthError::Validation(errors));
    }

    let name = email.local_part().to_string();
    auth.login(User::new(new_user_id(), email, name), SessionToken::generate());
    Ok(Navigation::Profile)
}

/// Sign out. Cart and wishlist are kept.
pub fn logout(auth: &mut AuthStore) -> Navigation {
    auth.logout();
    Navigation::Home
}

/// The signed-in user.
///
/// # Errors
///
/// Returns `AuthError::NotAuthenticated` when nobody is signed in.
pub fn require_user(auth: &AuthStore) -> Result<&User, AuthError> {
    auth.user().ok_or(AuthError::NotAuthenticated)
}

/// Edit the signed-in user's profile.
///
/// # Errors
///
/// Returns `AuthError::NotAuthenticated` when nobody is signed in, and
/// `AuthError::Validation` for a blank name or malformed phone.
pub fn update_profile(auth: &mut AuthStore, update: UserUpdate) -> Result<(), AuthError> {
    require_user(auth)?;

    let mut errors = FieldErrors::default();
    if update.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        errors.insert(FormField::Name, "Name is required");
    }
    if update
        .phone
        .as_deref()
        .is_some_and(|p| !p.is_empty() && !PHONE_RE.is_match(p))
    {
        errors.insert(FormField::Phone, "Valid phone number is required");
    }
    errors.into_result()?;

    auth.update_user(update);
    Ok(())
}

fn new_user_id() -> UserId {
    UserId::new(uuid::Uuid::new_v4().simple().to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form() -> RegistrationForm {
        RegistrationForm {
            name: "Priya Sharma".to_string(),
            email: "priya@fruittura.in".to_string(),
            phone: "+91 98765-43210".to_string(),
            password: SecretString::from("Mango#2024"),
            confirm_password: SecretString::from("Mango#2024"),
            accept_terms: true,
        }
    }

    #[test]
    fn test_valid_form() {
        assert!(form().validate().is_ok());
    }

    #[test]
    fn test_every_field_reported() {
        let form = RegistrationForm {
            name: "  ".to_string(),
            email: "priya.fruittura.in".to_string(),
            phone: "12345".to_string(),
            password: SecretString::from("short"),
            confirm_password: SecretString::from("other"),
            accept_terms: false,
        };

        let Err(AuthError::Validation(errors)) = form.validate() else {
            panic!("expected validation errors");
        };

        assert_eq!(errors.len(), 6);
        assert_eq!(errors.get(FormField::Email), Some("Valid email is required"));
        assert_eq!(errors.get(FormField::ConfirmPassword), Some("Passwords do not match"));
    }

    #[test]
    fn test_phone_is_optional() {
        let mut form = form();
        form.phone = String::new();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_password_strength() {
        assert_eq!(password_strength(""), 0);
        assert_eq!(password_strength("mangoes1"), 2);
        assert_eq!(password_strength("Mango#2024"), 4);
    }

    #[test]
    fn test_register_signs_in_and_goes_to_profile() {
        let mut auth = AuthStore::in_memory();

        let next = register(form(), &mut auth).unwrap();

        assert_eq!(next, Navigation::Profile);
        assert!(auth.is_authenticated());
        let user = auth.user().unwrap();
        assert_eq!(user.name, "Priya Sharma");
        assert_eq!(user.phone.as_deref(), Some("+91 98765-43210"));
    }

    #[test]
    fn test_register_invalid_leaves_store_untouched() {
        let mut auth = AuthStore::in_memory();
        let mut form = form();
        form.accept_terms = false;

        assert!(register(form, &mut auth).is_err());
        assert!(!auth.is_authenticated());
    }

    #[test]
    fn test_login_and_logout() {
        let mut auth = AuthStore::in_memory();
        let next = login(
            LoginForm {
                email: "arjun@fruittura.in".to_string(),
                password: SecretString::from("secret"),
            },
            &mut auth,
        )
        .unwrap();

        assert_eq!(next, Navigation::Profile);
        assert_eq!(require_user(&auth).unwrap().name, "arjun");

        assert_eq!(logout(&mut auth), Navigation::Home);
        assert_eq!(require_user(&auth), Err(AuthError::NotAuthenticated));
    }

    #[test]
    fn test_login_rejects_bad_email() {
        let mut auth = AuthStore::in_memory();
        let result = login(
            LoginForm {
                email: "arjun".to_string(),
                password: SecretString::from("secret"),
            },
            &mut auth,
        );
        assert!(matches!(result, Err(AuthError::InvalidEmail(_))));
    }

    #[test]
    fn test_login_normalizes_email() {
        let mut auth = AuthStore::in_memory();
        login(
            LoginForm {
                email: " Arjun@Fruittura.IN ".to_string(),
                password: SecretString::from("secret"),
            },
            &mut auth,
        )
        .unwrap();

        let user = require_user(&auth).unwrap();
        assert_eq!(user.email.as_str(), "arjun@fruittura.in");
        assert_eq!(user.name, "arjun");
    }

    #[test]
    fn test_update_profile_requires_user() {
        let mut auth = AuthStore::in_memory();
        let update = UserUpdate {
            name: Some("Priya S".to_string()),
            ..UserUpdate::default()
        };
        assert_eq!(
            update_profile(&mut auth, update),
            Err(AuthError::NotAuthenticated)
        );
    }
}
