//! Account email addresses.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Why a shopper-entered address was rejected.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("email cannot be empty")]
    Empty,
    #[error("email must be at most {max} characters")]
    TooLong { max: usize },
    #[error("email must contain an @ symbol")]
    MissingAtSymbol,
    /// Nothing before or after the `@`.
    #[error("email needs a name before and a domain after the @")]
    Incomplete,
    #[error("email cannot contain spaces")]
    ContainsWhitespace,
}

/// The address an account signs in with.
///
/// Stored trimmed and lower-cased, so `Priya@Fruittura.in ` and
/// `priya@fruittura.in` name the same account. Only the shape is checked:
/// one `@` split into a non-empty name and domain, no inner whitespace.
///
/// ```
/// use fruittura_core::Email;
///
/// let email = Email::parse(" Priya.S@Fruittura.IN").unwrap();
/// assert_eq!(email.as_str(), "priya.s@fruittura.in");
/// assert_eq!(email.local_part(), "priya.s");
///
/// assert!(Email::parse("priya.fruittura.in").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// RFC 5321 path limit.
    pub const MAX_LENGTH: usize = 254;

    /// Validate and normalize a shopper-entered address.
    ///
    /// # Errors
    ///
    /// Returns the first [`EmailError`] the trimmed input trips.
    pub fn parse(input: &str) -> Result<Self, EmailError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(EmailError::Empty);
        }
        if trimmed.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(EmailError::ContainsWhitespace);
        }

        let (name, domain) = trimmed
            .rsplit_once('@')
            .ok_or(EmailError::MissingAtSymbol)?;
        if name.is_empty() || domain.is_empty() {
            return Err(EmailError::Incomplete);
        }

        Ok(Self(trimmed.to_lowercase()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Everything before the last `@`. Used as the display name of accounts
    /// created at login.
    #[must_use]
    pub fn local_part(&self) -> &str {
        self.0.rsplit_once('@').map_or("", |(name, _)| name)
    }

    #[must_use]
    pub fn domain(&self) -> &str {
        self.0.rsplit_once('@').map_or("", |(_, domain)| domain)
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = EmailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}
