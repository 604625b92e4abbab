//! Shipping address validation.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::models::AddressDraft;

/// A required shipping address field. `line2` is optional and not listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AddressField {
    Name,
    Phone,
    Line1,
    City,
    State,
    Pincode,
}

impl AddressField {
    /// Every required field, in form order.
    pub const REQUIRED: [Self; 6] = [
        Self::Name,
        Self::Phone,
        Self::Line1,
        Self::City,
        Self::State,
        Self::Pincode,
    ];

    /// Form label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Name => "Full name",
            Self::Phone => "Phone number",
            Self::Line1 => "Address line 1",
            Self::City => "City",
            Self::State => "State",
            Self::Pincode => "Pincode",
        }
    }

    fn value<'a>(&self, draft: &'a AddressDraft) -> &'a str {
        match self {
            Self::Name => &draft.name,
            Self::Phone => &draft.phone,
            Self::Line1 => &draft.line1,
            Self::City => &draft.city,
            Self::State => &draft.state,
            Self::Pincode => &draft.pincode,
        }
    }
}

impl fmt::Display for AddressField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Required fields that are blank (empty or whitespace only).
#[must_use]
pub fn missing_fields(draft: &AddressDraft) -> Vec<AddressField> {
    AddressField::REQUIRED
        .into_iter()
        .filter(|field| field.value(draft).trim().is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::draft;

    #[test]
    fn test_complete_draft_has_no_missing_fields() {
        assert!(missing_fields(&draft()).is_empty());
    }

    #[test]
    fn test_line2_is_optional() {
        let mut address = draft();
        address.line2 = String::new();
        assert!(missing_fields(&address).is_empty());
    }

    #[test]
    fn test_blank_fields_are_reported_in_form_order() {
        let mut address = draft();
        address.pincode = String::new();
        address.name = "   ".to_string();

        assert_eq!(
            missing_fields(&address),
            vec![AddressField::Name, AddressField::Pincode]
        );
    }

    #[test]
    fn test_empty_draft_misses_everything() {
        assert_eq!(
            missing_fields(&AddressDraft::default()),
            AddressField::REQUIRED.to_vec()
        );
    }
}
