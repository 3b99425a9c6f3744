//! Resident records and the resident half of the registration form.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::session::SessionId;
use super::validation::{EmailAddress, is_blank, normalise_phone};

/// Identifier generated by the store for a resident row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResidentId(String);

impl ResidentId {
    /// Wrap a store-issued identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a random identifier, mainly for fixtures.
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl AsRef<str> for ResidentId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ResidentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Condominium occupant tied one-to-one with a session identity.
///
/// Residents are created once per identity and never updated by this client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resident {
    /// Store-generated identifier.
    pub id: ResidentId,
    /// Owning session identity.
    pub user_id: SessionId,
    /// Display name.
    pub name: String,
    /// Building block.
    pub block: String,
    /// Apartment number within the block.
    pub apartment: String,
    /// Contact phone, digits only.
    pub phone: String,
    /// Contact email.
    pub email: String,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
}

impl Resident {
    /// Owner fields copied onto every pet created for this resident.
    pub fn snapshot(&self) -> ResidentSnapshot {
        ResidentSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
            block: self.block.clone(),
            apartment: self.apartment.clone(),
        }
    }
}

/// Denormalised owner fields stored on a pet row.
///
/// This is a copy taken at pet creation time, not a live reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResidentSnapshot {
    /// Owning resident.
    pub id: ResidentId,
    /// Resident name at creation time.
    pub name: String,
    /// Resident block at creation time.
    pub block: String,
    /// Resident apartment at creation time.
    pub apartment: String,
}

/// Validation errors for the resident half of the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResidentValidationError {
    /// Name was blank.
    EmptyName,
    /// Block was blank.
    EmptyBlock,
    /// Apartment was blank.
    EmptyApartment,
    /// Phone did not contain 10 or 11 digits.
    InvalidPhone,
    /// Email was missing or malformed.
    InvalidEmail,
}

impl fmt::Display for ResidentValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "resident name must not be empty"),
            Self::EmptyBlock => write!(f, "resident block must not be empty"),
            Self::EmptyApartment => write!(f, "resident apartment must not be empty"),
            Self::InvalidPhone => write!(f, "resident phone must have 10 or 11 digits"),
            Self::InvalidEmail => write!(f, "resident email must be a valid address"),
        }
    }
}

impl std::error::Error for ResidentValidationError {}

/// Validated resident details collected by the registration form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResidentDraft {
    name: String,
    block: String,
    apartment: String,
    phone: String,
    email: EmailAddress,
}

impl ResidentDraft {
    /// Validate raw form values. Text fields are trimmed; the phone keeps
    /// digits only.
    pub fn new(
        name: &str,
        block: &str,
        apartment: &str,
        phone: &str,
        email: &str,
    ) -> Result<Self, ResidentValidationError> {
        if is_blank(name) {
            return Err(ResidentValidationError::EmptyName);
        }
        if is_blank(block) {
            return Err(ResidentValidationError::EmptyBlock);
        }
        if is_blank(apartment) {
            return Err(ResidentValidationError::EmptyApartment);
        }
        let phone = normalise_phone(phone).ok_or(ResidentValidationError::InvalidPhone)?;
        let email = EmailAddress::parse(email).map_err(|_| ResidentValidationError::InvalidEmail)?;

        Ok(Self {
            name: name.trim().to_owned(),
            block: block.trim().to_owned(),
            apartment: apartment.trim().to_owned(),
            phone,
            email,
        })
    }

    /// Resident name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Building block.
    pub fn block(&self) -> &str {
        self.block.as_str()
    }

    /// Apartment number.
    pub fn apartment(&self) -> &str {
        self.apartment.as_str()
    }

    /// Digits-only phone number.
    pub fn phone(&self) -> &str {
        self.phone.as_str()
    }

    /// Contact email.
    pub fn email(&self) -> &str {
        self.email.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "2", "101", "11999990000", "a@x.com", ResidentValidationError::EmptyName)]
    #[case("Ana", " ", "101", "11999990000", "a@x.com", ResidentValidationError::EmptyBlock)]
    #[case("Ana", "2", "", "11999990000", "a@x.com", ResidentValidationError::EmptyApartment)]
    #[case("Ana", "2", "101", "1234", "a@x.com", ResidentValidationError::InvalidPhone)]
    #[case("Ana", "2", "101", "11999990000", "ana", ResidentValidationError::InvalidEmail)]
    fn draft_rejects_invalid_fields(
        #[case] name: &str,
        #[case] block: &str,
        #[case] apartment: &str,
        #[case] phone: &str,
        #[case] email: &str,
        #[case] expected: ResidentValidationError,
    ) {
        let err = ResidentDraft::new(name, block, apartment, phone, email).expect_err("invalid");
        assert_eq!(err, expected);
    }

    #[test]
    fn draft_trims_and_normalises() {
        let draft = ResidentDraft::new(" Ana ", " 2", "101 ", "(11) 99999-0000", "a@x.com")
            .expect("valid draft");
        assert_eq!(draft.name(), "Ana");
        assert_eq!(draft.block(), "2");
        assert_eq!(draft.apartment(), "101");
        assert_eq!(draft.phone(), "11999990000");
        assert_eq!(draft.email(), "a@x.com");
    }

    #[test]
    fn snapshot_copies_owner_fields() {
        let resident = Resident {
            id: ResidentId::new("r1"),
            user_id: SessionId::new("u1").expect("id"),
            name: "Ana".to_owned(),
            block: "2".to_owned(),
            apartment: "101".to_owned(),
            phone: "11999990000".to_owned(),
            email: "a@x.com".to_owned(),
            created_at: Utc::now(),
        };
        let snapshot = resident.snapshot();
        assert_eq!(snapshot.id, resident.id);
        assert_eq!(snapshot.name, "Ana");
        assert_eq!(snapshot.block, "2");
        assert_eq!(snapshot.apartment, "101");
    }
}
