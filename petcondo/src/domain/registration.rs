//! Registration form parsing.
//!
//! Validation happens here, at the form boundary. The coordinator only ever
//! sees a [`RegistrationForm`] whose fields already satisfy the form rules.

use std::fmt;

use super::pet::{PetDraft, PetValidationError};
use super::resident::{ResidentDraft, ResidentValidationError};

/// Raw form values exactly as the user typed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationFormDraft {
    /// Resident name.
    pub resident_name: String,
    /// Resident block.
    pub resident_block: String,
    /// Resident apartment.
    pub resident_apartment: String,
    /// Resident phone, masked or not.
    pub resident_phone: String,
    /// Resident email.
    pub resident_email: String,
    /// Pet name.
    pub pet_name: String,
    /// Pet species.
    pub pet_species: String,
    /// Pet breed.
    pub pet_breed: String,
    /// Pet age in years.
    pub pet_age: i64,
    /// Pet description.
    pub pet_description: String,
    /// Preprocessed photo data URI, or empty.
    pub pet_photo: String,
}

/// Field-level validation failure for the registration form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Resident half failed validation.
    Resident(ResidentValidationError),
    /// Pet half failed validation.
    Pet(PetValidationError),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resident(err) => err.fmt(f),
            Self::Pet(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ResidentValidationError> for ValidationError {
    fn from(value: ResidentValidationError) -> Self {
        Self::Resident(value)
    }
}

impl From<PetValidationError> for ValidationError {
    fn from(value: PetValidationError) -> Self {
        Self::Pet(value)
    }
}

/// Validated registration form.
///
/// When the signed-in identity already has a resident record the resident
/// half is still carried but ignored by the workflow; the form shows the
/// cached values in that case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationForm {
    /// Resident details.
    pub resident: ResidentDraft,
    /// Pet details.
    pub pet: PetDraft,
}

impl TryFrom<RegistrationFormDraft> for RegistrationForm {
    type Error = ValidationError;

    fn try_from(value: RegistrationFormDraft) -> Result<Self, Self::Error> {
        let resident = ResidentDraft::new(
            &value.resident_name,
            &value.resident_block,
            &value.resident_apartment,
            &value.resident_phone,
            &value.resident_email,
        )?;
        let pet = PetDraft::new(
            &value.pet_name,
            &value.pet_species,
            &value.pet_breed,
            value.pet_age,
            &value.pet_description,
            value.pet_photo,
        )?;
        Ok(Self { resident, pet })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn draft() -> RegistrationFormDraft {
        RegistrationFormDraft {
            resident_name: "Ana".to_owned(),
            resident_block: "2".to_owned(),
            resident_apartment: "101".to_owned(),
            resident_phone: "11999990000".to_owned(),
            resident_email: "a@x.com".to_owned(),
            pet_name: "Rex".to_owned(),
            pet_species: "Cão".to_owned(),
            pet_breed: "Vira-lata".to_owned(),
            pet_age: 3,
            pet_description: String::new(),
            pet_photo: String::new(),
        }
    }

    #[rstest]
    fn valid_draft_parses(draft: RegistrationFormDraft) {
        let form = RegistrationForm::try_from(draft).expect("valid form");
        assert_eq!(form.resident.name(), "Ana");
        assert_eq!(form.pet.name(), "Rex");
        assert_eq!(form.pet.age(), 3);
    }

    #[rstest]
    fn resident_errors_are_reported_first(mut draft: RegistrationFormDraft) {
        draft.resident_name.clear();
        draft.pet_name.clear();
        let err = RegistrationForm::try_from(draft).expect_err("invalid");
        assert_eq!(
            err,
            ValidationError::Resident(ResidentValidationError::EmptyName)
        );
    }

    #[rstest]
    fn pet_errors_surface_with_context(mut draft: RegistrationFormDraft) {
        draft.pet_age = 45;
        let err = RegistrationForm::try_from(draft).expect_err("invalid");
        assert_eq!(
            err,
            ValidationError::Pet(PetValidationError::AgeOutOfRange { age: 45 })
        );
        assert!(err.to_string().contains("between 0 and 30"));
    }
}
