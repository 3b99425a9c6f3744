//! Shared helpers for petcondo integration tests.
//!
//! Integration tests compile as separate crates, so the in-memory port
//! doubles live here and each test file pulls them in with `mod support;`.

pub mod doubles;

use petcondo::domain::{Credentials, RegistrationForm, RegistrationFormDraft};

/// Credentials for `email` with a fixed valid password.
pub fn credentials(email: &str) -> Credentials {
    Credentials::try_from_parts(email, "secret1").expect("test credentials")
}

/// Valid registration form for a resident of block 2 and the given pet.
pub fn form(resident: &str, apartment: &str, pet: &str, species: &str) -> RegistrationForm {
    RegistrationForm::try_from(RegistrationFormDraft {
        resident_name: resident.to_owned(),
        resident_block: "2".to_owned(),
        resident_apartment: apartment.to_owned(),
        resident_phone: "(11) 98765-4321".to_owned(),
        resident_email: format!("{}@condo.test", resident.to_lowercase()),
        pet_name: pet.to_owned(),
        pet_species: species.to_owned(),
        pet_breed: "SRD".to_owned(),
        pet_age: 4,
        ..RegistrationFormDraft::default()
    })
    .expect("valid test form")
}
