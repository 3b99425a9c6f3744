//! Pet records, the pet half of the registration form, and listing scopes.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::resident::{ResidentId, ResidentSnapshot};
use super::session::SessionId;
use super::validation::is_blank;

/// Species offered by the registration form.
pub const SPECIES_OPTIONS: [&str; 7] = [
    "Cão", "Gato", "Pássaro", "Coelho", "Hamster", "Peixe", "Outro",
];

/// Oldest age the registration form accepts.
pub const MAX_PET_AGE: u8 = 30;

/// Identifier generated by the store for a pet row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PetId(String);

impl PetId {
    /// Wrap a store-issued identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a random identifier, mainly for fixtures.
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl AsRef<str> for PetId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Registered pet with a snapshot of its owner's display fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    /// Store-generated identifier.
    pub id: PetId,
    /// Owning resident.
    pub resident_id: ResidentId,
    /// Owner name at creation time.
    pub resident_name: String,
    /// Owner block at creation time.
    pub resident_block: String,
    /// Owner apartment at creation time.
    pub resident_apartment: String,
    /// Pet name.
    pub name: String,
    /// Species label, usually one of [`SPECIES_OPTIONS`].
    pub species: String,
    /// Breed label.
    pub breed: String,
    /// Age in years.
    pub age: u8,
    /// Free-text description, possibly empty.
    pub description: String,
    /// Embedded photo (data URI) or empty.
    pub photo: String,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
}

/// Validation errors for the pet half of the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PetValidationError {
    /// Name was blank.
    EmptyName,
    /// Species was blank.
    EmptySpecies,
    /// Breed was blank.
    EmptyBreed,
    /// Age exceeded [`MAX_PET_AGE`] or was negative.
    AgeOutOfRange {
        /// Age as submitted.
        age: i64,
    },
}

impl fmt::Display for PetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "pet name must not be empty"),
            Self::EmptySpecies => write!(f, "pet species must not be empty"),
            Self::EmptyBreed => write!(f, "pet breed must not be empty"),
            Self::AgeOutOfRange { age } => {
                write!(f, "pet age must be between 0 and {MAX_PET_AGE} (got {age})")
            }
        }
    }
}

impl std::error::Error for PetValidationError {}

/// Validated pet details collected by the registration form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetDraft {
    name: String,
    species: String,
    breed: String,
    age: u8,
    description: String,
    photo: String,
}

impl PetDraft {
    /// Validate raw form values. `photo` is expected to be an already
    /// preprocessed data URI, or empty.
    pub fn new(
        name: &str,
        species: &str,
        breed: &str,
        age: i64,
        description: &str,
        photo: impl Into<String>,
    ) -> Result<Self, PetValidationError> {
        if is_blank(name) {
            return Err(PetValidationError::EmptyName);
        }
        if is_blank(species) {
            return Err(PetValidationError::EmptySpecies);
        }
        if is_blank(breed) {
            return Err(PetValidationError::EmptyBreed);
        }
        let age = u8::try_from(age)
            .ok()
            .filter(|value| *value <= MAX_PET_AGE)
            .ok_or(PetValidationError::AgeOutOfRange { age })?;

        Ok(Self {
            name: name.trim().to_owned(),
            species: species.trim().to_owned(),
            breed: breed.trim().to_owned(),
            age,
            description: description.trim().to_owned(),
            photo: photo.into(),
        })
    }

    /// Pet name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Species label.
    pub fn species(&self) -> &str {
        self.species.as_str()
    }

    /// Breed label.
    pub fn breed(&self) -> &str {
        self.breed.as_str()
    }

    /// Age in years.
    pub fn age(&self) -> u8 {
        self.age
    }

    /// Description, possibly empty.
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Embedded photo, possibly empty.
    pub fn photo(&self) -> &str {
        self.photo.as_str()
    }
}

/// Pet row about to be written: form data plus the owner snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPet {
    /// Owner fields frozen at creation time.
    pub owner: ResidentSnapshot,
    /// Validated pet details.
    pub details: PetDraft,
}

impl NewPet {
    /// Pair a draft with the owner it will be filed under.
    pub fn new(owner: ResidentSnapshot, details: PetDraft) -> Self {
        Self { owner, details }
    }
}

/// Which pets a listing should return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PetScope {
    /// Every registered pet (gallery).
    All,
    /// Pets whose resident belongs to the given identity ("my pets").
    OwnedBy(SessionId),
}
