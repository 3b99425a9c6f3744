//! Domain primitives, ports and the registration coordinator.
//!
//! Purpose: model residents, pets and sessions as validated types, and run
//! the registration workflow against ports so adapters stay swappable.
//!
//! Public surface:
//! - Coordinator (alias to `coordinator::Coordinator`): session cache and
//!   registration workflow.
//! - Error (alias to `error::Error`): presentation-agnostic failure payload.
//! - RegistrationForm (alias to `registration::RegistrationForm`): validated
//!   form input.
//! - filter_pets (alias to `gallery::filter_pets`): gallery search.
//! - compress_image (alias to `photo::compress_image`): photo preprocessing.

pub mod coordinator;
pub mod error;
pub mod gallery;
pub mod pet;
pub mod photo;
pub mod ports;
pub mod registration;
pub mod resident;
pub mod session;
mod validation;

pub use self::coordinator::{Coordinator, CoordinatorState};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::gallery::{GalleryQuery, distinct_species, filter_pets, matches};
pub use self::pet::{
    MAX_PET_AGE, NewPet, Pet, PetDraft, PetId, PetScope, PetValidationError, SPECIES_OPTIONS,
};
pub use self::photo::{
    DEFAULT_MAX_DIMENSION, EncodedImage, ImageDecodeError, compress_image, scaled_dimensions,
};
pub use self::registration::{RegistrationForm, RegistrationFormDraft, ValidationError};
pub use self::resident::{
    Resident, ResidentDraft, ResidentId, ResidentSnapshot, ResidentValidationError,
};
pub use self::session::{
    Credentials, EmailConfirmation, SessionId, SessionIdentity, SessionValidationError,
};
pub use self::validation::{EmailAddress, InvalidEmail, PHONE_MAX_DIGITS, PHONE_MIN_DIGITS};

/// Result alias for coordinator operations.
///
/// # Examples
/// ```
/// use petcondo::domain::{DomainResult, Error};
///
/// fn guard(signed_in: bool) -> DomainResult<()> {
///     if signed_in {
///         Ok(())
///     } else {
///         Err(Error::access_denied("sign in first"))
///     }
/// }
/// assert!(guard(false).is_err());
/// ```
pub type DomainResult<T> = Result<T, Error>;
