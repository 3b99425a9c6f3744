//! Port for pet persistence.

use async_trait::async_trait;

use crate::domain::{NewPet, Pet, PetScope};

use super::define_port_error;

define_port_error! {
    /// Errors raised by pet repository adapters.
    pub enum PetRepositoryError {
        /// Store could not be reached.
        Connection { message: String } => "pet repository connection failed: {message}",
        /// Query or insert was rejected.
        Query { message: String } => "pet repository query failed: {message}",
        /// Returned rows did not match the expected shape.
        Decode { message: String } => "pet repository returned malformed rows: {message}",
    }
}

/// Row-level access to pets.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PetRepository: Send + Sync {
    /// Insert a pet and return the stored row.
    async fn insert(&self, pet: &NewPet) -> Result<Pet, PetRepositoryError>;

    /// List pets in `scope`, newest first by creation time.
    async fn list(&self, scope: &PetScope) -> Result<Vec<Pet>, PetRepositoryError>;
}
