//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Every external capability the coordinator talks to is a trait here, so
//! adapters and test doubles are interchangeable.

mod macros;
pub(crate) use macros::define_port_error;

mod pet_repository;
mod resident_repository;
mod session_provider;

#[cfg(test)]
pub use pet_repository::MockPetRepository;
pub use pet_repository::{PetRepository, PetRepositoryError};
#[cfg(test)]
pub use resident_repository::MockResidentRepository;
pub use resident_repository::{ResidentRepository, ResidentRepositoryError};
#[cfg(test)]
pub use session_provider::MockSessionProvider;
pub use session_provider::{
    SessionChanges, SessionProvider, SessionProviderError, SessionSubscription,
};
