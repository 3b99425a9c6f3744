//! Hosted backend adapters.
//!
//! Thin reqwest implementations of the `SessionProvider`, `ResidentRepository`
//! and `PetRepository` ports. Both adapters share one [`SupabaseClient`] so the
//! REST calls carry the session established by the auth adapter.

mod auth;
mod client;
mod dto;
mod error_mapping;
mod registry;

pub use auth::SupabaseAuth;
pub use client::{ClientSetupError, SupabaseClient};
pub use registry::SupabaseRegistry;
