//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **supabase**: hosted auth and REST tables reached over HTTP with reqwest
//!
//! Adapters are thin translators between domain types and wire
//! representations. They contain no business logic.

pub mod supabase;
