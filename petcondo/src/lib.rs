//! Condominium pet registry client.
//!
//! Residents sign in against a hosted auth service, register as occupants of
//! a block and apartment, and file pets with an optional preprocessed photo.
//! The crate follows a ports-and-adapters layout:
//!
//! - [`domain`] holds the entities, the registration coordinator and the
//!   ports it drives.
//! - [`outbound`] implements those ports over the hosted REST and auth APIs.
//! - [`inbound`] exposes the coordinator as a command-line tool.
//! - [`config`] loads backend settings.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;
