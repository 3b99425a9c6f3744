//! Port for resident persistence.
//!
//! Residents are keyed by the owning session identity; the store enforces at
//! most one resident per identity.

use async_trait::async_trait;

use crate::domain::{Resident, ResidentDraft, SessionId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by resident repository adapters.
    pub enum ResidentRepositoryError {
        /// Store could not be reached.
        Connection { message: String } => "resident repository connection failed: {message}",
        /// Query or insert was rejected.
        Query { message: String } => "resident repository query failed: {message}",
        /// Returned rows did not match the expected shape.
        Decode { message: String } => "resident repository returned malformed rows: {message}",
    }
}

/// Row-level access to residents.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResidentRepository: Send + Sync {
    /// Insert a resident owned by `user_id` and return the stored row,
    /// including its generated id and timestamp.
    async fn insert(
        &self,
        user_id: &SessionId,
        draft: &ResidentDraft,
    ) -> Result<Resident, ResidentRepositoryError>;

    /// Fetch the resident owned by `user_id`.
    ///
    /// Zero rows is a valid outcome and yields `None`.
    async fn find_by_user(
        &self,
        user_id: &SessionId,
    ) -> Result<Option<Resident>, ResidentRepositoryError>;
}
