//! Coordinator state record.

use tokio::sync::watch;

use crate::domain::{Pet, Resident, SessionId, SessionIdentity};

/// Everything the presentation layer renders.
///
/// The coordinator publishes a new value after every change; presentation
/// code renders from a cloned snapshot and never mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatorState {
    /// Cached identity of the live session.
    pub session: Option<SessionIdentity>,
    /// Cached resident owned by `session`.
    pub resident: Option<Resident>,
    /// Cached pets, newest first.
    pub pets: Vec<Pet>,
    /// True until the startup session query has resolved.
    pub session_loading: bool,
    /// True while a registration is in flight.
    pub operation_loading: bool,
}

impl CoordinatorState {
    /// Identifier of the cached session, if any.
    pub fn session_id(&self) -> Option<&SessionId> {
        self.session.as_ref().map(SessionIdentity::id)
    }

    /// True when the cached session belongs to `id`.
    pub fn is_session(&self, id: Option<&SessionId>) -> bool {
        self.session_id() == id
    }

    /// Replace the session, dropping resident data that belonged to a
    /// different identity.
    pub(super) fn replace_session(&mut self, identity: Option<SessionIdentity>) {
        let same_identity = match (&self.session, &identity) {
            (Some(current), Some(next)) => current.id() == next.id(),
            _ => false,
        };
        if !same_identity {
            self.resident = None;
            self.pets.clear();
        }
        self.session = identity;
    }
}

impl Default for CoordinatorState {
    fn default() -> Self {
        Self {
            session: None,
            resident: None,
            pets: Vec::new(),
            session_loading: true,
            operation_loading: false,
        }
    }
}

/// Holds `operation_loading` high until dropped, on every exit path.
pub(super) struct OperationLoading<'a> {
    state: &'a watch::Sender<CoordinatorState>,
}

impl<'a> OperationLoading<'a> {
    pub(super) fn start(state: &'a watch::Sender<CoordinatorState>) -> Self {
        state.send_modify(|current| current.operation_loading = true);
        Self { state }
    }
}

impl Drop for OperationLoading<'_> {
    fn drop(&mut self) {
        self.state.send_modify(|current| current.operation_loading = false);
    }
}
