//! Registration and session coordinator.
//!
//! The coordinator caches the live session, the resident that session owns
//! and a pet list, and runs the registration workflow against the injected
//! ports. State changes are published on a `watch` channel so presentation
//! code can re-render from the latest snapshot.
//!
//! Session notifications may arrive while an operation is suspended on a
//! port call. Every result that is applied after an `await` is checked
//! against the session id it was computed for and dropped if the session has
//! moved on since.

use std::sync::Arc;

use serde_json::json;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    PetRepository, PetRepositoryError, ResidentRepository, ResidentRepositoryError,
    SessionProvider, SessionProviderError, SessionSubscription,
};
use crate::domain::{
    Credentials, DomainResult, EmailConfirmation, Error, ErrorCode, NewPet, Pet, PetScope,
    RegistrationForm, Resident, SessionId, SessionIdentity,
};

mod state;

pub use state::CoordinatorState;
use state::OperationLoading;

/// Session and registration coordinator.
pub struct Coordinator<S, R, P> {
    sessions: Arc<S>,
    residents: Arc<R>,
    pets: Arc<P>,
    state: watch::Sender<CoordinatorState>,
}

impl<S, R, P> Coordinator<S, R, P> {
    /// Create a coordinator over the given ports. Nothing is cached until
    /// [`Coordinator::initialize`] runs.
    pub fn new(sessions: Arc<S>, residents: Arc<R>, pets: Arc<P>) -> Self {
        let (state, _) = watch::channel(CoordinatorState::default());
        Self {
            sessions,
            residents,
            pets,
            state,
        }
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> CoordinatorState {
        self.state.borrow().clone()
    }

    /// Receiver notified after every state change.
    pub fn subscribe(&self) -> watch::Receiver<CoordinatorState> {
        self.state.subscribe()
    }

    fn current_session_id(&self) -> Option<SessionId> {
        self.state.borrow().session_id().cloned()
    }

    fn replace_session(&self, identity: Option<SessionIdentity>) {
        self.state.send_modify(|state| state.replace_session(identity));
    }
}

impl<S, R, P> Coordinator<S, R, P>
where
    S: SessionProvider,
    R: ResidentRepository,
    P: PetRepository,
{
    /// Restore the provider's session, load its resident and subscribe to
    /// session changes.
    ///
    /// Failures while restoring are logged and leave the coordinator signed
    /// out or without a resident; they never abort startup. Drive the
    /// returned subscription with [`Coordinator::follow_session_changes`].
    pub async fn initialize(&self) -> SessionSubscription {
        let identity = match self.sessions.current_identity().await {
            Ok(identity) => identity,
            Err(err) => {
                warn!(error = %err, kind = err.kind(), "could not restore session");
                None
            }
        };

        self.replace_session(identity.clone());
        if let Some(identity) = identity {
            self.reload_owned(identity.id()).await;
        }

        let subscription = self.sessions.subscribe();
        self.state.send_modify(|state| state.session_loading = false);
        subscription
    }

    /// Apply session changes until the subscription closes.
    pub async fn follow_session_changes(&self, mut subscription: SessionSubscription) {
        while let Some(identity) = subscription.next().await {
            self.apply_session_change(identity).await;
        }
        debug!("session subscription closed");
    }

    /// Apply one session notification: cache the new identity and reload its
    /// resident, or clear everything when signed out.
    pub async fn apply_session_change(&self, identity: Option<SessionIdentity>) {
        self.state.send_modify(|state| {
            state.replace_session(identity.clone());
            state.session_loading = false;
        });
        if let Some(identity) = identity {
            self.reload_owned(identity.id()).await;
        }
    }

    /// Sign in and load the resident owned by the new session.
    pub async fn authenticate(&self, credentials: &Credentials) -> DomainResult<SessionIdentity> {
        let identity = self
            .sessions
            .authenticate(credentials)
            .await
            .map_err(map_session_error)?;
        self.replace_session(Some(identity.clone()));
        self.reload_owned(identity.id()).await;
        info!(session_id = %identity.id(), "signed in");
        Ok(identity)
    }

    /// Create an account. The new session starts without a resident.
    pub async fn register(&self, credentials: &Credentials) -> DomainResult<SessionIdentity> {
        let identity = self
            .sessions
            .register(credentials)
            .await
            .map_err(map_session_error)?;
        self.replace_session(Some(identity.clone()));
        info!(session_id = %identity.id(), "account registered");
        Ok(identity)
    }

    /// Sign out. Cached state is cleared even when the provider call fails.
    pub async fn deauthenticate(&self) {
        if let Err(err) = self.sessions.deauthenticate().await {
            warn!(
                error = %err,
                kind = err.kind(),
                "sign-out failed; clearing local session anyway"
            );
        }
        self.replace_session(None);
    }

    /// Ask the provider whether an account exists for `email`.
    ///
    /// The bundled provider adapter cannot answer this and always reports
    /// `false`; treat a `true` as a hint only.
    pub async fn email_exists(&self, email: &str) -> DomainResult<bool> {
        self.sessions
            .email_exists(email)
            .await
            .map_err(map_session_error)
    }

    /// Register a pet, creating the resident first when this session has none.
    ///
    /// # Errors
    ///
    /// - [`ErrorCode::AccessDenied`] without a session; no port is called.
    /// - [`ErrorCode::EmailUnconfirmed`] when the provider reports the email
    ///   as pending; nothing is written.
    /// - Persistence errors from either insert. A resident created before a
    ///   failed pet insert stays stored and cached, so a retry only inserts
    ///   the pet.
    pub async fn submit_registration(&self, form: &RegistrationForm) -> DomainResult<Pet> {
        let Some(identity) = self.snapshot().session else {
            return Err(Error::access_denied("sign in to register pets"));
        };
        let session_id = identity.id();

        let _loading = OperationLoading::start(&self.state);
        self.ensure_email_confirmed().await?;

        let (resident, resident_created) = match self.cached_resident(session_id) {
            Some(resident) => (resident, false),
            None => (self.create_resident(session_id, form).await?, true),
        };

        let new_pet = NewPet::new(resident.snapshot(), form.pet.clone());
        let pet = self.pets.insert(&new_pet).await.map_err(|err| {
            map_pet_error(err).with_details(json!({
                "residentId": resident.id,
                "residentCreated": resident_created,
            }))
        })?;

        let prepended = self.state.send_if_modified(|state| {
            if !state.is_session(Some(session_id)) {
                return false;
            }
            state.pets.insert(0, pet.clone());
            true
        });
        if prepended {
            let scope = PetScope::OwnedBy(session_id.clone());
            if let Err(err) = self.refresh_pets_for(Some(session_id), &scope).await {
                warn!(error = %err, "pet list refresh after registration failed");
            }
        } else {
            debug!(
                session_id = %session_id,
                "session changed during registration; not caching pet"
            );
        }

        info!(
            session_id = %session_id,
            resident_id = %resident.id,
            pet_id = %pet.id,
            resident_created,
            "pet registered"
        );
        Ok(pet)
    }

    /// Load the resident owned by `session_id` and the pets in `scope`.
    ///
    /// Zero resident rows is not an error. When no resident exists an owned
    /// scope yields an empty list without querying. The result is only
    /// applied if `session_id` is still the cached session when the queries
    /// resolve; the return value reports whether it was applied.
    pub async fn load_resident_and_pets(
        &self,
        session_id: &SessionId,
        scope: &PetScope,
    ) -> DomainResult<bool> {
        let resident = self
            .residents
            .find_by_user(session_id)
            .await
            .map_err(map_resident_error)?;
        let pets = match (&resident, scope) {
            (None, PetScope::OwnedBy(_)) => Vec::new(),
            _ => self.pets.list(scope).await.map_err(map_pet_error)?,
        };

        let applied = self.state.send_if_modified(|state| {
            if !state.is_session(Some(session_id)) {
                return false;
            }
            state.resident = resident;
            state.pets = pets;
            true
        });
        if !applied {
            debug!(session_id = %session_id, "discarding stale resident reload");
        }
        Ok(applied)
    }

    /// Re-fetch only the pet list for `scope`, e.g. when a listing view opens.
    ///
    /// Like [`Coordinator::load_resident_and_pets`], the list is dropped if
    /// the session changed while the query was in flight. An owned scope is
    /// only applied while its owner is the cached session.
    pub async fn refresh_pets(&self, scope: &PetScope) -> DomainResult<bool> {
        match scope {
            PetScope::OwnedBy(owner) => self.refresh_pets_for(Some(owner), scope).await,
            PetScope::All => {
                let started_for = self.current_session_id();
                self.refresh_pets_for(started_for.as_ref(), scope).await
            }
        }
    }

    async fn refresh_pets_for(
        &self,
        expected: Option<&SessionId>,
        scope: &PetScope,
    ) -> DomainResult<bool> {
        let pets = self.pets.list(scope).await.map_err(map_pet_error)?;

        let applied = self.state.send_if_modified(|state| {
            if !state.is_session(expected) {
                return false;
            }
            state.pets = pets;
            true
        });
        if !applied {
            debug!("discarding stale pet list");
        }
        Ok(applied)
    }

    async fn reload_owned(&self, session_id: &SessionId) {
        let scope = PetScope::OwnedBy(session_id.clone());
        if let Err(err) = self.load_resident_and_pets(session_id, &scope).await {
            warn!(session_id = %session_id, error = %err, "resident reload failed");
        }
    }

    async fn ensure_email_confirmed(&self) -> DomainResult<()> {
        match self.sessions.confirmation_status().await {
            Ok(Some(EmailConfirmation::Pending)) => Err(Error::email_unconfirmed(
                "confirm your email before registering pets",
            )),
            Ok(Some(EmailConfirmation::Confirmed) | None) => Ok(()),
            Err(err) => {
                warn!(
                    error = %err,
                    kind = err.kind(),
                    "email confirmation check failed; continuing"
                );
                Ok(())
            }
        }
    }

    fn cached_resident(&self, session_id: &SessionId) -> Option<Resident> {
        let state = self.state.borrow();
        state
            .resident
            .as_ref()
            .filter(|resident| &resident.user_id == session_id)
            .cloned()
    }

    async fn create_resident(
        &self,
        session_id: &SessionId,
        form: &RegistrationForm,
    ) -> DomainResult<Resident> {
        let resident = self
            .residents
            .insert(session_id, &form.resident)
            .await
            .map_err(map_resident_error)?;
        self.state.send_if_modified(|state| {
            if !state.is_session(Some(session_id)) {
                return false;
            }
            state.resident = Some(resident.clone());
            true
        });
        info!(session_id = %session_id, resident_id = %resident.id, "resident created");
        Ok(resident)
    }
}

fn map_session_error(error: SessionProviderError) -> Error {
    let code = match &error {
        SessionProviderError::InvalidCredentials { .. } => ErrorCode::InvalidCredentials,
        SessionProviderError::AlreadyRegistered { .. } => ErrorCode::AlreadyRegistered,
        SessionProviderError::WeakPassword { .. } => ErrorCode::WeakPassword,
        SessionProviderError::InvalidEmail { .. } => ErrorCode::InvalidEmail,
        SessionProviderError::RateLimited { .. } => ErrorCode::RateLimited,
        SessionProviderError::Network { .. } => ErrorCode::Network,
        SessionProviderError::Unconfirmed { .. } => ErrorCode::Unconfirmed,
        SessionProviderError::Unexpected { .. } => ErrorCode::InternalError,
    };
    Error::new(code, error.to_string())
}

fn map_resident_error(error: ResidentRepositoryError) -> Error {
    match error {
        ResidentRepositoryError::Connection { message } => {
            Error::network(format!("resident store unavailable: {message}"))
        }
        ResidentRepositoryError::Query { .. } | ResidentRepositoryError::Decode { .. } => {
            Error::persistence(error.to_string())
        }
    }
}

fn map_pet_error(error: PetRepositoryError) -> Error {
    match error {
        PetRepositoryError::Connection { message } => {
            Error::network(format!("pet store unavailable: {message}"))
        }
        PetRepositoryError::Query { .. } | PetRepositoryError::Decode { .. } => {
            Error::persistence(error.to_string())
        }
    }
}
