//! Recording in-memory doubles for the driven ports.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use petcondo::domain::ports::{
    PetRepository, PetRepositoryError, ResidentRepository, ResidentRepositoryError,
    SessionChanges, SessionProvider, SessionProviderError, SessionSubscription,
};
use petcondo::domain::{
    Credentials, EmailConfirmation, NewPet, Pet, PetId, PetScope, Resident, ResidentDraft,
    ResidentId, SessionId, SessionIdentity,
};

/// Identity the session double hands out for `email`.
pub fn identity_for(email: &str) -> SessionIdentity {
    SessionIdentity::new(SessionId::new(format!("user:{email}")).expect("id"), email)
}

/// Call observed by [`RecordingSessionProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCall {
    Register(String),
    Authenticate(String),
    Deauthenticate,
    CurrentIdentity,
    ConfirmationStatus,
}

/// Session provider that accepts any credentials and publishes every change.
#[derive(Clone)]
pub struct RecordingSessionProvider {
    calls: Arc<Mutex<Vec<SessionCall>>>,
    current: Arc<Mutex<Option<SessionIdentity>>>,
    confirmation: Arc<Mutex<EmailConfirmation>>,
    changes: SessionChanges,
}

impl RecordingSessionProvider {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            current: Arc::new(Mutex::new(None)),
            confirmation: Arc::new(Mutex::new(EmailConfirmation::Confirmed)),
            changes: SessionChanges::new(),
        }
    }

    pub fn calls(&self) -> Vec<SessionCall> {
        self.calls.lock().expect("session calls lock").clone()
    }

    pub fn set_confirmation(&self, confirmation: EmailConfirmation) {
        *self.confirmation.lock().expect("confirmation lock") = confirmation;
    }

    /// Switch accounts out of band, as another tab would.
    pub fn switch_to(&self, identity: Option<SessionIdentity>) {
        *self.current.lock().expect("current session lock") = identity.clone();
        self.changes.publish(identity);
    }

    fn record(&self, call: SessionCall) {
        self.calls.lock().expect("session calls lock").push(call);
    }

    fn start(&self, credentials: &Credentials) -> SessionIdentity {
        let identity = identity_for(credentials.email());
        self.switch_to(Some(identity.clone()));
        identity
    }
}

#[async_trait]
impl SessionProvider for RecordingSessionProvider {
    async fn register(
        &self,
        credentials: &Credentials,
    ) -> Result<SessionIdentity, SessionProviderError> {
        self.record(SessionCall::Register(credentials.email().to_owned()));
        Ok(self.start(credentials))
    }

    async fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> Result<SessionIdentity, SessionProviderError> {
        self.record(SessionCall::Authenticate(credentials.email().to_owned()));
        Ok(self.start(credentials))
    }

    async fn deauthenticate(&self) -> Result<(), SessionProviderError> {
        self.record(SessionCall::Deauthenticate);
        self.switch_to(None);
        Ok(())
    }

    async fn current_identity(&self) -> Result<Option<SessionIdentity>, SessionProviderError> {
        self.record(SessionCall::CurrentIdentity);
        Ok(self.current.lock().expect("current session lock").clone())
    }

    async fn confirmation_status(
        &self,
    ) -> Result<Option<EmailConfirmation>, SessionProviderError> {
        self.record(SessionCall::ConfirmationStatus);
        let signed_in = self.current.lock().expect("current session lock").is_some();
        let confirmation = *self.confirmation.lock().expect("confirmation lock");
        Ok(signed_in.then_some(confirmation))
    }

    async fn email_exists(&self, _email: &str) -> Result<bool, SessionProviderError> {
        Ok(false)
    }

    fn subscribe(&self) -> SessionSubscription {
        self.changes.subscribe()
    }
}

/// Resident and pet tables held in memory.
///
/// Pets are kept newest first. A queued pet failure is returned by the next
/// pet insert only.
#[derive(Clone, Default)]
pub struct InMemoryRegistry {
    residents: Arc<Mutex<Vec<Resident>>>,
    pets: Arc<Mutex<Vec<Pet>>>,
    pet_failure: Arc<Mutex<Option<PetRepositoryError>>>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn residents(&self) -> Vec<Resident> {
        self.residents.lock().expect("residents lock").clone()
    }

    pub fn pets(&self) -> Vec<Pet> {
        self.pets.lock().expect("pets lock").clone()
    }

    pub fn fail_next_pet_insert(&self, error: PetRepositoryError) {
        *self.pet_failure.lock().expect("pet failure lock") = Some(error);
    }
}

#[async_trait]
impl ResidentRepository for InMemoryRegistry {
    async fn insert(
        &self,
        user_id: &SessionId,
        draft: &ResidentDraft,
    ) -> Result<Resident, ResidentRepositoryError> {
        let mut residents = self.residents.lock().expect("residents lock");
        if residents.iter().any(|resident| &resident.user_id == user_id) {
            return Err(ResidentRepositoryError::query(
                "duplicate key value violates unique constraint \"residents_user_id_key\"",
            ));
        }
        let resident = Resident {
            id: ResidentId::random(),
            user_id: user_id.clone(),
            name: draft.name().to_owned(),
            block: draft.block().to_owned(),
            apartment: draft.apartment().to_owned(),
            phone: draft.phone().to_owned(),
            email: draft.email().to_owned(),
            created_at: Utc::now(),
        };
        residents.push(resident.clone());
        Ok(resident)
    }

    async fn find_by_user(
        &self,
        user_id: &SessionId,
    ) -> Result<Option<Resident>, ResidentRepositoryError> {
        Ok(self
            .residents
            .lock()
            .expect("residents lock")
            .iter()
            .find(|resident| &resident.user_id == user_id)
            .cloned())
    }
}

#[async_trait]
impl PetRepository for InMemoryRegistry {
    async fn insert(&self, pet: &NewPet) -> Result<Pet, PetRepositoryError> {
        if let Some(error) = self.pet_failure.lock().expect("pet failure lock").take() {
            return Err(error);
        }
        let mut pets = self.pets.lock().expect("pets lock");
        let offset = i64::try_from(pets.len()).expect("pet count");
        let stored = Pet {
            id: PetId::random(),
            resident_id: pet.owner.id.clone(),
            resident_name: pet.owner.name.clone(),
            resident_block: pet.owner.block.clone(),
            resident_apartment: pet.owner.apartment.clone(),
            name: pet.details.name().to_owned(),
            species: pet.details.species().to_owned(),
            breed: pet.details.breed().to_owned(),
            age: pet.details.age(),
            description: pet.details.description().to_owned(),
            photo: pet.details.photo().to_owned(),
            created_at: Utc::now() + Duration::seconds(offset),
        };
        pets.insert(0, stored.clone());
        Ok(stored)
    }

    async fn list(&self, scope: &PetScope) -> Result<Vec<Pet>, PetRepositoryError> {
        let pets = self.pets();
        match scope {
            PetScope::All => Ok(pets),
            PetScope::OwnedBy(user_id) => {
                let owned: Vec<ResidentId> = self
                    .residents()
                    .into_iter()
                    .filter(|resident| &resident.user_id == user_id)
                    .map(|resident| resident.id)
                    .collect();
                Ok(pets
                    .into_iter()
                    .filter(|pet| owned.contains(&pet.resident_id))
                    .collect())
            }
        }
    }
}
