//! Wire DTOs for the auth and REST endpoints.
//!
//! Rows are decoded into snake_case transport structs first, then mapped into
//! domain records in one pass so shape errors surface as `Decode` failures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    EmailConfirmation, NewPet, Pet, PetId, Resident, ResidentDraft, ResidentId, SessionId,
    SessionIdentity,
};

#[derive(Debug, Serialize)]
pub(super) struct PasswordCredentialsDto<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
}

/// Account as reported by the auth endpoints.
#[derive(Debug, Clone, Deserialize)]
pub(super) struct AuthUserDto {
    pub(super) id: String,
    #[serde(default)]
    pub(super) email: Option<String>,
    #[serde(default)]
    pub(super) email_confirmed_at: Option<String>,
    #[serde(default)]
    pub(super) confirmed_at: Option<String>,
}

impl AuthUserDto {
    pub(super) fn to_identity(&self) -> Result<SessionIdentity, String> {
        let id = SessionId::new(self.id.as_str())
            .map_err(|error| format!("user payload has an invalid id: {error}"))?;
        let email = self.email.clone().unwrap_or_default();
        Ok(SessionIdentity::new(id, email))
    }

    pub(super) fn confirmation(&self) -> EmailConfirmation {
        let confirmed = [&self.email_confirmed_at, &self.confirmed_at]
            .into_iter()
            .any(|stamp| stamp.as_deref().is_some_and(|value| !value.is_empty()));
        if confirmed {
            EmailConfirmation::Confirmed
        } else {
            EmailConfirmation::Pending
        }
    }
}

/// Session issued by a password grant, or by sign-up when no confirmation is
/// required.
#[derive(Debug, Deserialize)]
pub(super) struct SessionDto {
    pub(super) access_token: String,
    pub(super) user: AuthUserDto,
}

/// Sign-up answers with a session when the account is usable immediately and
/// with the bare user while the email awaits confirmation.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum SignUpResponseDto {
    Session(SessionDto),
    User(AuthUserDto),
}

/// Error body shapes used by the auth endpoints across versions.
#[derive(Debug, Default, Deserialize)]
pub(super) struct AuthErrorDto {
    #[serde(default)]
    pub(super) msg: Option<String>,
    #[serde(default)]
    pub(super) message: Option<String>,
    #[serde(default)]
    pub(super) error_description: Option<String>,
    #[serde(default)]
    pub(super) error: Option<String>,
}

impl AuthErrorDto {
    pub(super) fn into_message(self) -> Option<String> {
        [self.msg, self.message, self.error_description, self.error]
            .into_iter()
            .flatten()
            .find(|text| !text.trim().is_empty())
    }
}

/// Error body returned by the REST endpoints.
#[derive(Debug, Default, Deserialize)]
pub(super) struct RestErrorDto {
    #[serde(default)]
    pub(super) code: Option<String>,
    #[serde(default)]
    pub(super) message: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct NewResidentRowDto<'a> {
    pub(super) user_id: &'a str,
    pub(super) name: &'a str,
    pub(super) block: &'a str,
    pub(super) apartment: &'a str,
    pub(super) phone: &'a str,
    pub(super) email: &'a str,
}

impl<'a> NewResidentRowDto<'a> {
    pub(super) fn new(user_id: &'a SessionId, draft: &'a ResidentDraft) -> Self {
        Self {
            user_id: user_id.as_ref(),
            name: draft.name(),
            block: draft.block(),
            apartment: draft.apartment(),
            phone: draft.phone(),
            email: draft.email(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ResidentRowDto {
    pub(super) id: String,
    pub(super) user_id: String,
    pub(super) name: String,
    #[serde(default)]
    pub(super) block: Option<String>,
    pub(super) apartment: String,
    #[serde(default)]
    pub(super) phone: Option<String>,
    #[serde(default)]
    pub(super) email: Option<String>,
    pub(super) created_at: DateTime<Utc>,
}

impl ResidentRowDto {
    pub(super) fn into_domain(self) -> Result<Resident, String> {
        let user_id = SessionId::new(self.user_id)
            .map_err(|error| format!("resident {} has an invalid user_id: {error}", self.id))?;
        Ok(Resident {
            id: ResidentId::new(self.id),
            user_id,
            name: self.name,
            block: self.block.unwrap_or_default(),
            apartment: self.apartment,
            phone: self.phone.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Serialize)]
pub(super) struct NewPetRowDto<'a> {
    pub(super) resident_id: &'a str,
    pub(super) resident_name: &'a str,
    pub(super) resident_block: &'a str,
    pub(super) resident_apartment: &'a str,
    pub(super) name: &'a str,
    pub(super) species: &'a str,
    pub(super) breed: &'a str,
    pub(super) age: u8,
    pub(super) description: &'a str,
    pub(super) photo: &'a str,
}

impl<'a> From<&'a NewPet> for NewPetRowDto<'a> {
    fn from(value: &'a NewPet) -> Self {
        Self {
            resident_id: value.owner.id.as_ref(),
            resident_name: value.owner.name.as_str(),
            resident_block: value.owner.block.as_str(),
            resident_apartment: value.owner.apartment.as_str(),
            name: value.details.name(),
            species: value.details.species(),
            breed: value.details.breed(),
            age: value.details.age(),
            description: value.details.description(),
            photo: value.details.photo(),
        }
    }
}

/// Pet row. Owned-pet listings also carry an embedded `residents` object,
/// which is ignored.
#[derive(Debug, Deserialize)]
pub(super) struct PetRowDto {
    pub(super) id: String,
    pub(super) resident_id: String,
    pub(super) resident_name: String,
    #[serde(default)]
    pub(super) resident_block: Option<String>,
    pub(super) resident_apartment: String,
    pub(super) name: String,
    pub(super) species: String,
    pub(super) breed: String,
    pub(super) age: i64,
    #[serde(default)]
    pub(super) description: Option<String>,
    #[serde(default)]
    pub(super) photo: Option<String>,
    pub(super) created_at: DateTime<Utc>,
}

impl PetRowDto {
    pub(super) fn into_domain(self) -> Result<Pet, String> {
        let age = u8::try_from(self.age)
            .map_err(|_| format!("pet {} has an out-of-range age {}", self.id, self.age))?;
        Ok(Pet {
            id: PetId::new(self.id),
            resident_id: ResidentId::new(self.resident_id),
            resident_name: self.resident_name,
            resident_block: self.resident_block.unwrap_or_default(),
            resident_apartment: self.resident_apartment,
            name: self.name,
            species: self.species,
            breed: self.breed,
            age,
            description: self.description.unwrap_or_default(),
            photo: self.photo.unwrap_or_default(),
            created_at: self.created_at,
        })
    }
}
