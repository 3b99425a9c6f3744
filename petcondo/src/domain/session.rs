//! Session identity and credential primitives.
//!
//! A [`SessionIdentity`] is the provider's view of the signed-in account. It is
//! independent of any resident record: an account may exist for a while before
//! its owner registers as a resident.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroizing;

use super::validation::{EmailAddress, is_blank};

/// Validation errors raised by session primitives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionValidationError {
    /// Identifier was blank once trimmed.
    EmptyId,
    /// Email was missing or malformed.
    InvalidEmail,
    /// Password was empty.
    EmptyPassword,
}

impl fmt::Display for SessionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "session id must not be empty"),
            Self::InvalidEmail => write!(f, "email must be a valid address"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for SessionValidationError {}

/// Opaque identifier issued by the authentication provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(String);

impl SessionId {
    /// Validate and construct a [`SessionId`].
    pub fn new(id: impl Into<String>) -> Result<Self, SessionValidationError> {
        let id = id.into();
        if is_blank(&id) {
            return Err(SessionValidationError::EmptyId);
        }
        Ok(Self(id))
    }

    /// Generate a random identifier, mainly for fixtures.
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<SessionId> for String {
    fn from(value: SessionId) -> Self {
        value.0
    }
}

impl TryFrom<String> for SessionId {
    type Error = SessionValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Authenticated account as reported by the session provider.
///
/// ## Invariants
/// - `id` is non-blank.
/// - `email` is whatever the provider recorded; it is not re-validated here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    id: SessionId,
    email: String,
}

impl SessionIdentity {
    /// Build an identity from provider-issued parts.
    pub fn new(id: SessionId, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
        }
    }

    /// Provider-issued identifier.
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Email the account signed up with.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }
}

/// Whether the provider has seen the account's email confirmation link used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailConfirmation {
    /// The confirmation link was followed.
    Confirmed,
    /// The account is still waiting for confirmation.
    Pending,
}

impl EmailConfirmation {
    /// True when the provider reported a confirmation timestamp.
    pub fn is_confirmed(self) -> bool {
        matches!(self, Self::Confirmed)
    }
}

/// Validated email/password pair sent to the session provider.
///
/// The password is zeroised on drop and never printed by `Debug`.
///
/// # Examples
/// ```
/// use petcondo::domain::Credentials;
///
/// let creds = Credentials::try_from_parts(" ana@example.com ", "hunter22").unwrap();
/// assert_eq!(creds.email(), "ana@example.com");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Construct credentials from raw form inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, SessionValidationError> {
        let email = EmailAddress::parse(email).map_err(|_| SessionValidationError::InvalidEmail)?;
        if password.is_empty() {
            return Err(SessionValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised email address.
    pub fn email(&self) -> &str {
        self.email.as_ref()
    }

    /// Password exactly as typed.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", SessionValidationError::InvalidEmail)]
    #[case("no-at-sign", "pw", SessionValidationError::InvalidEmail)]
    #[case("ana@example.com", "", SessionValidationError::EmptyPassword)]
    fn credentials_reject_bad_input(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: SessionValidationError,
    ) {
        let err = Credentials::try_from_parts(email, password).expect_err("must fail");
        assert_eq!(err, expected);
    }

    #[test]
    fn credentials_debug_hides_password() {
        let creds = Credentials::try_from_parts("ana@example.com", "s3cret!").expect("valid");
        let rendered = format!("{creds:?}");
        assert!(!rendered.contains("s3cret!"));
        assert!(rendered.contains("ana@example.com"));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn session_id_rejects_blank(#[case] raw: &str) {
        assert_eq!(SessionId::new(raw), Err(SessionValidationError::EmptyId));
    }

    #[test]
    fn session_id_round_trips_through_serde() {
        let id = SessionId::new("u1").expect("valid id");
        let json = serde_json::to_string(&id).expect("serialise");
        assert_eq!(json, "\"u1\"");
        let back: SessionId = serde_json::from_str(&json).expect("deserialise");
        assert_eq!(back, id);
    }
}
