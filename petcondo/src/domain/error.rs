//! Domain-level error types.
//!
//! These errors are presentation agnostic. The CLI maps them to user-facing
//! titles and messages; other front ends can do the same from [`ErrorCode`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Form input failed validation.
    InvalidRequest,
    /// The operation needs a signed-in session.
    AccessDenied,
    /// Registration is blocked until the account email is confirmed.
    EmailUnconfirmed,
    /// The session provider rejected the email/password pair.
    InvalidCredentials,
    /// An account already exists for the email.
    AlreadyRegistered,
    /// The session provider rejected the password as too weak.
    WeakPassword,
    /// The session provider rejected the email address.
    InvalidEmail,
    /// Too many attempts; the provider asked the client to back off.
    RateLimited,
    /// A capability could not be reached.
    Network,
    /// Sign-in refused because the email is not confirmed yet.
    Unconfirmed,
    /// The data store rejected or failed a read or write.
    Persistence,
    /// An unexpected error occurred inside the domain.
    InternalError,
}

impl ErrorCode {
    /// Diagnostic used when an error is raised without a message.
    pub fn fallback_message(self) -> &'static str {
        match self {
            Self::InvalidRequest => "request failed validation",
            Self::AccessDenied => "a signed-in session is required",
            Self::EmailUnconfirmed => "account email is not confirmed",
            Self::InvalidCredentials => "email or password rejected",
            Self::AlreadyRegistered => "account already exists",
            Self::WeakPassword => "password rejected",
            Self::InvalidEmail => "email address rejected",
            Self::RateLimited => "too many attempts",
            Self::Network => "service unreachable",
            Self::Unconfirmed => "sign-in refused until the email is confirmed",
            Self::Persistence => "data store rejected the operation",
            Self::InternalError => "unexpected failure",
        }
    }
}

/// Domain error payload.
///
/// `message` is never blank.
///
/// # Examples
/// ```
/// use petcondo::domain::{Error, ErrorCode};
///
/// let err = Error::access_denied("sign in first");
/// assert_eq!(err.code(), ErrorCode::AccessDenied);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Error {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

/// Validation errors emitted by the constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorValidationError {
    /// The message was blank.
    EmptyMessage,
}

impl std::fmt::Display for ErrorValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyMessage => write!(f, "error message must not be empty"),
        }
    }
}

impl std::error::Error for ErrorValidationError {}

impl Error {
    /// Create an error. A blank `message` is replaced by the code's
    /// [`ErrorCode::fallback_message`].
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::try_new(code, message).unwrap_or_else(|_| Self {
            code,
            message: code.fallback_message().to_owned(),
            details: None,
        })
    }

    /// Fallible constructor that validates the message content.
    pub fn try_new(
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self {
            code,
            message,
            details: None,
        })
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable diagnostic message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Supplementary structured details.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach structured details to the error.
    ///
    /// # Examples
    /// ```
    /// use petcondo::domain::Error;
    /// use serde_json::json;
    ///
    /// let err = Error::persistence("pet insert failed")
    ///     .with_details(json!({ "residentId": "r1" }));
    /// assert!(err.details().is_some());
    /// ```
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::AccessDenied`].
    pub fn access_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AccessDenied, message)
    }

    /// Convenience constructor for [`ErrorCode::EmailUnconfirmed`].
    pub fn email_unconfirmed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::EmailUnconfirmed, message)
    }

    /// Convenience constructor for [`ErrorCode::Persistence`].
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Persistence, message)
    }

    /// Convenience constructor for [`ErrorCode::Network`].
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Network, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}
