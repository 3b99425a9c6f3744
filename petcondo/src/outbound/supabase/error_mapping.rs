//! Translation of HTTP failures into port errors.
//!
//! The auth endpoints report most failures as a 400 with a free-text message,
//! so [`classify_auth_failure`] has to match on message text. That matching is
//! brittle and lives only here.

use reqwest::StatusCode;

use super::dto::{AuthErrorDto, RestErrorDto};
use crate::domain::ports::{PetRepositoryError, ResidentRepositoryError, SessionProviderError};

/// Classify a failed auth response.
pub(super) fn classify_auth_failure(status: StatusCode, message: &str) -> SessionProviderError {
    let lowered = message.to_lowercase();
    let message = message.to_owned();

    if status == StatusCode::TOO_MANY_REQUESTS || lowered.contains("too many requests") {
        return SessionProviderError::rate_limited(message);
    }
    if lowered.contains("invalid login credentials") {
        return SessionProviderError::invalid_credentials(message);
    }
    if lowered.contains("email not confirmed") {
        return SessionProviderError::unconfirmed(message);
    }
    if lowered.contains("already registered") {
        return SessionProviderError::already_registered(message);
    }
    if lowered.contains("unable to validate email address") || lowered.contains("invalid email")
    {
        return SessionProviderError::invalid_email(message);
    }
    if lowered.contains("password") {
        return SessionProviderError::weak_password(message);
    }

    match status {
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
            SessionProviderError::network(message)
        }
        _ => SessionProviderError::unexpected(message),
    }
}

/// Decode an auth error body and classify it.
pub(super) fn map_auth_status(status: StatusCode, body: &[u8]) -> SessionProviderError {
    let message = serde_json::from_slice::<AuthErrorDto>(body)
        .ok()
        .and_then(AuthErrorDto::into_message)
        .unwrap_or_else(|| status_message(status, body));
    classify_auth_failure(status, &message)
}

pub(super) fn map_auth_transport_error(error: reqwest::Error) -> SessionProviderError {
    SessionProviderError::network(error.to_string())
}

/// REST failure before it is attributed to a specific repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum RestFailure {
    Connection(String),
    Query(String),
    Decode(String),
}

impl From<RestFailure> for ResidentRepositoryError {
    fn from(value: RestFailure) -> Self {
        match value {
            RestFailure::Connection(message) => Self::connection(message),
            RestFailure::Query(message) => Self::query(message),
            RestFailure::Decode(message) => Self::decode(message),
        }
    }
}

impl From<RestFailure> for PetRepositoryError {
    fn from(value: RestFailure) -> Self {
        match value {
            RestFailure::Connection(message) => Self::connection(message),
            RestFailure::Query(message) => Self::query(message),
            RestFailure::Decode(message) => Self::decode(message),
        }
    }
}

pub(super) fn map_rest_transport_error(error: reqwest::Error) -> RestFailure {
    if error.is_decode() {
        RestFailure::Decode(error.to_string())
    } else {
        RestFailure::Connection(error.to_string())
    }
}

pub(super) fn map_rest_status(status: StatusCode, body: &[u8]) -> RestFailure {
    let message = match serde_json::from_slice::<RestErrorDto>(body) {
        Ok(RestErrorDto {
            code: Some(code),
            message: Some(text),
        }) => format!("status {} ({code}): {text}", status.as_u16()),
        Ok(RestErrorDto {
            message: Some(text),
            ..
        }) => format!("status {}: {text}", status.as_u16()),
        _ => status_message(status, body),
    };

    match status {
        StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT
        | StatusCode::REQUEST_TIMEOUT => RestFailure::Connection(message),
        _ => RestFailure::Query(message),
    }
}

fn status_message(status: StatusCode, body: &[u8]) -> String {
    let preview = body_preview(body);
    if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {preview}", status.as_u16())
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
