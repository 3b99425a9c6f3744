//! Reqwest-backed session provider.
//!
//! Talks to the hosted auth endpoints and keeps the access token on the shared
//! [`SupabaseClient`]. Every sign-in, sign-up that yields a session, and
//! sign-out is published to subscribers.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::client::SupabaseClient;
use super::dto::{AuthUserDto, PasswordCredentialsDto, SessionDto, SignUpResponseDto};
use super::error_mapping::{map_auth_status, map_auth_transport_error};
use crate::domain::ports::{
    SessionChanges, SessionProvider, SessionProviderError, SessionSubscription,
};
use crate::domain::{Credentials, EmailConfirmation, SessionIdentity};

const SIGN_UP_PATH: &str = "auth/v1/signup";
const TOKEN_PATH: &str = "auth/v1/token";
const LOGOUT_PATH: &str = "auth/v1/logout";
const USER_PATH: &str = "auth/v1/user";

/// Session provider backed by the hosted auth service.
pub struct SupabaseAuth {
    client: Arc<SupabaseClient>,
    changes: SessionChanges,
}

impl SupabaseAuth {
    /// Wrap a shared client.
    pub fn new(client: Arc<SupabaseClient>) -> Self {
        Self {
            client,
            changes: SessionChanges::new(),
        }
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, SessionProviderError> {
        let url = self.client.url(path).map_err(|error| {
            SessionProviderError::unexpected(format!("invalid auth URL for {path}: {error}"))
        })?;
        Ok(self.client.request(method, url))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Vec<u8>, SessionProviderError> {
        let response = request.send().await.map_err(map_auth_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_auth_transport_error)?;
        if !status.is_success() {
            return Err(map_auth_status(status, body.as_ref()));
        }
        Ok(body.to_vec())
    }

    async fn password_grant(
        &self,
        credentials: &Credentials,
    ) -> Result<SessionIdentity, SessionProviderError> {
        let request = self
            .request(Method::POST, TOKEN_PATH)?
            .query(&[("grant_type", "password")])
            .json(&password_body(credentials));
        let body = self.send(request).await?;
        let session: SessionDto = decode(&body)?;
        self.start_session(session)
    }

    fn start_session(&self, session: SessionDto) -> Result<SessionIdentity, SessionProviderError> {
        let identity = session
            .user
            .to_identity()
            .map_err(SessionProviderError::unexpected)?;
        self.client.set_access_token(Some(session.access_token));
        self.changes.publish(Some(identity.clone()));
        Ok(identity)
    }

    /// Fetch the signed-in account. `None` when no token is held or the token
    /// was rejected; a rejected token is dropped.
    async fn fetch_user(&self) -> Result<Option<AuthUserDto>, SessionProviderError> {
        if !self.client.is_signed_in() {
            return Ok(None);
        }
        let request = self.request(Method::GET, USER_PATH)?;
        let response = request.send().await.map_err(map_auth_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_auth_transport_error)?;
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            debug!(status = status.as_u16(), "access token rejected; signing out locally");
            self.client.set_access_token(None);
            self.changes.publish(None);
            return Ok(None);
        }
        if !status.is_success() {
            return Err(map_auth_status(status, body.as_ref()));
        }
        decode(&body).map(Some)
    }
}

fn password_body(credentials: &Credentials) -> PasswordCredentialsDto<'_> {
    PasswordCredentialsDto {
        email: credentials.email(),
        password: credentials.password(),
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, SessionProviderError> {
    serde_json::from_slice(body).map_err(|error| {
        SessionProviderError::unexpected(format!("invalid auth payload: {error}"))
    })
}

#[async_trait]
impl SessionProvider for SupabaseAuth {
    async fn register(
        &self,
        credentials: &Credentials,
    ) -> Result<SessionIdentity, SessionProviderError> {
        let request = self
            .request(Method::POST, SIGN_UP_PATH)?
            .json(&password_body(credentials));
        let body = self.send(request).await?;

        let user = match decode::<SignUpResponseDto>(&body)? {
            SignUpResponseDto::Session(session) => return self.start_session(session),
            SignUpResponseDto::User(user) => user,
        };
        let created = user.to_identity().map_err(SessionProviderError::unexpected)?;
        if user.confirmation().is_confirmed() {
            return Ok(created);
        }

        match self.password_grant(credentials).await {
            Ok(identity) => Ok(identity),
            Err(err) => {
                warn!(
                    error = %err,
                    kind = err.kind(),
                    "account created but automatic sign-in failed"
                );
                Ok(created)
            }
        }
    }

    async fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> Result<SessionIdentity, SessionProviderError> {
        self.password_grant(credentials).await
    }

    async fn deauthenticate(&self) -> Result<(), SessionProviderError> {
        let outcome = if self.client.is_signed_in() {
            match self.request(Method::POST, LOGOUT_PATH) {
                Ok(request) => self.send(request).await.map(drop),
                Err(err) => Err(err),
            }
        } else {
            Ok(())
        };
        self.client.set_access_token(None);
        self.changes.publish(None);
        outcome
    }

    async fn current_identity(&self) -> Result<Option<SessionIdentity>, SessionProviderError> {
        match self.fetch_user().await? {
            Some(user) => user
                .to_identity()
                .map(Some)
                .map_err(SessionProviderError::unexpected),
            None => Ok(None),
        }
    }

    async fn confirmation_status(
        &self,
    ) -> Result<Option<EmailConfirmation>, SessionProviderError> {
        Ok(self.fetch_user().await?.map(|user| user.confirmation()))
    }

    async fn email_exists(&self, email: &str) -> Result<bool, SessionProviderError> {
        debug!(email, "account lookup is not offered by the auth service; answering false");
        Ok(false)
    }

    fn subscribe(&self) -> SessionSubscription {
        self.changes.subscribe()
    }
}
