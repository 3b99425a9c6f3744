//! Driven port for the hosted authentication provider.
//!
//! The provider owns accounts and sessions. The coordinator only caches the
//! identity it reports and listens for session changes, so adapters must
//! publish a change whenever a sign-in, sign-up or sign-out takes effect.

use async_trait::async_trait;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use crate::domain::{Credentials, EmailConfirmation, SessionIdentity};

use super::define_port_error;

/// Buffered session changes per subscriber before older ones are dropped.
const SESSION_CHANGE_CAPACITY: usize = 16;

define_port_error! {
    /// Failures reported by session provider adapters.
    pub enum SessionProviderError {
        /// Email/password pair was rejected.
        InvalidCredentials { message: String } => "invalid credentials: {message}",
        /// An account already exists for the email.
        AlreadyRegistered { message: String } => "account already registered: {message}",
        /// Password does not meet the provider's policy.
        WeakPassword { message: String } => "password rejected: {message}",
        /// Email address was rejected.
        InvalidEmail { message: String } => "email rejected: {message}",
        /// Provider asked the client to slow down.
        RateLimited { message: String } => "rate limited: {message}",
        /// Provider could not be reached.
        Network { message: String } => "session provider unreachable: {message}",
        /// Sign-in refused until the email is confirmed.
        Unconfirmed { message: String } => "email not confirmed: {message}",
        /// Any other provider failure.
        Unexpected { message: String } => "session provider failed: {message}",
    }
}

/// Receiving end of a session-change subscription.
///
/// Each item is the new identity, or `None` after a sign-out or expiry.
/// Dropping the subscription unsubscribes.
#[derive(Debug)]
pub struct SessionSubscription {
    receiver: broadcast::Receiver<Option<SessionIdentity>>,
}

impl SessionSubscription {
    /// Wrap a broadcast receiver.
    pub fn new(receiver: broadcast::Receiver<Option<SessionIdentity>>) -> Self {
        Self { receiver }
    }

    /// Wait for the next session change.
    ///
    /// Returns `None` once the publisher is gone. A subscriber that fell
    /// behind skips the changes it missed and carries on with the oldest
    /// change still buffered.
    pub async fn next(&mut self) -> Option<Option<SessionIdentity>> {
        loop {
            match self.receiver.recv().await {
                Ok(change) => return Some(change),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "session subscription lagged; skipping missed changes");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

/// Publisher side shared by adapters that emit session changes.
#[derive(Debug, Clone)]
pub struct SessionChanges {
    sender: broadcast::Sender<Option<SessionIdentity>>,
}

impl SessionChanges {
    /// Create a publisher with no subscribers.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(SESSION_CHANGE_CAPACITY);
        Self { sender }
    }

    /// Notify every live subscriber.
    pub fn publish(&self, identity: Option<SessionIdentity>) {
        if self.sender.send(identity).is_err() {
            tracing::trace!("session change published with no subscribers");
        }
    }

    /// Open a new subscription that sees changes published from now on.
    pub fn subscribe(&self) -> SessionSubscription {
        SessionSubscription::new(self.sender.subscribe())
    }
}

impl Default for SessionChanges {
    fn default() -> Self {
        Self::new()
    }
}

/// Port for account and session operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Create an account and return its identity.
    async fn register(
        &self,
        credentials: &Credentials,
    ) -> Result<SessionIdentity, SessionProviderError>;

    /// Sign in with an email/password pair.
    async fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> Result<SessionIdentity, SessionProviderError>;

    /// End the current session.
    async fn deauthenticate(&self) -> Result<(), SessionProviderError>;

    /// Identity of the live session, if any.
    async fn current_identity(&self) -> Result<Option<SessionIdentity>, SessionProviderError>;

    /// Re-query whether the live session's email has been confirmed.
    ///
    /// Returns `None` when no session is live.
    async fn confirmation_status(
        &self,
    ) -> Result<Option<EmailConfirmation>, SessionProviderError>;

    /// Report whether an account exists for `email`.
    ///
    /// Unreliable: hosted providers do not expose this lookup, and the bundled
    /// adapter always answers `false`. Do not gate behaviour on it.
    async fn email_exists(&self, email: &str) -> Result<bool, SessionProviderError>;

    /// Subscribe to session changes.
    fn subscribe(&self) -> SessionSubscription;
}
