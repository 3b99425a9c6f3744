//! Shared HTTP plumbing for the auth and REST adapters.
//!
//! One [`SupabaseClient`] is shared by [`super::SupabaseAuth`] and
//! [`super::SupabaseRegistry`]: the auth adapter stores the access token of the
//! signed-in user and the registry sends it, so row-level policies see the
//! same identity the coordinator caches.

use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Url};
use zeroize::Zeroizing;

use crate::config::{ConfigError, Settings};

const API_KEY_HEADER: &str = "apikey";

/// Failure to build a client from settings.
#[derive(Debug, thiserror::Error)]
pub enum ClientSetupError {
    /// Settings are incomplete or malformed.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The HTTP client could not be constructed.
    #[error("could not build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Connection details plus the access token of the signed-in user.
pub struct SupabaseClient {
    http: Client,
    base: Url,
    api_key: String,
    access_token: RwLock<Option<Zeroizing<String>>>,
}

impl SupabaseClient {
    /// Build a client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base: with_trailing_slash(endpoint),
            api_key: api_key.into(),
            access_token: RwLock::new(None),
        })
    }

    /// Build a client from loaded settings.
    ///
    /// # Errors
    ///
    /// Returns [`ClientSetupError::Config`] when the endpoint or key is
    /// missing, or [`ClientSetupError::Http`] when reqwest fails to start.
    pub fn from_settings(settings: &Settings) -> Result<Self, ClientSetupError> {
        let endpoint = settings.endpoint()?;
        let api_key = settings.api_key()?;
        Ok(Self::new(endpoint, api_key, settings.request_timeout())?)
    }

    /// Resolve `path` (no leading slash) against the project URL.
    pub(super) fn url(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base.join(path)
    }

    /// Start a request carrying the API key and, when signed in, the user's
    /// bearer token.
    pub(super) fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let bearer = match self.access_token() {
            Some(token) => format!("Bearer {}", token.as_str()),
            None => format!("Bearer {}", self.api_key),
        };
        let mut builder = self
            .http
            .request(method, url)
            .header(API_KEY_HEADER, self.api_key.as_str());
        if let Ok(mut value) = HeaderValue::from_str(&bearer) {
            value.set_sensitive(true);
            builder = builder.header(AUTHORIZATION, value);
        }
        builder
    }

    pub(super) fn access_token(&self) -> Option<Zeroizing<String>> {
        self.access_token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(super) fn set_access_token(&self, token: Option<String>) {
        *self
            .access_token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = token.map(Zeroizing::new);
    }

    pub(super) fn is_signed_in(&self) -> bool {
        self.access_token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
