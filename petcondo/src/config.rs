//! Client configuration loaded via OrthoConfig.
//!
//! Values come from `PETCONDO_*` environment variables or configuration
//! files discovered by OrthoConfig. Missing provider settings are reported as
//! a [`ConfigError`] instead of aborting, so the CLI can show a readable
//! message.

use std::ffi::OsString;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::domain::DEFAULT_MAX_DIMENSION;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration problems detected before any request is made.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Configuration sources could not be read or parsed.
    #[error("could not load configuration: {message}")]
    Load {
        /// Loader diagnostic.
        message: String,
    },
    /// No provider endpoint was configured.
    #[error("PETCONDO_SUPABASE_URL is not set")]
    MissingEndpoint,
    /// The provider endpoint is not a valid absolute URL.
    #[error("PETCONDO_SUPABASE_URL is not a valid URL: {url}")]
    InvalidEndpoint {
        /// Rejected value.
        url: String,
    },
    /// No public API key was configured.
    #[error("PETCONDO_SUPABASE_ANON_KEY is not set")]
    MissingApiKey,
}

/// Settings for the hosted backend and photo preprocessing.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PETCONDO")]
pub struct Settings {
    /// Base URL of the hosted project, e.g. `https://xyz.supabase.co`.
    pub supabase_url: Option<String>,
    /// Public anonymous API key sent with every request.
    pub supabase_anon_key: Option<String>,
    /// Per-request timeout in seconds.
    #[ortho_config(default = 30)]
    pub request_timeout_secs: u64,
    /// Longest edge, in pixels, of preprocessed pet photos.
    #[ortho_config(default = 800)]
    pub max_image_dimension: u32,
}

impl Settings {
    /// Load settings from the environment and configuration files only.
    ///
    /// Command-line flags belong to the CLI parser, so the loader sees just the
    /// program name.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_iter([OsString::from("petcondo")]).map_err(|err| ConfigError::Load {
            message: err.to_string(),
        })
    }

    /// Validated provider base URL.
    pub fn endpoint(&self) -> Result<Url, ConfigError> {
        let raw = self
            .supabase_url
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::MissingEndpoint)?;
        let url = Url::parse(raw).map_err(|_| ConfigError::InvalidEndpoint {
            url: raw.to_owned(),
        })?;
        if url.cannot_be_a_base() {
            return Err(ConfigError::InvalidEndpoint {
                url: raw.to_owned(),
            });
        }
        Ok(url)
    }

    /// Public API key.
    pub fn api_key(&self) -> Result<&str, ConfigError> {
        self.supabase_anon_key
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::MissingApiKey)
    }

    /// Per-request timeout, falling back to the default when zero.
    pub fn request_timeout(&self) -> Duration {
        let secs = match self.request_timeout_secs {
            0 => DEFAULT_REQUEST_TIMEOUT_SECS,
            secs => secs,
        };
        Duration::from_secs(secs)
    }

    /// Photo bound, falling back to the default when zero.
    pub fn max_image_dimension(&self) -> u32 {
        match self.max_image_dimension {
            0 => DEFAULT_MAX_DIMENSION,
            value => value,
        }
    }
}
