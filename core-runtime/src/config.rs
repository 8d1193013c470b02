//! # Core Configuration Module
//!
//! Provides configuration management for the Playo server.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct an [`AppConfig`]
//! holding every deployment setting: the database URL, media store credentials,
//! the auth provider endpoint, the bind address and the request size ceiling.
//! It enforces fail-fast validation so the server refuses to start with a
//! half-configured media store.
//!
//! ## Environment
//!
//! | Variable                   | Required | Default           |
//! |----------------------------|----------|-------------------|
//! | `DATABASE_URL`             | yes      |                   |
//! | `CLOUDINARY_CLOUD_NAME`    | yes      |                   |
//! | `CLOUDINARY_API_KEY`       | yes      |                   |
//! | `CLOUDINARY_API_SECRET`    | yes      |                   |
//! | `CLOUDINARY_UPLOAD_FOLDER` | no       | `music_app/songs` |
//! | `AUTH_PROVIDER_URL`        | reported |                   |
//! | `AUTH_PROVIDER_ANON_KEY`   | reported |                   |
//! | `BIND_ADDRESS`             | no       | `127.0.0.1:3000`  |
//! | `MAX_REQUEST_BYTES`        | no       | 100 MiB           |
//!
//! The auth provider variables are part of the startup environment check but no
//! request handler reads them.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::AppConfig;
//!
//! let config = AppConfig::builder()
//!     .database_url("sqlite:playo.db")
//!     .media_store_credentials("demo", "key", "secret")
//!     .build()?;
//! ```

use crate::error::{Error, Result};
use std::fmt;
use std::net::SocketAddr;

/// Default folder uploads are filed under in the media store.
pub const DEFAULT_UPLOAD_FOLDER: &str = "music_app/songs";

/// Default listen address for the HTTP server.
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:3000";

/// Default transport ceiling for request bodies.
pub const DEFAULT_MAX_REQUEST_BYTES: usize = 100 * 1024 * 1024;

/// Variables reported by the startup environment check.
pub const REQUIRED_ENV_VARS: [&str; 6] = [
    "DATABASE_URL",
    "AUTH_PROVIDER_URL",
    "AUTH_PROVIDER_ANON_KEY",
    "CLOUDINARY_CLOUD_NAME",
    "CLOUDINARY_API_KEY",
    "CLOUDINARY_API_SECRET",
];

/// List the required variables that are unset or empty.
///
/// The result keeps the order of [`REQUIRED_ENV_VARS`].
pub fn missing_env_vars<F>(lookup: F) -> Vec<&'static str>
where
    F: Fn(&str) -> Option<String>,
{
    REQUIRED_ENV_VARS
        .iter()
        .copied()
        .filter(|name| lookup(name).map_or(true, |v| v.trim().is_empty()))
        .collect()
}

/// Credentials and placement for the external media store.
#[derive(Clone, PartialEq, Eq)]
pub struct MediaStoreConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    /// Folder new uploads are placed in
    pub upload_folder: String,
}

impl MediaStoreConfig {
    pub fn new(
        cloud_name: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            cloud_name: cloud_name.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            upload_folder: DEFAULT_UPLOAD_FOLDER.to_string(),
        }
    }

    pub fn with_upload_folder(mut self, folder: impl Into<String>) -> Self {
        self.upload_folder = folder.into();
        self
    }

    /// Validate that every credential is present.
    pub fn validate(&self) -> Result<()> {
        if self.cloud_name.trim().is_empty() {
            return Err(Error::Config(
                "Media store cloud name is required. Set CLOUDINARY_CLOUD_NAME.".to_string(),
            ));
        }
        if self.api_key.trim().is_empty() {
            return Err(Error::Config(
                "Media store API key is required. Set CLOUDINARY_API_KEY.".to_string(),
            ));
        }
        if self.api_secret.trim().is_empty() {
            return Err(Error::Config(
                "Media store API secret is required. Set CLOUDINARY_API_SECRET.".to_string(),
            ));
        }
        if self.upload_folder.trim().is_empty() {
            return Err(Error::Config(
                "Media store upload folder cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for MediaStoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaStoreConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .field("upload_folder", &self.upload_folder)
            .finish()
    }
}

/// Hosted auth/database provider settings.
///
/// Declared so the deployment surface is complete. Nothing in the request
/// path consults it.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AuthProviderConfig {
    pub url: Option<String>,
    pub anon_key: Option<String>,
}

impl fmt::Debug for AuthProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthProviderConfig")
            .field("url", &self.url)
            .field("anon_key", &self.anon_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Server configuration.
///
/// Use [`AppConfig::builder`], [`AppConfig::from_env`] or
/// [`AppConfig::from_lookup`] to construct instances.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SQLite connection URL, e.g. `sqlite:playo.db`
    pub database_url: String,

    /// Media store credentials
    pub media_store: MediaStoreConfig,

    /// Auth provider settings (declared, unused)
    pub auth_provider: AuthProviderConfig,

    /// Address the HTTP server listens on
    pub bind_address: SocketAddr,

    /// Upper bound on request body size, enforced at the transport
    pub max_request_bytes: usize,
}

impl AppConfig {
    /// Creates a new builder for constructing an [`AppConfig`].
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self> {
        // A missing .env file is normal in production
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut builder = AppConfig::builder()
            .media_store_credentials(
                non_empty("CLOUDINARY_CLOUD_NAME").unwrap_or_default(),
                non_empty("CLOUDINARY_API_KEY").unwrap_or_default(),
                non_empty("CLOUDINARY_API_SECRET").unwrap_or_default(),
            )
            .auth_provider(AuthProviderConfig {
                url: non_empty("AUTH_PROVIDER_URL"),
                anon_key: non_empty("AUTH_PROVIDER_ANON_KEY"),
            });

        if let Some(url) = non_empty("DATABASE_URL") {
            builder = builder.database_url(url);
        }
        if let Some(folder) = non_empty("CLOUDINARY_UPLOAD_FOLDER") {
            builder = builder.upload_folder(folder);
        }
        if let Some(addr) = non_empty("BIND_ADDRESS") {
            let addr = addr.trim().parse::<SocketAddr>().map_err(|e| {
                Error::Config(format!("Invalid BIND_ADDRESS '{}': {}", addr, e))
            })?;
            builder = builder.bind_address(addr);
        }
        if let Some(limit) = non_empty("MAX_REQUEST_BYTES") {
            let limit = limit.trim().parse::<usize>().map_err(|e| {
                Error::Config(format!("Invalid MAX_REQUEST_BYTES '{}': {}", limit, e))
            })?;
            builder = builder.max_request_bytes(limit);
        }

        builder.build()
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.database_url.trim().is_empty() {
            return Err(Error::Config("Database URL cannot be empty".to_string()));
        }

        self.media_store.validate()?;

        if self.max_request_bytes == 0 {
            return Err(Error::Config(
                "Maximum request size must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for [`AppConfig`].
#[derive(Default)]
pub struct AppConfigBuilder {
    database_url: Option<String>,
    media_store: Option<MediaStoreConfig>,
    upload_folder: Option<String>,
    auth_provider: AuthProviderConfig,
    bind_address: Option<SocketAddr>,
    max_request_bytes: Option<usize>,
}

impl AppConfigBuilder {
    /// Sets the database connection URL (required).
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    /// Sets the media store credentials (required).
    pub fn media_store_credentials(
        mut self,
        cloud_name: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        self.media_store = Some(MediaStoreConfig::new(cloud_name, api_key, api_secret));
        self
    }

    /// Overrides the upload folder.
    pub fn upload_folder(mut self, folder: impl Into<String>) -> Self {
        self.upload_folder = Some(folder.into());
        self
    }

    pub fn auth_provider(mut self, config: AuthProviderConfig) -> Self {
        self.auth_provider = config;
        self
    }

    /// Sets the listen address. Defaults to `127.0.0.1:3000`.
    pub fn bind_address(mut self, addr: SocketAddr) -> Self {
        self.bind_address = Some(addr);
        self
    }

    /// Sets the transport request size ceiling. Defaults to 100 MiB.
    pub fn max_request_bytes(mut self, bytes: usize) -> Self {
        self.max_request_bytes = Some(bytes);
        self
    }

    /// Builds the configuration, validating that all required settings are present.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` when the database URL or a media store
    /// credential is missing, or when a numeric setting is out of range.
    pub fn build(self) -> Result<AppConfig> {
        let database_url = self.database_url.ok_or_else(|| {
            Error::Config("Database URL is required. Set DATABASE_URL.".to_string())
        })?;

        let mut media_store = self.media_store.ok_or_else(|| {
            Error::Config(
                "Media store credentials are required. Set CLOUDINARY_CLOUD_NAME, \
                 CLOUDINARY_API_KEY and CLOUDINARY_API_SECRET."
                    .to_string(),
            )
        })?;
        if let Some(folder) = self.upload_folder {
            media_store.upload_folder = folder;
        }

        let bind_address = match self.bind_address {
            Some(addr) => addr,
            None => DEFAULT_BIND_ADDRESS.parse().map_err(|e| {
                Error::Internal(format!("Invalid default bind address: {}", e))
            })?,
        };

        let config = AppConfig {
            database_url,
            media_store,
            auth_provider: self.auth_provider,
            bind_address,
            max_request_bytes: self.max_request_bytes.unwrap_or(DEFAULT_MAX_REQUEST_BYTES),
        };

        config.validate()?;
        Ok(config)
    }
}
