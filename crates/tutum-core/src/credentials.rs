//! Credential resolution for the Tutum API.
//!
//! Credentials are looked up in a fixed order, first hit wins:
//!
//! 1. whatever the [`CredentialStore`] already holds,
//! 2. the `[auth]` table of `~/.tutum`,
//! 3. the `TUTUM_USER` / `TUTUM_APIKEY` environment variables.
//!
//! A `~/.tutum` that exists but does not parse stops resolution with
//! [`Error::ConfigMalformed`]; the environment is not consulted in that case.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Name of the per-user configuration file, relative to the home directory.
pub const CONFIG_FILE_NAME: &str = ".tutum";

/// Environment variable holding the Tutum user name.
pub const USER_ENV: &str = "TUTUM_USER";

/// Environment variable holding the Tutum API key.
pub const API_KEY_ENV: &str = "TUTUM_APIKEY";

/// Scheme used in the `Authorization` header.
pub const AUTH_SCHEME: &str = "ApiKey";

/// A Tutum user name paired with its API key.
///
/// Both parts are guaranteed non-empty. The key is kept in a [`SecretString`] so it
/// never shows up in `Debug` output or logs.
#[derive(Debug)]
pub struct Credentials {
    user: String,
    api_key: SecretString,
}

impl Credentials {
    /// Builds credentials, returning `None` when either part is empty.
    #[must_use]
    pub fn from_parts(user: impl Into<String>, api_key: impl Into<String>) -> Option<Self> {
        let user = user.into();
        let api_key = api_key.into();
        if user.is_empty() || api_key.is_empty() {
            return None;
        }
        Some(Self {
            user,
            api_key: SecretString::from(api_key),
        })
    }

    /// Returns the user name.
    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Returns the API key.
    #[must_use]
    pub const fn api_key(&self) -> &SecretString {
        &self.api_key
    }

    /// Renders the `Authorization` header value: `ApiKey <user>:<apikey>`.
    #[must_use]
    pub fn authorization_header(&self) -> String {
        format!(
            "{AUTH_SCHEME} {}:{}",
            self.user,
            self.api_key.expose_secret()
        )
    }
}

/// Snapshot of the places credentials may come from.
///
/// [`CredentialSources::from_process`] reads the real home directory and environment;
/// the builder methods let callers point resolution somewhere else.
#[derive(Debug, Default)]
pub struct CredentialSources {
    config_path: Option<PathBuf>,
    env_user: Option<String>,
    env_api_key: Option<SecretString>,
}

impl CredentialSources {
    /// Creates an empty set of sources. Resolving against it always fails.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Captures `~/.tutum` and the `TUTUM_USER` / `TUTUM_APIKEY` variables of the
    /// current process.
    #[must_use]
    pub fn from_process() -> Self {
        Self {
            config_path: dirs::home_dir().map(|home| home.join(CONFIG_FILE_NAME)),
            env_user: std::env::var(USER_ENV).ok(),
            env_api_key: std::env::var(API_KEY_ENV).ok().map(SecretString::from),
        }
    }

    /// Uses the given file instead of `~/.tutum`.
    #[must_use]
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Uses the given values in place of the environment variables.
    #[must_use]
    pub fn with_env(mut self, user: impl Into<String>, api_key: impl Into<String>) -> Self {
        self.env_user = Some(user.into());
        self.env_api_key = Some(SecretString::from(api_key.into()));
        self
    }

    /// Returns the configuration file path that will be consulted, if any.
    #[must_use]
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Resolves credentials from these sources without any caching.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigMalformed`] when the configuration file exists but cannot
    /// be read or parsed, and [`Error::CredentialsNotFound`] when no source yields both a
    /// user and an API key.
    pub fn resolve(&self) -> Result<Credentials> {
        if let Some(path) = &self.config_path {
            if let Some(credentials) = load_config_file(path)? {
                info!(
                    user = credentials.user(),
                    path = %path.display(),
                    "Loading credentials from config file"
                );
                return Ok(credentials);
            }
        }

        if let (Some(user), Some(api_key)) = (&self.env_user, &self.env_api_key) {
            if let Some(credentials) =
                Credentials::from_parts(user.as_str(), api_key.expose_secret())
            {
                info!(user = credentials.user(), "Loading credentials from environment");
                return Ok(credentials);
            }
        }

        debug!("Couldn't automatically load credentials");
        Err(Error::CredentialsNotFound)
    }
}

/// Every top-level entry of `~/.tutum` must be a table; a stray scalar is malformed.
type ConfigFile = HashMap<String, AuthSection>;

#[derive(Debug, Default, Deserialize)]
struct AuthSection {
    #[serde(rename = "User", alias = "user", default)]
    user: String,
    #[serde(rename = "Apikey", alias = "apikey", alias = "ApiKey", default)]
    apikey: String,
}

/// `Ok(None)` when the file is absent or lacks a complete `[auth]` table.
fn load_config_file(path: &Path) -> Result<Option<Credentials>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "No Tutum configuration file");
            return Ok(None);
        }
        Err(err) => return Err(malformed(path, &err)),
    };

    let mut config: ConfigFile =
        toml::from_str(&content).map_err(|err| malformed(path, &err))?;
    let auth = config.remove("auth").unwrap_or_default();
    Ok(Credentials::from_parts(auth.user, auth.apikey))
}

fn malformed(path: &Path, err: &dyn std::fmt::Display) -> Error {
    Error::ConfigMalformed {
        path: path.to_path_buf(),
        message: err.to_string().trim_end().to_string(),
    }
}

/// Shared, resolve-once holder for [`Credentials`].
///
/// Clones share the same slot. Resolution runs under a single lock, so concurrent first
/// callers trigger exactly one lookup and all observe its outcome; once set, the
/// credentials never change.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    slot: Arc<Mutex<Option<Arc<Credentials>>>>,
}

impl CredentialStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding `credentials`.
    #[must_use]
    pub fn with_credentials(credentials: Credentials) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(Arc::new(credentials)))),
        }
    }

    /// Returns the cached credentials, if resolved.
    #[must_use]
    pub fn current(&self) -> Option<Arc<Credentials>> {
        self.lock().clone()
    }

    /// Returns true when credentials have been resolved.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.lock().is_some()
    }

    /// Returns the cached credentials, resolving them from `sources` on first use.
    ///
    /// # Errors
    ///
    /// Propagates [`CredentialSources::resolve`] failures; the store stays empty in that
    /// case so a later call may try again.
    pub fn resolve(&self, sources: &CredentialSources) -> Result<Arc<Credentials>> {
        let mut slot = self.lock();
        if let Some(credentials) = slot.as_ref() {
            debug!(user = credentials.user(), "Credentials already loaded");
            return Ok(Arc::clone(credentials));
        }

        let credentials = Arc::new(sources.resolve()?);
        *slot = Some(Arc::clone(&credentials));
        Ok(credentials)
    }

    fn lock(&self) -> MutexGuard<'_, Option<Arc<Credentials>>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
