//! Endpoint and HTTP client configuration.
//!
//! The API base URL defaults to the public Tutum endpoint and can be overridden with
//! `TUTUM_BASE_URL`. [`ClientConfig`] carries the transport knobs; none of them are set
//! by default, so a call only has a deadline when the caller asks for one.

use std::time::Duration;
use url::Url;

use crate::error::{Error, Result};

/// Public Tutum API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://app.tutum.co/api/v1/";

/// Path prefix of the API on the public endpoint. Links returned by the API carry it.
pub const API_PATH_PREFIX: &str = "/api/v1/";

/// Environment variable overriding [`DEFAULT_BASE_URL`].
pub const BASE_URL_ENV: &str = "TUTUM_BASE_URL";

/// Default `User-Agent` sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("tutum-rust/", env!("CARGO_PKG_VERSION"));

/// Returns the base URL from `TUTUM_BASE_URL`, or the default when unset or empty.
#[must_use]
pub fn base_url_from_env() -> String {
    base_url_or_default(std::env::var(BASE_URL_ENV).ok())
}

/// Picks `value` when it is non-empty, [`DEFAULT_BASE_URL`] otherwise.
#[must_use]
pub fn base_url_or_default(value: Option<String>) -> String {
    value
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

/// Parses a base URL and makes sure it ends with `/` so relative paths join under it.
///
/// # Errors
///
/// Returns [`Error::InvalidEndpoint`] when the string is not an absolute http(s) URL.
pub fn parse_base_url(base_url: &str) -> Result<Url> {
    let mut url = Url::parse(base_url)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::InvalidEndpoint(format!(
            "unsupported scheme `{}` in {base_url}",
            url.scheme()
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// HTTP client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Deadline applied to every call that does not carry its own
    pub timeout: Option<Duration>,

    /// Limit on establishing the TCP/TLS connection
    pub connect_timeout: Option<Duration>,

    /// `User-Agent` header value
    pub user_agent: String,
}

impl ClientConfig {
    /// Create a configuration with no deadlines and the default user agent.
    #[must_use]
    pub fn new() -> Self {
        Self {
            timeout: None,
            connect_timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Set the per-call deadline.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connection timeout.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}
