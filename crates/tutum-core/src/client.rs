//! Authenticated call executor and paginated collector.
//!
//! Every Tutum request goes through [`TutumClient::execute`]: it attaches the
//! `ApiKey` authorization header, sends the request and accepts only `200 OK`.
//! [`TutumClient::collect_all`] walks `meta.next` links on top of it, one page at a time.

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, ClientBuilder, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::config::{base_url_from_env, parse_base_url, ClientConfig};
use crate::credentials::{CredentialSources, CredentialStore, Credentials};
use crate::error::{Error, Result};
use crate::pagination::{request_path, Page};

const JSON: &str = "application/json";

/// One request, before authentication is attached.
///
/// `path` is joined onto the client's base URL: `stack/` lands under the base path,
/// while a root-relative path such as `/other/` replaces it. Links handed out by the API
/// go through [`TutumClient::link_path`] first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallDescriptor {
    method: Method,
    path: String,
    body: Option<Vec<u8>>,
    timeout: Option<Duration>,
}

impl CallDescriptor {
    /// Create a descriptor with no body.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            timeout: None,
        }
    }

    /// `GET` descriptor.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// `POST` descriptor.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// `PATCH` descriptor.
    #[must_use]
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    /// `DELETE` descriptor.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a raw body. It is sent unchanged.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Attach a body serialized as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if `body` cannot be serialized.
    pub fn with_json<B>(self, body: &B) -> Result<Self>
    where
        B: Serialize + ?Sized,
    {
        Ok(self.with_body(serde_json::to_vec(body)?))
    }

    /// Bound the call by `timeout`, overriding the client default.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Same method, body and deadline, aimed at another path.
    #[must_use]
    pub fn at_path(&self, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..self.clone()
        }
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Path relative to the base URL.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Request body, if any.
    #[must_use]
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// Per-call deadline, if any.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

/// Builder for [`TutumClient`].
#[derive(Debug, Clone)]
pub struct TutumClientBuilder {
    base_url: String,
    http_config: ClientConfig,
    credentials: CredentialStore,
}

impl TutumClientBuilder {
    /// Create a builder for the specified base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http_config: ClientConfig::new(),
            credentials: CredentialStore::new(),
        }
    }

    /// Create a builder for `TUTUM_BASE_URL`, or the public endpoint when unset.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(base_url_from_env())
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Default deadline for calls that do not set their own.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http_config = self.http_config.with_timeout(timeout);
        self
    }

    /// Share an existing credential store.
    #[must_use]
    pub fn with_credential_store(mut self, store: CredentialStore) -> Self {
        self.credentials = store;
        self
    }

    /// Use fixed credentials, skipping resolution.
    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = CredentialStore::with_credentials(credentials);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEndpoint`] for an unusable base URL and
    /// [`Error::Transport`] if the HTTP client cannot be initialised.
    pub fn build(self) -> Result<TutumClient> {
        let base_url = parse_base_url(&self.base_url)?;

        let mut builder = ClientBuilder::new().user_agent(self.http_config.user_agent.clone());
        if let Some(connect_timeout) = self.http_config.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }
        let http = builder.build().map_err(|err| {
            Error::Transport(format!("Failed to build Tutum HTTP client: {err}"))
        })?;

        Ok(TutumClient {
            http,
            base_url: Arc::new(base_url),
            timeout: self.http_config.timeout,
            credentials: self.credentials,
        })
    }
}

/// Asynchronous Tutum API client.
///
/// Cheap to clone; clones share the HTTP connection pool and the credential store.
#[derive(Debug, Clone)]
pub struct TutumClient {
    http: Client,
    base_url: Arc<Url>,
    timeout: Option<Duration>,
    credentials: CredentialStore,
}

impl TutumClient {
    /// Construct a client directly from the base URL. Credentials must be resolved
    /// with [`TutumClient::resolve_credentials`] before calls succeed.
    ///
    /// # Errors
    ///
    /// See [`TutumClientBuilder::build`].
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        TutumClientBuilder::new(base_url).build()
    }

    /// Start a builder for the given base URL.
    #[must_use]
    pub fn builder(base_url: impl Into<String>) -> TutumClientBuilder {
        TutumClientBuilder::new(base_url)
    }

    /// Client for `TUTUM_BASE_URL` with credentials resolved from `~/.tutum` or the
    /// environment.
    ///
    /// Missing credentials are not fatal here: the client is returned and every call
    /// fails with [`Error::Unauthenticated`] until credentials are resolved.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigMalformed`] when `~/.tutum` exists but cannot be parsed,
    /// and the errors of [`TutumClientBuilder::build`].
    pub fn from_env() -> Result<Self> {
        let client = TutumClientBuilder::from_env().build()?;
        match client.resolve_credentials(&CredentialSources::from_process()) {
            Ok(_) => {}
            Err(Error::CredentialsNotFound) => {
                warn!("No Tutum credentials found; API calls will fail until they are set");
            }
            Err(err) => return Err(err),
        }
        Ok(client)
    }

    /// Resolve credentials into this client's store. A no-op once resolved.
    ///
    /// # Errors
    ///
    /// See [`CredentialStore::resolve`].
    pub fn resolve_credentials(&self, sources: &CredentialSources) -> Result<Arc<Credentials>> {
        self.credentials.resolve(sources)
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Return the credential store backing this client.
    #[must_use]
    pub const fn credential_store(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Returns true when credentials are available.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_authenticated()
    }

    /// Resolve `path` against the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEndpoint`] when the path does not form a valid URL.
    pub fn url_for(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// Rebase a link handed out by the API (`meta.next`, `resource_uri`) onto this
    /// client's base URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEndpoint`] when the link cannot be parsed.
    pub fn link_path(&self, link: &str) -> Result<String> {
        request_path(link, self.base_url.path())
    }

    /// Send one authenticated request and return the raw body of a `200 OK` response.
    ///
    /// # Errors
    ///
    /// - [`Error::Unauthenticated`] when no credentials are loaded; nothing is sent.
    /// - [`Error::Transport`] / [`Error::Timeout`] when the request fails in flight.
    /// - [`Error::UnexpectedStatus`] for any status other than 200, including other 2xx.
    /// - [`Error::BodyRead`] when the body of a 200 response cannot be read.
    pub async fn execute(&self, call: &CallDescriptor) -> Result<Vec<u8>> {
        let credentials = self.credentials.current().ok_or(Error::Unauthenticated)?;
        let url = self.url_for(call.path())?;

        debug!(method = %call.method(), url = %url, "Sending Tutum request");

        let mut request = self
            .http
            .request(call.method().clone(), url)
            .header(AUTHORIZATION, credentials.authorization_header())
            .header(ACCEPT, JSON);

        if let Some(body) = call.body() {
            request = request.header(CONTENT_TYPE, JSON).body(body.to_vec());
        }

        if let Some(timeout) = call.timeout().or(self.timeout) {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            debug!(status = status.as_u16(), path = call.path(), "Tutum call failed");
            return Err(Error::UnexpectedStatus {
                code: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|err| {
            if err.is_timeout() {
                Error::Timeout(err.to_string())
            } else {
                Error::BodyRead(err.to_string())
            }
        })?;

        Ok(body.to_vec())
    }

    /// [`execute`](Self::execute) followed by JSON decoding.
    ///
    /// # Errors
    ///
    /// The errors of `execute`, plus [`Error::Decode`] when the body does not match `T`.
    pub async fn execute_json<T>(&self, call: &CallDescriptor) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let body = self.execute(call).await?;
        decode_json(call.path(), &body)
    }

    /// Fetch every page of a list endpoint and concatenate the objects in order.
    ///
    /// Page N+1 is requested only after page N is fully decoded. A failure on any page
    /// aborts the walk; no partial list is returned.
    ///
    /// # Errors
    ///
    /// The errors of [`execute_json`](Self::execute_json) for any page, and
    /// [`Error::InvalidEndpoint`] for an unparseable `next` link.
    pub async fn collect_all<T>(&self, call: &CallDescriptor) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let mut page: Page<T> = self.execute_json(call).await?;
        let mut objects = std::mem::take(&mut page.objects);
        let mut pages = 1_usize;

        while let Some(path) = page.next().map(|link| self.link_path(link)).transpose()? {
            debug!(path = %path, pages, "Following next page");
            page = self.execute_json(&call.at_path(path)).await?;
            objects.append(&mut page.objects);
            pages += 1;
        }

        debug!(path = call.path(), pages, total = objects.len(), "Collected list");
        Ok(objects)
    }
}

/// Decode a JSON body, tagging failures with the request path.
///
/// # Errors
///
/// Returns [`Error::Decode`] when `body` does not match `T`.
pub fn decode_json<T>(path: &str, body: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    serde_json::from_slice(body)
        .map_err(|err| Error::Decode(format!("Failed to parse Tutum response for `{path}`: {err}")))
}
