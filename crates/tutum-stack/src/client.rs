//! Asynchronous stack client implementation.

use crate::models::{Stack, StackSummary};
use crate::Result;
use tracing::info;
use tutum_core::uuid::StackUuid;
use tutum_core::{CallDescriptor, Error, TutumClient};

/// Asynchronous client for Tutum stacks.
///
/// Request bodies for create and update are forwarded exactly as given; the API is the
/// one validating them.
#[derive(Debug, Clone)]
pub struct StackClient {
    inner: TutumClient,
}

impl StackClient {
    /// Wrap an existing [`TutumClient`].
    #[must_use]
    pub const fn new(inner: TutumClient) -> Self {
        Self { inner }
    }

    /// Client configured from `TUTUM_BASE_URL`, `~/.tutum` and the environment.
    ///
    /// # Errors
    ///
    /// See [`TutumClient::from_env`].
    pub fn from_env() -> Result<Self> {
        TutumClient::from_env().map(Self::new)
    }

    /// Return the underlying API client.
    #[must_use]
    pub const fn inner(&self) -> &TutumClient {
        &self.inner
    }

    /// List every stack, following pagination.
    pub async fn list_stacks(&self) -> Result<Vec<StackSummary>> {
        self.inner
            .collect_all(&CallDescriptor::get(StackUuid::COLLECTION))
            .await
    }

    /// Fetch a single stack by UUID.
    pub async fn get_stack(&self, uuid: StackUuid) -> Result<Stack> {
        self.inner
            .execute_json(&CallDescriptor::get(uuid.path()))
            .await
    }

    /// Fetch a stack from its `resource_uri` (e.g. `/api/v1/stack/<uuid>/`).
    pub async fn get_stack_by_uri(&self, resource_uri: &str) -> Result<Stack> {
        let path = self.inner.link_path(resource_uri)?;
        self.inner.execute_json(&CallDescriptor::get(path)).await
    }

    /// Export the stack definition (stackfile) as text.
    pub async fn export_stack(&self, uuid: StackUuid) -> Result<String> {
        let path = uuid.subpath("export");
        let body = self.inner.execute(&CallDescriptor::get(path.as_str())).await?;
        String::from_utf8(body)
            .map_err(|err| Error::Decode(format!("Stack export for `{path}` is not UTF-8: {err}")))
    }

    /// Create a stack from a JSON definition.
    pub async fn create_stack(&self, definition: impl Into<Vec<u8>>) -> Result<Stack> {
        let stack: Stack = self
            .inner
            .execute_json(&CallDescriptor::post(StackUuid::COLLECTION).with_body(definition))
            .await?;
        info!(uuid = %stack.uuid, name = %stack.name, "Created stack");
        Ok(stack)
    }

    /// Update a stack with a partial JSON definition.
    pub async fn update_stack(&self, uuid: StackUuid, definition: impl Into<Vec<u8>>) -> Result<()> {
        let call = CallDescriptor::patch(uuid.path()).with_body(definition);
        self.inner.execute(&call).await.map(drop)
    }

    /// Start every service of the stack.
    pub async fn start_stack(&self, uuid: StackUuid) -> Result<()> {
        self.action(uuid, "start").await
    }

    /// Stop every service of the stack.
    pub async fn stop_stack(&self, uuid: StackUuid) -> Result<()> {
        self.action(uuid, "stop").await
    }

    /// Redeploy every service of the stack.
    pub async fn redeploy_stack(&self, uuid: StackUuid) -> Result<()> {
        self.action(uuid, "redeploy").await
    }

    /// Terminate the stack and its services.
    pub async fn terminate_stack(&self, uuid: StackUuid) -> Result<()> {
        self.inner
            .execute(&CallDescriptor::delete(uuid.path()))
            .await?;
        info!(%uuid, "Terminated stack");
        Ok(())
    }

    async fn action(&self, uuid: StackUuid, action: &str) -> Result<()> {
        self.inner
            .execute(&CallDescriptor::post(uuid.subpath(action)))
            .await?;
        info!(%uuid, action, "Stack action accepted");
        Ok(())
    }
}
