//! Asynchronous volume client implementation.

use crate::models::{Volume, VolumeGroup};
use crate::Result;
use tutum_core::uuid::{VolumeGroupUuid, VolumeUuid};
use tutum_core::{CallDescriptor, TutumClient};

/// Asynchronous client for Tutum volumes and volume groups.
#[derive(Debug, Clone)]
pub struct VolumeClient {
    inner: TutumClient,
}

impl VolumeClient {
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

    /// List every volume group, following pagination.
    pub async fn list_volume_groups(&self) -> Result<Vec<VolumeGroup>> {
        self.inner
            .collect_all(&CallDescriptor::get(VolumeGroupUuid::COLLECTION))
            .await
    }

    /// Fetch a volume group by UUID.
    pub async fn get_volume_group(&self, uuid: VolumeGroupUuid) -> Result<VolumeGroup> {
        self.inner
            .execute_json(&CallDescriptor::get(uuid.path()))
            .await
    }

    /// Fetch a volume group from its `resource_uri`.
    pub async fn get_volume_group_by_uri(&self, resource_uri: &str) -> Result<VolumeGroup> {
        let path = self.inner.link_path(resource_uri)?;
        self.inner.execute_json(&CallDescriptor::get(path)).await
    }

    /// List every volume, following pagination.
    pub async fn list_volumes(&self) -> Result<Vec<Volume>> {
        self.inner
            .collect_all(&CallDescriptor::get(VolumeUuid::COLLECTION))
            .await
    }

    /// Fetch a volume by UUID.
    pub async fn get_volume(&self, uuid: VolumeUuid) -> Result<Volume> {
        self.inner
            .execute_json(&CallDescriptor::get(uuid.path()))
            .await
    }

    /// Fetch the volumes belonging to a group, in group order.
    pub async fn volumes_of(&self, group: &VolumeGroup) -> Result<Vec<Volume>> {
        let mut volumes = Vec::with_capacity(group.volumes.len());
        for uri in &group.volumes {
            let path = self.inner.link_path(uri)?;
            volumes.push(self.inner.execute_json(&CallDescriptor::get(path)).await?);
        }
        Ok(volumes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tutum_core::{Credentials, Error};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const GROUP: &str = "1863e34d-6a7d-4945-aefc-8f27a4ab1a9e";
    const VOLUME: &str = "b5c3a7e2-0d4f-4c0e-9f1b-2a3d4e5f6a7b";

    fn test_client(server: &MockServer) -> VolumeClient {
        let inner = TutumClient::builder(format!("{}/api/v1/", server.uri()))
            .with_credentials(Credentials::from_parts("alice", "secret").unwrap())
            .build()
            .unwrap();
        VolumeClient::new(inner)
    }

    #[tokio::test]
    async fn list_volume_groups_concatenates_pages() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/volumegroup/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "meta": {"next": "/api/v1/volumegroup/p2/", "total_count": 3},
                "objects": [
                    {"uuid": GROUP, "name": "a"},
                    {"uuid": "2c1d9f0e-5b7a-4e3c-8d2f-6a1b0c9e8d7f", "name": "b"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/volumegroup/p2/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "meta": {"next": null, "total_count": 3},
                "objects": [{"uuid": "7e6d5c4b-3a29-4180-9f7e-6d5c4b3a2918", "name": "c"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let groups = test_client(&server).list_volume_groups().await.unwrap();
        let names: Vec<_> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn list_volume_groups_no_partial_result() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/volumegroup/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "meta": {"next": "/api/v1/volumegroup/p2/"},
                "objects": [{"uuid": GROUP, "name": "a"}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/volumegroup/p2/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = test_client(&server).list_volume_groups().await.unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[tokio::test]
    async fn get_volume_group_by_uuid_and_uri() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/api/v1/volumegroup/{GROUP}/").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "uuid": GROUP,
                "name": "redis-data",
                "resource_uri": format!("/api/v1/volumegroup/{GROUP}/"),
                "volume": [format!("/api/v1/volume/{VOLUME}/")]
            })))
            .expect(2)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let by_uuid = client
            .get_volume_group(VolumeGroupUuid::parse_str(GROUP).unwrap())
            .await
            .unwrap();
        let by_uri = client
            .get_volume_group_by_uri(&by_uuid.resource_uri)
            .await
            .unwrap();
        assert_eq!(by_uuid, by_uri);
    }

    #[tokio::test]
    async fn get_volume_group_by_uri_under_prefixed_base() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/proxy/api/v1/volumegroup/{GROUP}/").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "uuid": GROUP,
                "name": "redis-data"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let inner = TutumClient::builder(format!("{}/proxy/api/v1/", server.uri()))
            .with_credentials(Credentials::from_parts("alice", "secret").unwrap())
            .build()
            .unwrap();
        let group = VolumeClient::new(inner)
            .get_volume_group_by_uri(&format!("/api/v1/volumegroup/{GROUP}/"))
            .await
            .unwrap();
        assert_eq!(group.name, "redis-data");
    }

    #[tokio::test]
    async fn volumes_of_group() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/api/v1/volume/{VOLUME}/").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "uuid": VOLUME,
                "state": "Created",
                "container_path": "/data",
                "volume_group": format!("/api/v1/volumegroup/{GROUP}/")
            })))
            .mount(&server)
            .await;

        let group: VolumeGroup = serde_json::from_value(json!({
            "uuid": GROUP,
            "volume": [format!("/api/v1/volume/{VOLUME}/")]
        }))
        .unwrap();

        let volumes = test_client(&server).volumes_of(&group).await.unwrap();
        assert_eq!(volumes.len(), 1);
        assert_eq!(volumes[0].container_path.as_deref(), Some("/data"));
    }

    #[tokio::test]
    async fn get_volume_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = test_client(&server)
            .get_volume(VolumeUuid::parse_str(VOLUME).unwrap())
            .await
            .unwrap_err();
        assert_eq!(err, Error::UnexpectedStatus { code: 404 });
    }
}
