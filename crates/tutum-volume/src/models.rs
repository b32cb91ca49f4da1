//! Volume models as returned by the Tutum API.

use serde::{Deserialize, Serialize};
use tutum_core::uuid::{VolumeGroupUuid, VolumeUuid};

/// A volume group: the shared volumes of one service path across its containers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VolumeGroup {
    /// Volume group UUID.
    pub uuid: VolumeGroupUuid,
    /// Volume group name.
    #[serde(default)]
    pub name: String,
    /// API path of the volume group.
    #[serde(default)]
    pub resource_uri: String,
    /// Lifecycle state.
    #[serde(default)]
    pub state: String,
    /// Resource URIs of the services mounting the group.
    #[serde(default)]
    pub services: Vec<String>,
    /// Resource URIs of the member volumes.
    #[serde(default, alias = "volume")]
    pub volumes: Vec<String>,
}

/// A single volume living on one node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Volume {
    /// Volume UUID.
    pub uuid: VolumeUuid,
    /// API path of the volume.
    #[serde(default)]
    pub resource_uri: String,
    /// Lifecycle state.
    #[serde(default)]
    pub state: String,
    /// Resource URI of the node hosting the volume.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<String>,
    /// Path the volume is mounted at inside containers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_path: Option<String>,
    /// Resource URI of the owning volume group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_group: Option<String>,
    /// Resource URIs of the containers using the volume.
    #[serde(default)]
    pub containers: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn volume_group_accepts_singular_volume_key() {
        let group: VolumeGroup = serde_json::from_value(json!({
            "uuid": "1863e34d-6a7d-4945-aefc-8f27a4ab1a9e",
            "name": "redis-data",
            "volume": ["/api/v1/volume/a/", "/api/v1/volume/b/"]
        }))
        .unwrap();
        assert_eq!(group.volumes.len(), 2);
        assert!(group.services.is_empty());
    }

    #[test]
    fn volume_optional_fields_default() {
        let volume: Volume = serde_json::from_value(json!({
            "uuid": "b5c3a7e2-0d4f-4c0e-9f1b-2a3d4e5f6a7b"
        }))
        .unwrap();
        assert!(volume.node.is_none());
        assert!(volume.containers.is_empty());
        assert_eq!(volume.state, "");
    }
}
