//! Stack and service models as returned by the Tutum API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tutum_core::uuid::{ServiceUuid, StackUuid};

/// Parses the RFC 2822 timestamps Tutum uses (`Thu, 25 Sep 2014 13:14:44 +0000`).
#[must_use]
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value)
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}

/// Stack as listed by `GET stack/`; services are referenced by resource URI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StackSummary {
    /// Stack UUID.
    pub uuid: StackUuid,
    /// Stack name.
    #[serde(default)]
    pub name: String,
    /// API path of the stack.
    #[serde(default)]
    pub resource_uri: String,
    /// Lifecycle state (`Not Running`, `Running`, `Terminated`, ...).
    #[serde(default)]
    pub state: String,
    /// Whether the running services match the stack definition.
    #[serde(default)]
    pub synchronized: bool,
    /// Resource URIs of the stack's services.
    #[serde(default)]
    pub services: Vec<String>,
    /// When the stack was deployed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployed_datetime: Option<String>,
    /// When the stack was terminated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destroyed_datetime: Option<String>,
}

impl StackSummary {
    /// Parsed deployment time.
    #[must_use]
    pub fn deployed_at(&self) -> Option<DateTime<Utc>> {
        self.deployed_datetime.as_deref().and_then(parse_timestamp)
    }

    /// Parsed termination time.
    #[must_use]
    pub fn destroyed_at(&self) -> Option<DateTime<Utc>> {
        self.destroyed_datetime.as_deref().and_then(parse_timestamp)
    }
}

/// Stack as returned by `GET stack/<uuid>/`, with its services embedded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Stack {
    /// Stack UUID.
    pub uuid: StackUuid,
    /// Stack name.
    #[serde(default)]
    pub name: String,
    /// API path of the stack.
    #[serde(default)]
    pub resource_uri: String,
    /// Lifecycle state.
    #[serde(default)]
    pub state: String,
    /// Whether the running services match the stack definition.
    #[serde(default)]
    pub synchronized: bool,
    /// Services that make up the stack.
    #[serde(default)]
    pub services: Vec<Service>,
    /// When the stack was deployed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployed_datetime: Option<String>,
    /// When the stack was terminated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destroyed_datetime: Option<String>,
}

impl Stack {
    /// Parsed deployment time.
    #[must_use]
    pub fn deployed_at(&self) -> Option<DateTime<Utc>> {
        self.deployed_datetime.as_deref().and_then(parse_timestamp)
    }

    /// Parsed termination time.
    #[must_use]
    pub fn destroyed_at(&self) -> Option<DateTime<Utc>> {
        self.destroyed_datetime.as_deref().and_then(parse_timestamp)
    }

    /// Looks up a service of this stack by name.
    #[must_use]
    pub fn service(&self, name: &str) -> Option<&Service> {
        self.services.iter().find(|service| service.name == name)
    }
}

/// A service embedded in a [`Stack`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Service {
    /// Service UUID.
    pub uuid: ServiceUuid,
    /// Service name.
    #[serde(default)]
    pub name: String,
    /// API path of the service.
    #[serde(default)]
    pub resource_uri: String,
    /// Image the containers run.
    #[serde(default)]
    pub image_name: String,
    /// Lifecycle state.
    #[serde(default)]
    pub state: String,
    /// Whether the running containers match the service definition.
    #[serde(default)]
    pub synchronized: bool,
    /// Public DNS name of the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_dns: Option<String>,
    /// Resource URI of the owning stack.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    /// Desired container count.
    #[serde(default)]
    pub target_num_containers: u32,
    /// Containers currently running.
    #[serde(default)]
    pub running_num_containers: u32,
    /// Containers currently stopped.
    #[serde(default)]
    pub stopped_num_containers: u32,
    /// Resource URIs of the service's containers.
    #[serde(default)]
    pub containers: Vec<String>,
    /// Restart policy (`OFF`, `ON_FAILURE`, `ALWAYS`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autorestart: Option<String>,
    /// When the service was deployed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployed_datetime: Option<String>,
    /// When the service was last started.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_datetime: Option<String>,
    /// When the service was last stopped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stopped_datetime: Option<String>,
    /// When the service was terminated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destroyed_datetime: Option<String>,
}

impl Service {
    /// Returns true when every desired container is running.
    #[must_use]
    pub const fn is_fully_running(&self) -> bool {
        self.running_num_containers >= self.target_num_containers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    #[test]
    fn parse_timestamp_rfc2822() {
        let parsed = parse_timestamp("Thu, 25 Sep 2014 13:14:44 +0000").unwrap();
        assert_eq!(parsed.year(), 2014);
        assert_eq!(parsed.month(), 9);
        assert_eq!(parsed.hour(), 13);
    }

    #[test]
    fn parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn summary_null_datetimes() {
        let summary: StackSummary = serde_json::from_value(json!({
            "uuid": "09cbcf8d-a727-40d9-b420-c8e18b7fa55b",
            "name": "web",
            "deployed_datetime": null,
            "destroyed_datetime": null
        }))
        .unwrap();

        assert!(summary.deployed_at().is_none());
        assert!(summary.services.is_empty());
        assert!(!summary.synchronized);
    }

    #[test]
    fn service_fully_running() {
        let service: Service = serde_json::from_value(json!({
            "uuid": "5d1b4b0b-4f4e-4b63-9d39-2a0c1e1a5c11",
            "name": "hello",
            "target_num_containers": 2,
            "running_num_containers": 2
        }))
        .unwrap();
        assert!(service.is_fully_running());
    }

    #[test]
    fn missing_uuid_is_an_error() {
        let result = serde_json::from_value::<Stack>(json!({"name": "web"}));
        assert!(result.is_err());
    }
}
