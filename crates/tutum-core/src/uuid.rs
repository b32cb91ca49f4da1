//! Strongly-typed UUID wrappers for Tutum resources.
//!
//! Every Tutum resource is addressed by a UUID under its collection endpoint
//! (`stack/<uuid>/`, `volumegroup/<uuid>/`, ...). One wrapper per resource kind keeps a
//! stack identifier from being sent to the volume endpoints.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{Error, Result};

macro_rules! resource_uuid {
    ($name:ident, $collection:literal, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Collection endpoint, relative to the API base URL.
            pub const COLLECTION: &'static str = concat!($collection, "/");

            /// Parses a UUID from a string.
            ///
            /// # Errors
            ///
            /// Returns [`Error::InvalidUuid`] if the string is not a valid UUID.
            pub fn parse_str(input: &str) -> Result<Self> {
                Uuid::parse_str(input)
                    .map(Self)
                    .map_err(|_| Error::InvalidUuid(input.to_string()))
            }

            /// Detail endpoint of the resource, relative to the API base URL.
            #[must_use]
            pub fn path(self) -> String {
                format!("{}{}/", Self::COLLECTION, self.0)
            }

            /// Endpoint of an action or sub-resource (`stack/<uuid>/start/`).
            #[must_use]
            pub fn subpath(self, segment: &str) -> String {
                format!("{}{segment}/", self.path())
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                Self::parse_str(s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

resource_uuid!(StackUuid, "stack", "Stack UUID");
resource_uuid!(ServiceUuid, "service", "Service UUID");
resource_uuid!(VolumeGroupUuid, "volumegroup", "Volume group UUID");
resource_uuid!(VolumeUuid, "volume", "Volume UUID");
