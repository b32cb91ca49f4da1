//! # tutum-core
//!
//! Core types and utilities for working with the Tutum container platform API.
//!
//! This crate resolves operator credentials, performs authenticated HTTP calls and
//! follows paginated list endpoints. Resource crates (`tutum-stack`, `tutum-volume`)
//! build on the two primitives exposed by [`client::TutumClient`]:
//! [`execute`](client::TutumClient::execute) and
//! [`collect_all`](client::TutumClient::collect_all).
//!
//! ## Modules
//!
//! - [`error`] - Error taxonomy shared by every crate in the workspace
//! - [`uuid`] - Strongly-typed UUID wrappers for Tutum resources
//! - [`config`] - Endpoint and HTTP client configuration
//! - [`credentials`] - Credential resolution and the credential store
//! - [`client`] - The authenticated call executor and paginated collector
//! - [`pagination`] - List envelope types and next-link handling

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod pagination;
pub mod uuid;

// Re-export commonly used types
pub use client::{CallDescriptor, TutumClient, TutumClientBuilder};
pub use credentials::{CredentialSources, CredentialStore, Credentials};
pub use error::{Error, Result};
pub use pagination::{Page, PageMeta};
