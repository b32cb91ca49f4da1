//! Stack client and data models for the Tutum API.
//!
//! Provides typed structures and an asynchronous client for creating, inspecting and
//! driving Tutum stacks (groups of services deployed together).

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::StackClient;
pub use models::{Service, Stack, StackSummary};

/// Convenient result alias that reuses the shared Tutum error type.
pub type Result<T> = tutum_core::Result<T>;
