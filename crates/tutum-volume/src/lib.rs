//! Volume client and data models for the Tutum API.
//!
//! Volume groups tie the data volumes of a service's containers together; volumes are
//! the per-node storage behind them.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::VolumeClient;
pub use models::{Volume, VolumeGroup};

/// Convenient result alias that reuses the shared Tutum error type.
pub type Result<T> = tutum_core::Result<T>;
