//! Core data types for relbundle.
//!
//! Defines the release coordinate, the `bundle.toml` manifest, secret
//! `.release.env` loading, and the immutable [`config::ReleaseConfig`] that
//! every pipeline stage receives.
//!
//! This crate is intentionally free of async code and network I/O.

/// Default publishing endpoint of the Central Publisher API.
pub const DEFAULT_ENDPOINT: &str = "https://central.sonatype.com/api/v1/publisher/upload";

/// Version used when neither the environment nor the manifest names one.
pub const DEFAULT_VERSION: &str = "1.0.0";

pub mod config;
pub mod coordinate;
pub mod manifest;
pub mod properties;
