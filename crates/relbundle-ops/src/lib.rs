//! High-level release operations.
//!
//! Each `ops_*` module is one pipeline stage operating on a resolved
//! [`relbundle_core::config::ReleaseConfig`]; [`ops_release`] runs them in order.

pub mod ops_bundle;
pub mod ops_checksum;
pub mod ops_clean;
pub mod ops_collect;
pub mod ops_env;
pub mod ops_inspect;
pub mod ops_release;
pub mod ops_sign;
pub mod ops_upload;

use std::path::PathBuf;

use relbundle_core::config::ReleaseConfig;
use relbundle_maven::layout::DeploymentLayout;
use relbundle_util::errors::ReleaseError;

/// The coordinate directory for this release, which must already exist.
pub(crate) fn existing_coordinate_dir(config: &ReleaseConfig) -> miette::Result<PathBuf> {
    let layout = DeploymentLayout::from_config(config);
    let dir = layout.coordinate_dir(&config.coordinate);
    if dir.is_dir() {
        Ok(dir)
    } else {
        Err(ReleaseError::MissingArtifact {
            missing: vec![layout.display_relative(&dir)],
        }
        .into())
    }
}
