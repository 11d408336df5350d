//! Operation: remove the staging tree and the bundle.

use std::path::PathBuf;

use relbundle_core::config::ReleaseConfig;
use relbundle_maven::layout::DeploymentLayout;
use relbundle_util::errors::ReleaseError;

/// Result of a clean operation.
#[derive(Debug, PartialEq, Eq)]
pub enum CleanResult {
    /// The listed directories were removed.
    Removed(Vec<PathBuf>),
    NothingToClean,
}

/// Delete `deployment-artifacts` and `deployment-bundle` under the build
/// directory. Build outputs themselves are left alone.
pub fn clean(config: &ReleaseConfig) -> miette::Result<CleanResult> {
    let layout = DeploymentLayout::from_config(config);
    let mut removed = Vec::new();
    for dir in [layout.artifacts_root(), layout.bundle_dir()] {
        if dir.exists() {
            std::fs::remove_dir_all(&dir).map_err(ReleaseError::Io)?;
            tracing::debug!("Removed {}", dir.display());
            removed.push(dir);
        }
    }
    if removed.is_empty() {
        Ok(CleanResult::NothingToClean)
    } else {
        Ok(CleanResult::Removed(removed))
    }
}
