//! Operation: package the deployment-artifacts tree into the bundle zip.

use relbundle_core::config::ReleaseConfig;
use relbundle_maven::bundle::{self, BundleSummary};
use relbundle_maven::checksum;
use relbundle_maven::layout::DeploymentLayout;
use relbundle_util::errors::ReleaseError;
use relbundle_util::progress::status;

/// Verify the checksum sidecars, then zip `deployment-artifacts` into
/// `deployment-bundle/<group>-<name>-<version>-bundle.zip`.
pub fn bundle(config: &ReleaseConfig) -> miette::Result<BundleSummary> {
    let layout = DeploymentLayout::from_config(config);
    let dir = crate::existing_coordinate_dir(config)?;
    checksum::verify_sidecars(&dir)?;

    let bundle_path = layout.bundle_path(config);
    let summary = bundle::package(&layout.artifacts_root(), &bundle_path)?;

    let absolute = std::path::absolute(&summary.path).map_err(ReleaseError::Io)?;
    status(
        "Packaged",
        &format!("{} entries ({} bytes)", summary.entries, summary.size),
    );
    println!("Deployment bundle created at: {}", absolute.display());
    Ok(summary)
}
