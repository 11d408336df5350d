//! Operation: gather build outputs into the coordinate directory.

use relbundle_core::config::ReleaseConfig;
use relbundle_maven::collect::{self, CollectedArtifacts};
use relbundle_maven::layout::DeploymentLayout;
use relbundle_maven::signing;
use relbundle_util::progress::{status, status_warn};

/// Collect the POM, jars and signatures for `config`'s coordinate.
///
/// Signatures are only required up front when signing is disabled;
/// otherwise the sign stage produces whatever is missing.
pub fn collect(config: &ReleaseConfig) -> miette::Result<CollectedArtifacts> {
    let layout = DeploymentLayout::from_config(config);
    let require_signatures = !config.signing.enabled;
    let collected = collect::collect(
        &layout,
        &config.coordinate,
        &config.publication,
        require_signatures,
    )?;
    status(
        "Collected",
        &format!(
            "{} files for {} into {}",
            collected.files.len(),
            config.coordinate,
            layout.display_relative(&collected.dir)
        ),
    );
    if !require_signatures {
        let unsigned = signing::unsigned_files(&collected.dir)?;
        if !unsigned.is_empty() {
            status_warn(
                "Unsigned",
                &format!("{} artifacts; the sign stage will create their signatures", unsigned.len()),
            );
        }
    }
    Ok(collected)
}
