//! Operation: write missing detached signatures.

use std::path::PathBuf;

use relbundle_core::config::ReleaseConfig;
use relbundle_maven::layout::DeploymentLayout;
use relbundle_maven::signing;
use relbundle_util::errors::ReleaseError;
use relbundle_util::progress::{spinner, status, status_info};

/// Sign every unsigned artifact in the coordinate directory, then make sure
/// nothing was left unsigned.
pub fn sign(config: &ReleaseConfig) -> miette::Result<Vec<PathBuf>> {
    let dir = crate::existing_coordinate_dir(config)?;

    let sp = spinner("Signing artifacts...");
    let written = signing::sign_missing(&dir, &config.signing);
    sp.finish_and_clear();
    let written = written?;
    if written.is_empty() {
        status_info("Signed", "all artifacts already carry signatures");
    } else {
        status("Signed", &format!("{} artifacts", written.len()));
    }

    let unsigned = signing::unsigned_files(&dir)?;
    if !unsigned.is_empty() {
        let layout = DeploymentLayout::from_config(config);
        return Err(ReleaseError::MissingArtifact {
            missing: unsigned
                .iter()
                .map(|f| format!("{}.asc", layout.display_relative(f)))
                .collect(),
        }
        .into());
    }
    Ok(written)
}
