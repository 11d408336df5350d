//! Operation: list what the current bundle contains.

use relbundle_core::config::ReleaseConfig;
use relbundle_maven::bundle;
use relbundle_maven::layout::DeploymentLayout;
use relbundle_util::errors::ReleaseError;

/// Entry names of the bundle for `config`, sorted.
pub fn inspect(config: &ReleaseConfig) -> miette::Result<Vec<String>> {
    let layout = DeploymentLayout::from_config(config);
    let path = layout.bundle_path(config);
    if !path.is_file() {
        return Err(ReleaseError::MissingArtifact {
            missing: vec![layout.display_relative(&path)],
        }
        .into());
    }
    let mut entries = bundle::list_entries(&path)?;
    entries.sort();
    Ok(entries)
}
