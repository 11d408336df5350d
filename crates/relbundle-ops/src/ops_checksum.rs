//! Operation: write checksum sidecars for the collected artifacts.

use std::path::PathBuf;

use relbundle_core::config::ReleaseConfig;
use relbundle_maven::checksum;
use relbundle_util::progress::status;

/// Write `.md5` and `.sha1` next to every artifact in the coordinate directory.
pub fn checksum(config: &ReleaseConfig) -> miette::Result<Vec<PathBuf>> {
    let dir = crate::existing_coordinate_dir(config)?;
    let subjects = checksum::write_sidecars(&dir)?;
    status(
        "Checksummed",
        &format!("{} files (MD5, SHA-1)", subjects.len()),
    );
    Ok(subjects)
}
