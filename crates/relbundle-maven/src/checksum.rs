//! Checksum sidecar generation and verification (MD5, SHA-1).

use std::path::{Path, PathBuf};

use relbundle_util::errors::ReleaseError;
use relbundle_util::fs::{file_name_string, list_files};
use relbundle_util::hash::{checksum, checksum_file, ChecksumAlgorithm};

/// Path of the `algo` sidecar next to `file`: `<file>.md5` or `<file>.sha1`.
pub fn sidecar_path(file: &Path, algo: ChecksumAlgorithm) -> PathBuf {
    file.with_file_name(format!("{}.{}", file_name_string(file), algo.extension()))
}

/// Write `.md5` and `.sha1` sidecars for every file directly in `dir`.
///
/// Existing sidecars are skipped as subjects and overwritten as outputs, so
/// running this twice leaves identical content. Each sidecar holds only the
/// lowercase hex digest. Returns the files that were checksummed.
pub fn write_sidecars(dir: &Path) -> miette::Result<Vec<PathBuf>> {
    let mut subjects = Vec::new();
    for file in list_files(dir).map_err(ReleaseError::Io)? {
        if ChecksumAlgorithm::is_sidecar_name(&file_name_string(&file)) {
            continue;
        }
        let data = std::fs::read(&file).map_err(ReleaseError::Io)?;
        for algo in ChecksumAlgorithm::ALL {
            std::fs::write(sidecar_path(&file, algo), checksum(&data, algo))
                .map_err(ReleaseError::Io)?;
        }
        tracing::debug!("Wrote checksums for {}", file.display());
        subjects.push(file);
    }
    Ok(subjects)
}

/// Check that every non-sidecar file in `dir` has both sidecars and that
/// they match the file's current bytes.
///
/// Absent sidecars are reported together as a missing-artifact error;
/// a stale sidecar fails with the algorithm and both digests.
pub fn verify_sidecars(dir: &Path) -> miette::Result<()> {
    let mut missing = Vec::new();
    for file in list_files(dir).map_err(ReleaseError::Io)? {
        let name = file_name_string(&file);
        if ChecksumAlgorithm::is_sidecar_name(&name) {
            continue;
        }
        for algo in ChecksumAlgorithm::ALL {
            let sidecar = sidecar_path(&file, algo);
            if !sidecar.is_file() {
                missing.push(file_name_string(&sidecar));
                continue;
            }
            let content = std::fs::read_to_string(&sidecar).map_err(ReleaseError::Io)?;
            let actual = checksum_file(&file, algo).map_err(ReleaseError::Io)?;
            check(&actual, &extract_hash(&content), algo, &name)?;
        }
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ReleaseError::MissingArtifact { missing }.into())
    }
}

fn check(actual: &str, expected: &str, algo: ChecksumAlgorithm, name: &str) -> miette::Result<()> {
    if expected.len() != algo.hex_len() {
        return Err(ReleaseError::Packaging {
            message: format!("{algo} sidecar for {name} is malformed: '{expected}'"),
        }
        .into());
    }
    if actual.eq_ignore_ascii_case(expected) {
        tracing::debug!("{algo} ok for {name}");
        Ok(())
    } else {
        Err(ReleaseError::Packaging {
            message: format!("{algo} mismatch for {name}: expected {expected}, got {actual}"),
        }
        .into())
    }
}

/// Extract the hex hash from a checksum file.
///
/// Checksum files may contain just the hash, or `hash  filename`.
fn extract_hash(content: &str) -> String {
    content.split_whitespace().next().unwrap_or("").to_string()
}
