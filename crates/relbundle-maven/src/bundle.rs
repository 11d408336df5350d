//! Packages the deployment-artifacts tree into the upload bundle.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use relbundle_util::errors::ReleaseError;

/// Result of a successful packaging run.
#[derive(Debug)]
pub struct BundleSummary {
    pub path: PathBuf,
    pub entries: usize,
    pub size: u64,
}

/// Zip every file under `root` into `bundle_path`, replacing any previous bundle.
///
/// Entry names are `/`-separated paths relative to `root`, added in sorted
/// order. Stage ordering (checksums and signatures first) is the caller's job.
pub fn package(root: &Path, bundle_path: &Path) -> miette::Result<BundleSummary> {
    if !root.is_dir() {
        return Err(ReleaseError::MissingArtifact {
            missing: vec![root.display().to_string()],
        }
        .into());
    }
    if let Some(parent) = bundle_path.parent() {
        fs::create_dir_all(parent).map_err(|e| packaging(bundle_path, e))?;
    }

    let file = fs::File::create(bundle_path).map_err(|e| packaging(bundle_path, e))?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut entries = 0;
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| packaging(bundle_path, e))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry_name(root, entry.path())?;
        zip.start_file(name.as_str(), options)
            .map_err(|e| packaging(bundle_path, e))?;
        let mut source = fs::File::open(entry.path()).map_err(ReleaseError::Io)?;
        io::copy(&mut source, &mut zip).map_err(|e| packaging(bundle_path, e))?;
        tracing::debug!("Added {name}");
        entries += 1;
    }
    zip.finish().map_err(|e| packaging(bundle_path, e))?;

    let size = fs::metadata(bundle_path).map_err(ReleaseError::Io)?.len();
    Ok(BundleSummary {
        path: bundle_path.to_path_buf(),
        entries,
        size,
    })
}

/// Names of every file entry in `bundle`, in archive order.
pub fn list_entries(bundle: &Path) -> miette::Result<Vec<String>> {
    let file = fs::File::open(bundle).map_err(ReleaseError::Io)?;
    let archive = ZipArchive::new(file).map_err(|e| ReleaseError::Packaging {
        message: format!("Failed to open {}: {e}", bundle.display()),
    })?;
    Ok(archive
        .file_names()
        .filter(|name| !name.ends_with('/'))
        .map(str::to_string)
        .collect())
}

fn entry_name(root: &Path, path: &Path) -> miette::Result<String> {
    let relative = path.strip_prefix(root).map_err(|_| ReleaseError::Packaging {
        message: format!("{} is outside {}", path.display(), root.display()),
    })?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Ok(parts.join("/"))
}

fn packaging(bundle: &Path, e: impl std::fmt::Display) -> ReleaseError {
    ReleaseError::Packaging {
        message: format!("{}: {e}", bundle.display()),
    }
}
