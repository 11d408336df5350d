//! Build-directory layout of the deployment pipeline.

use std::path::{Path, PathBuf};

use relbundle_core::config::ReleaseConfig;
use relbundle_core::coordinate::Coordinate;

/// Directory the collector copies artifacts into, below the build directory.
pub const ARTIFACTS_DIR: &str = "deployment-artifacts";

/// Directory the packager writes the bundle into, below the build directory.
pub const BUNDLE_DIR: &str = "deployment-bundle";

/// File name the toolchain gives the generated POM.
pub const GENERATED_POM: &str = "pom-default.xml";

/// Resolves every input and output location from one build directory.
#[derive(Debug, Clone)]
pub struct DeploymentLayout {
    build_dir: PathBuf,
}

impl DeploymentLayout {
    pub fn new(build_dir: impl Into<PathBuf>) -> Self {
        Self {
            build_dir: build_dir.into(),
        }
    }

    pub fn from_config(config: &ReleaseConfig) -> Self {
        Self::new(&config.build_dir)
    }

    /// `build/publications/<publication>`
    pub fn publication_dir(&self, publication: &str) -> PathBuf {
        self.build_dir.join("publications").join(publication)
    }

    /// `build/libs`
    pub fn libs_dir(&self) -> PathBuf {
        self.build_dir.join("libs")
    }

    /// `build/deployment-artifacts`, the root of every bundle entry.
    pub fn artifacts_root(&self) -> PathBuf {
        self.build_dir.join(ARTIFACTS_DIR)
    }

    /// `build/deployment-artifacts/<group-as-path>/<artifactId>/<version>`
    pub fn coordinate_dir(&self, coordinate: &Coordinate) -> PathBuf {
        self.artifacts_root().join(coordinate.relative_dir())
    }

    /// `build/deployment-bundle`
    pub fn bundle_dir(&self) -> PathBuf {
        self.build_dir.join(BUNDLE_DIR)
    }

    /// Full path of the bundle archive for this release.
    pub fn bundle_path(&self, config: &ReleaseConfig) -> PathBuf {
        self.bundle_dir().join(config.bundle_file_name())
    }

    /// Render `path` relative to the build directory for messages.
    pub fn display_relative(&self, path: &Path) -> String {
        path.strip_prefix(&self.build_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/")
    }
}
