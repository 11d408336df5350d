use std::fmt;
use std::path::PathBuf;

use relbundle_util::errors::ReleaseError;

/// Maven coordinate of the artifact being released (`group:artifact:version`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coordinate {
    pub group: String,
    pub artifact_id: String,
    pub version: String,
}

impl Coordinate {
    /// Build a coordinate, rejecting values that cannot form a safe directory path.
    pub fn new(
        group: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Result<Self, ReleaseError> {
        let coord = Self {
            group: group.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
        };
        coord.validate()?;
        Ok(coord)
    }

    fn validate(&self) -> Result<(), ReleaseError> {
        let fields = [
            ("group", &self.group),
            ("artifact id", &self.artifact_id),
            ("version", &self.version),
        ];
        for (label, value) in fields {
            if value.trim().is_empty() {
                return Err(ReleaseError::Configuration {
                    message: format!("Release {label} must not be empty"),
                });
            }
            if value.contains(['/', '\\']) || value == "." || value == ".." {
                return Err(ReleaseError::Configuration {
                    message: format!("Release {label} '{value}' is not a valid path segment"),
                });
            }
        }
        if self.group.split('.').any(str::is_empty) {
            return Err(ReleaseError::Configuration {
                message: format!("Group '{}' has an empty segment", self.group),
            });
        }
        Ok(())
    }

    /// Standard Maven layout path for this coordinate.
    ///
    /// `io.github.lionh:releasedemo:1.0.0` becomes
    /// `io/github/lionh/releasedemo/1.0.0`
    pub fn coordinate_path(&self) -> String {
        format!(
            "{}/{}/{}",
            self.group.replace('.', "/"),
            self.artifact_id,
            self.version
        )
    }

    /// The coordinate path as platform path components.
    pub fn relative_dir(&self) -> PathBuf {
        let mut path: PathBuf = self.group.split('.').collect();
        path.push(&self.artifact_id);
        path.push(&self.version);
        path
    }

    /// File name stem shared by the POM and the jars: `<artifactId>-<version>`.
    pub fn file_stem(&self) -> String {
        format!("{}-{}", self.artifact_id, self.version)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.artifact_id, self.version)
    }
}
