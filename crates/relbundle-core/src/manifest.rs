use serde::Deserialize;
use std::path::Path;

use relbundle_util::errors::ReleaseError;

/// Name of the project manifest looked up from the working directory upwards.
pub const MANIFEST_NAME: &str = "bundle.toml";

/// The parsed representation of a `bundle.toml` file.
#[derive(Debug, Clone, Deserialize)]
pub struct BundleManifest {
    pub project: ProjectSection,

    #[serde(default)]
    pub build: BuildSection,

    #[serde(default)]
    pub publish: PublishSection,

    #[serde(default)]
    pub signing: SigningSection,
}

/// Release identity from the `[project]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectSection {
    pub group: String,
    #[serde(rename = "artifact-id")]
    pub artifact_id: String,
    /// Project name used in the bundle file name; defaults to the artifact id.
    #[serde(default)]
    pub name: Option<String>,
    /// Fallback version when `GITHUB_REF_NAME` is not set.
    #[serde(default)]
    pub version: Option<String>,
}

/// Where the toolchain left its outputs, from `[build]`.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildSection {
    #[serde(default = "default_build_dir")]
    pub dir: String,
    #[serde(default = "default_publication")]
    pub publication: String,
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            dir: default_build_dir(),
            publication: default_publication(),
        }
    }
}

fn default_build_dir() -> String {
    "build".to_string()
}

fn default_publication() -> String {
    "mavenJava".to_string()
}

/// Upload settings from `[publish]`.
#[derive(Debug, Clone, Deserialize)]
pub struct PublishSection {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_secs", rename = "timeout-secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub retries: u32,
}

impl Default for PublishSection {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            retries: 0,
        }
    }
}

fn default_endpoint() -> String {
    crate::DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    300
}

/// Detached signing settings from `[signing]`.
#[derive(Debug, Clone, Deserialize)]
pub struct SigningSection {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_gpg")]
    pub gpg: String,
}

impl Default for SigningSection {
    fn default() -> Self {
        Self {
            enabled: false,
            gpg: default_gpg(),
        }
    }
}

fn default_gpg() -> String {
    "gpg".to_string()
}

impl BundleManifest {
    /// Read and parse a `bundle.toml`, resolving `${env:VAR}` references
    /// against the sibling `.release.env` and the process environment.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ReleaseError::Configuration {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;

        let dir = path.parent().unwrap_or(Path::new("."));
        let env_vars =
            crate::properties::load_env_file(&dir.join(crate::properties::ENV_FILE_NAME))
                .unwrap_or_default();
        let resolved = crate::properties::interpolate(&content, &env_vars);

        Self::parse(&resolved)
    }

    /// Parse a `bundle.toml` from a string (no interpolation).
    pub fn parse(content: &str) -> miette::Result<Self> {
        toml::from_str(content).map_err(|e| {
            ReleaseError::Configuration {
                message: format!("Failed to parse {MANIFEST_NAME}: {e}"),
            }
            .into()
        })
    }
}
