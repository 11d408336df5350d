//! Release configuration, resolved once at startup.
//!
//! Layers, lowest precedence first: built-in defaults, `bundle.toml`, the
//! process environment, `.release.env`, and finally command-line overrides.
//! The resulting [`ReleaseConfig`] is immutable and handed to every stage.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use secrecy::SecretString;

use relbundle_util::errors::ReleaseError;

use crate::coordinate::Coordinate;
use crate::manifest::{BundleManifest, MANIFEST_NAME};
use crate::properties::{self, ENV_FILE_NAME};

/// Environment variable carrying the release tag (e.g. `v1.2.0`).
pub const VERSION_VAR: &str = "GITHUB_REF_NAME";
/// Environment variable carrying the ASCII-armored private signing key.
pub const SIGNING_KEY_VAR: &str = "SIGNING_KEY";
/// Environment variable carrying the signing key passphrase.
pub const SIGNING_PASSWORD_VAR: &str = "SIGNING_PASSWORD";
/// Environment variable carrying the publisher API bearer token.
pub const BEARER_TOKEN_VAR: &str = "BEARER_TOKEN";

/// Values supplied on the command line; `None` leaves the lower layers in charge.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub release_version: Option<String>,
    pub build_dir: Option<PathBuf>,
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
    pub retries: Option<u32>,
    pub sign: bool,
}

/// Signing material and tool selection.
#[derive(Debug)]
pub struct SigningConfig {
    pub enabled: bool,
    pub gpg: String,
    pub key: Option<SecretString>,
    pub password: Option<SecretString>,
}

/// Upload endpoint and network policy.
#[derive(Debug)]
pub struct PublishConfig {
    pub endpoint: String,
    pub timeout: Duration,
    pub retries: u32,
    pub bearer_token: Option<SecretString>,
}

/// Everything the pipeline needs, collected into one value.
#[derive(Debug)]
pub struct ReleaseConfig {
    pub project_root: PathBuf,
    pub coordinate: Coordinate,
    /// Project name used in the bundle file name.
    pub name: String,
    pub build_dir: PathBuf,
    pub publication: String,
    pub publish: PublishConfig,
    pub signing: SigningConfig,
}

impl ReleaseConfig {
    /// Load `bundle.toml` and `.release.env` from `project_root` and resolve
    /// the configuration against the process environment.
    pub fn load(project_root: &Path, overrides: &ConfigOverrides) -> miette::Result<Self> {
        let manifest_path = project_root.join(MANIFEST_NAME);
        if !manifest_path.is_file() {
            return Err(ReleaseError::Configuration {
                message: format!("Could not find {MANIFEST_NAME} in {}", project_root.display()),
            }
            .into());
        }
        let manifest = BundleManifest::from_path(&manifest_path)?;
        let env_vars = properties::load_env_file(&project_root.join(ENV_FILE_NAME))?;
        Self::resolve(project_root, &manifest, &env_vars, overrides)
    }

    /// Combine an already-parsed manifest with environment values and overrides.
    pub fn resolve(
        project_root: &Path,
        manifest: &BundleManifest,
        env_vars: &BTreeMap<String, String>,
        overrides: &ConfigOverrides,
    ) -> miette::Result<Self> {
        Self::resolve_with_env(project_root, manifest, env_vars, overrides, |key| {
            std::env::var(key).ok()
        })
    }

    /// [`ReleaseConfig::resolve`] with `process_env` in place of the process
    /// environment. Values in `env_vars` still take precedence.
    pub fn resolve_with_env(
        project_root: &Path,
        manifest: &BundleManifest,
        env_vars: &BTreeMap<String, String>,
        overrides: &ConfigOverrides,
        process_env: impl Fn(&str) -> Option<String>,
    ) -> miette::Result<Self> {
        let lookup = |key: &str| properties::lookup_with(key, env_vars, &process_env);
        let version = resolve_version(manifest, overrides, &lookup);
        let coordinate = Coordinate::new(
            manifest.project.group.clone(),
            manifest.project.artifact_id.clone(),
            version,
        )?;

        let name = manifest
            .project
            .name
            .clone()
            .unwrap_or_else(|| manifest.project.artifact_id.clone());

        let build_dir = overrides
            .build_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(&manifest.build.dir));
        let build_dir = if build_dir.is_absolute() {
            build_dir
        } else {
            project_root.join(build_dir)
        };

        let endpoint = overrides
            .endpoint
            .clone()
            .unwrap_or_else(|| manifest.publish.endpoint.clone());
        if !(endpoint.starts_with("https://") || endpoint.starts_with("http://")) {
            return Err(ReleaseError::Configuration {
                message: format!("Publishing endpoint '{endpoint}' is not an http(s) URL"),
            }
            .into());
        }

        let timeout_secs = overrides
            .timeout_secs
            .unwrap_or(manifest.publish.timeout_secs);
        if timeout_secs == 0 {
            return Err(ReleaseError::Configuration {
                message: "Upload timeout must be at least one second".to_string(),
            }
            .into());
        }

        let secret = |key: &str| lookup(key).map(|v| SecretString::new(v.into()));

        let config = Self {
            project_root: project_root.to_path_buf(),
            coordinate,
            name,
            build_dir,
            publication: manifest.build.publication.clone(),
            publish: PublishConfig {
                endpoint,
                timeout: Duration::from_secs(timeout_secs),
                retries: overrides.retries.unwrap_or(manifest.publish.retries),
                bearer_token: secret(BEARER_TOKEN_VAR),
            },
            signing: SigningConfig {
                enabled: overrides.sign || manifest.signing.enabled,
                gpg: manifest.signing.gpg.clone(),
                key: secret(SIGNING_KEY_VAR),
                password: secret(SIGNING_PASSWORD_VAR),
            },
        };
        tracing::debug!("Resolved release configuration for {}", config.coordinate);
        Ok(config)
    }

    /// `<group>-<name>-<version>-bundle.zip`
    pub fn bundle_file_name(&self) -> String {
        format!(
            "{}-{}-{}-bundle.zip",
            self.coordinate.group, self.name, self.coordinate.version
        )
    }
}

fn resolve_version(
    manifest: &BundleManifest,
    overrides: &ConfigOverrides,
    lookup: &impl Fn(&str) -> Option<String>,
) -> String {
    overrides
        .release_version
        .clone()
        .or_else(|| lookup(VERSION_VAR))
        .or_else(|| manifest.project.version.clone())
        .map(|v| v.strip_prefix('v').map(str::to_string).unwrap_or(v))
        .unwrap_or_else(|| crate::DEFAULT_VERSION.to_string())
}
