//! Gathers the POM, jars and signatures into the coordinate directory.
//!
//! The expected file set is enumerated up front; if anything is absent the
//! collector fails with every missing name and copies nothing.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobMatcher};
use walkdir::WalkDir;

use relbundle_core::coordinate::Coordinate;
use relbundle_util::errors::ReleaseError;
use relbundle_util::fs::{ensure_dir, file_name_string, recreate_dir};

use crate::layout::{DeploymentLayout, GENERATED_POM};

/// Jar classifiers that go into the bundle, as file-name globs under `libs/`.
pub const JAR_PATTERNS: [&str; 3] = ["*-javadoc.jar", "*-plain.jar", "*-sources.jar"];

/// Extension of a detached signature.
pub const SIGNATURE_EXT: &str = "asc";

/// One file to copy: where it comes from and its name in the coordinate directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyStep {
    pub source: PathBuf,
    pub target_name: String,
}

/// What the collector put into the coordinate directory.
#[derive(Debug)]
pub struct CollectedArtifacts {
    pub dir: PathBuf,
    pub files: Vec<PathBuf>,
}

/// Enumerate every file the collection needs.
///
/// With `require_signatures` each POM and jar must have its `.asc` sibling;
/// without it, existing signatures are still carried along. Two sources
/// mapping to one target name is a configuration error.
pub fn plan(
    layout: &DeploymentLayout,
    coordinate: &Coordinate,
    publication: &str,
    require_signatures: bool,
) -> miette::Result<Vec<CopyStep>> {
    let mut steps = Vec::new();
    let mut missing = Vec::new();

    let pom = layout.publication_dir(publication).join(GENERATED_POM);
    let pom_name = format!("{}.pom", coordinate.file_stem());
    if pom.is_file() {
        steps.push(CopyStep {
            source: pom.clone(),
            target_name: pom_name.clone(),
        });
    } else {
        missing.push(layout.display_relative(&pom));
    }
    plan_signature(
        layout,
        &pom,
        &pom_name,
        require_signatures,
        &mut steps,
        &mut missing,
    );

    let libs = lib_files(&layout.libs_dir());
    for pattern in JAR_PATTERNS {
        let matcher = matcher(pattern)?;
        let jars: Vec<&PathBuf> = libs
            .iter()
            .filter(|p| matcher.is_match(file_name_string(p)))
            .collect();
        if jars.is_empty() {
            missing.push(layout.display_relative(&layout.libs_dir().join(pattern)));
            continue;
        }
        for jar in jars {
            let name = file_name_string(jar);
            steps.push(CopyStep {
                source: jar.clone(),
                target_name: name.clone(),
            });
            plan_signature(
                layout,
                jar,
                &name,
                require_signatures,
                &mut steps,
                &mut missing,
            );
        }
    }

    if !missing.is_empty() {
        return Err(ReleaseError::MissingArtifact { missing }.into());
    }
    reject_collisions(layout, &steps)?;
    Ok(steps)
}

/// Fail if two sources would be copied to the same name, listing every source.
///
/// Same-named jars in different `libs/` subdirectories would otherwise pair
/// one jar with another jar's signature.
fn reject_collisions(layout: &DeploymentLayout, steps: &[CopyStep]) -> miette::Result<()> {
    let mut by_target: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for step in steps {
        by_target
            .entry(step.target_name.as_str())
            .or_default()
            .push(layout.display_relative(&step.source));
    }
    let collisions: Vec<String> = by_target
        .into_iter()
        .filter(|(_, sources)| sources.len() > 1)
        .map(|(target, sources)| format!("{target} <- {}", sources.join(" and ")))
        .collect();
    if collisions.is_empty() {
        Ok(())
    } else {
        Err(ReleaseError::Configuration {
            message: format!(
                "Several build outputs map to the same bundle file: {}",
                collisions.join("; ")
            ),
        }
        .into())
    }
}

fn plan_signature(
    layout: &DeploymentLayout,
    subject: &Path,
    subject_target: &str,
    required: bool,
    steps: &mut Vec<CopyStep>,
    missing: &mut Vec<String>,
) {
    let signature = signature_path(subject);
    if signature.is_file() {
        steps.push(CopyStep {
            source: signature,
            target_name: format!("{subject_target}.{SIGNATURE_EXT}"),
        });
    } else if required {
        missing.push(layout.display_relative(&signature));
    }
}

/// `<file>.asc` next to `file`.
pub fn signature_path(file: &Path) -> PathBuf {
    file.with_file_name(format!("{}.{SIGNATURE_EXT}", file_name_string(file)))
}

fn matcher(pattern: &str) -> miette::Result<GlobMatcher> {
    Glob::new(pattern)
        .map(|g| g.compile_matcher())
        .map_err(|e| {
            ReleaseError::Configuration {
                message: format!("Invalid artifact pattern '{pattern}': {e}"),
            }
            .into()
        })
}

fn lib_files(libs_dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(libs_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .collect()
}

/// Copy the planned files into a freshly emptied deployment-artifacts tree.
///
/// The whole `deployment-artifacts` root is recreated so that files from an
/// earlier version never end up in this bundle.
pub fn collect(
    layout: &DeploymentLayout,
    coordinate: &Coordinate,
    publication: &str,
    require_signatures: bool,
) -> miette::Result<CollectedArtifacts> {
    let steps = plan(layout, coordinate, publication, require_signatures)?;

    recreate_dir(&layout.artifacts_root()).map_err(ReleaseError::Io)?;
    let dir = layout.coordinate_dir(coordinate);
    ensure_dir(&dir).map_err(ReleaseError::Io)?;

    let mut files = Vec::with_capacity(steps.len());
    for step in steps {
        let target = dir.join(&step.target_name);
        std::fs::copy(&step.source, &target).map_err(ReleaseError::Io)?;
        tracing::debug!("Copied {} -> {}", step.source.display(), target.display());
        files.push(target);
    }

    Ok(CollectedArtifacts { dir, files })
}
