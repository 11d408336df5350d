//! Operation: run the whole pipeline.
//!
//! collect → sign (when enabled) → checksum → bundle → upload. Every stage
//! finishes before the next starts and any failure stops the run.

use relbundle_core::config::ReleaseConfig;
use relbundle_maven::bundle::BundleSummary;
use relbundle_maven::publish::{ReqwestTransport, UploadResponse, UploadTransport};

use crate::{ops_bundle, ops_checksum, ops_collect, ops_sign, ops_upload};

/// Switches for a release run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReleaseOptions {
    /// Stop after packaging.
    pub skip_upload: bool,
}

/// What a release run produced.
#[derive(Debug)]
pub struct ReleaseReport {
    pub bundle: BundleSummary,
    pub upload: Option<UploadResponse>,
}

/// Run the pipeline against the production publisher API.
pub async fn release(
    config: &ReleaseConfig,
    options: ReleaseOptions,
) -> miette::Result<ReleaseReport> {
    if options.skip_upload {
        return release_with(config, options, None::<ReqwestTransport>).await;
    }
    ops_upload::require_token(config)?;
    let transport = ReqwestTransport::new(config.publish.timeout)?;
    release_with(config, options, Some(transport)).await
}

/// Run the pipeline, uploading through `transport` unless upload is skipped.
///
/// The bearer token is checked before any file is touched.
pub async fn release_with<T: UploadTransport>(
    config: &ReleaseConfig,
    options: ReleaseOptions,
    transport: Option<T>,
) -> miette::Result<ReleaseReport> {
    let upload_via = match (options.skip_upload, transport) {
        (true, _) => None,
        (false, Some(transport)) => Some((ops_upload::require_token(config)?, transport)),
        (false, None) => {
            return Err(relbundle_util::errors::ReleaseError::Configuration {
                message: "No upload transport configured".to_string(),
            }
            .into())
        }
    };

    ops_collect::collect(config)?;
    if config.signing.enabled {
        ops_sign::sign(config)?;
    }
    ops_checksum::checksum(config)?;
    let bundle = ops_bundle::bundle(config)?;

    let upload = match upload_via {
        Some((token, transport)) => {
            Some(ops_upload::upload_with(config, token, transport).await?)
        }
        None => None,
    };

    Ok(ReleaseReport { bundle, upload })
}
