//! Operation: upload the bundle to the publisher API.

use secrecy::{ExposeSecret, SecretString};

use relbundle_core::config::{ReleaseConfig, BEARER_TOKEN_VAR};
use relbundle_maven::layout::DeploymentLayout;
use relbundle_maven::publish::{
    ReqwestTransport, RetryPolicy, UploadResponse, UploadTransport, Uploader,
};
use relbundle_util::errors::ReleaseError;
use relbundle_util::progress::{status, status_info};

/// The configured bearer token, or a configuration error naming the variable.
pub fn require_token(config: &ReleaseConfig) -> miette::Result<SecretString> {
    match &config.publish.bearer_token {
        Some(token) => Ok(SecretString::new(token.expose_secret().into())),
        None => Err(ReleaseError::Configuration {
            message: format!("{BEARER_TOKEN_VAR} environment variable is not set."),
        }
        .into()),
    }
}

/// Upload the bundle for `config` with the production HTTP client.
pub async fn upload(config: &ReleaseConfig) -> miette::Result<UploadResponse> {
    let token = require_token(config)?;
    let transport = ReqwestTransport::new(config.publish.timeout)?;
    upload_with(config, token, transport).await
}

/// Upload the bundle for `config` through `transport`.
///
/// A failed upload leaves the bundle on disk so it can be retried by hand.
pub async fn upload_with<T: UploadTransport>(
    config: &ReleaseConfig,
    token: SecretString,
    transport: T,
) -> miette::Result<UploadResponse> {
    let layout = DeploymentLayout::from_config(config);
    let bundle = layout.bundle_path(config);
    let policy = if config.publish.retries == 0 {
        RetryPolicy::none()
    } else {
        RetryPolicy::new(config.publish.retries)
    };

    let mut uploader = Uploader::new(transport, policy);
    status_info("Uploading", &config.bundle_file_name());
    let response = uploader
        .upload(&bundle, token, &config.publish.endpoint)
        .await?;
    status(
        "Uploaded",
        &format!("{} ({} {})", config.coordinate, response.status, response.reason),
    );
    Ok(response)
}
