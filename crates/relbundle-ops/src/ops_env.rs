//! Operation: describe the resolved configuration.

use secrecy::{ExposeSecret, SecretString};

use relbundle_core::config::{
    ReleaseConfig, BEARER_TOKEN_VAR, SIGNING_KEY_VAR, SIGNING_PASSWORD_VAR,
};
use relbundle_maven::auth::MASK;
use relbundle_maven::layout::DeploymentLayout;

/// `(label, value)` rows describing `config`; secrets are masked unless `reveal`.
pub fn describe(config: &ReleaseConfig, reveal: bool) -> Vec<(String, String)> {
    let layout = DeploymentLayout::from_config(config);
    let secret = |value: &Option<SecretString>| match value {
        Some(s) if reveal => s.expose_secret().to_string(),
        Some(_) => MASK.to_string(),
        None => "(not set)".to_string(),
    };

    vec![
        ("coordinate".to_string(), config.coordinate.to_string()),
        ("name".to_string(), config.name.clone()),
        ("build dir".to_string(), config.build_dir.display().to_string()),
        ("publication".to_string(), config.publication.clone()),
        (
            "artifacts".to_string(),
            layout.coordinate_dir(&config.coordinate).display().to_string(),
        ),
        (
            "bundle".to_string(),
            layout.bundle_path(config).display().to_string(),
        ),
        ("endpoint".to_string(), config.publish.endpoint.clone()),
        (
            "timeout".to_string(),
            format!("{}s", config.publish.timeout.as_secs()),
        ),
        ("retries".to_string(), config.publish.retries.to_string()),
        ("signing".to_string(), config.signing.enabled.to_string()),
        (
            BEARER_TOKEN_VAR.to_string(),
            secret(&config.publish.bearer_token),
        ),
        (SIGNING_KEY_VAR.to_string(), secret(&config.signing.key)),
        (
            SIGNING_PASSWORD_VAR.to_string(),
            secret(&config.signing.password),
        ),
    ]
}
