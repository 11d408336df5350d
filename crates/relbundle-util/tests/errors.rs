use relbundle_util::errors::ReleaseError;

#[test]
fn test_io_error_display() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
    let err = ReleaseError::from(io_err);
    assert!(err.to_string().contains("I/O error"), "got: {err}");
}

#[test]
fn test_configuration_error_display() {
    let err = ReleaseError::Configuration {
        message: "BEARER_TOKEN is not set".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Configuration error: BEARER_TOKEN is not set"
    );
}

#[test]
fn test_missing_artifact_lists_every_name() {
    let err = ReleaseError::MissingArtifact {
        missing: vec!["app-1.0.pom".to_string(), "app-1.0.pom.asc".to_string()],
    };
    assert_eq!(
        err.to_string(),
        "Missing artifacts: app-1.0.pom, app-1.0.pom.asc"
    );
}

#[test]
fn test_packaging_error_display() {
    let err = ReleaseError::Packaging {
        message: "disk full".to_string(),
    };
    assert_eq!(err.to_string(), "Packaging failed: disk full");
}

#[test]
fn test_network_error_display() {
    let err = ReleaseError::Network {
        message: "timeout".to_string(),
    };
    assert_eq!(err.to_string(), "Network error: timeout");
}

#[test]
fn test_upload_rejected_carries_status_reason_and_body() {
    let err = ReleaseError::UploadRejected {
        status: 500,
        reason: "Internal Server Error".to_string(),
        body: "server error".to_string(),
    };
    let msg = err.to_string();
    assert!(msg.contains("500"), "got: {msg}");
    assert!(msg.contains("Internal Server Error"), "got: {msg}");
    assert!(msg.contains("server error"), "got: {msg}");
}

#[test]
fn test_signing_error_display() {
    let err = ReleaseError::Signing {
        message: "gpg not found".to_string(),
    };
    assert_eq!(err.to_string(), "Signing failed: gpg not found");
}

#[test]
fn test_io_error_from_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let err: ReleaseError = io_err.into();
    assert!(matches!(err, ReleaseError::Io(_)));
}
