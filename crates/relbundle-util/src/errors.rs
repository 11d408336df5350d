use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for every stage of the release pipeline.
#[derive(Debug, Error, Diagnostic)]
pub enum ReleaseError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A required setting or secret is missing or invalid.
    #[error("Configuration error: {message}")]
    #[diagnostic(help("Check bundle.toml, .release.env and the process environment"))]
    Configuration { message: String },

    /// One or more expected input files are absent.
    #[error("Missing artifacts: {}", missing.join(", "))]
    #[diagnostic(help("Run the build and signing steps before assembling the bundle"))]
    MissingArtifact { missing: Vec<String> },

    /// Creating or reading the bundle archive failed.
    #[error("Packaging failed: {message}")]
    Packaging { message: String },

    /// Detached signing of an artifact failed.
    #[error("Signing failed: {message}")]
    #[diagnostic(help("Make sure gpg is installed and SIGNING_KEY / SIGNING_PASSWORD are set"))]
    Signing { message: String },

    /// The request never produced an HTTP response.
    #[error("Network error: {message}")]
    Network { message: String },

    /// The publishing endpoint answered with a non-2xx status.
    #[error("Failed to upload bundle: {status} {reason}\n{body}")]
    UploadRejected {
        status: u16,
        reason: String,
        body: String,
    },
}
