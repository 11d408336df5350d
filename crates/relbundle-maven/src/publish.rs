//! Uploading the deployment bundle to the publisher API.
//!
//! One multipart POST per attempt, carrying the archive in a `bundle` field.
//! The outcome is decided by the status code alone. Retries are opt-in and
//! only cover failures where no HTTP response arrived.

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use hyper::ext::ReasonPhrase;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use secrecy::SecretString;

use relbundle_util::errors::ReleaseError;
use relbundle_util::fs::file_name_string;

use crate::auth;

/// Multipart field that carries the archive.
pub const BUNDLE_FIELD: &str = "bundle";

/// Content type of the archive part.
pub const BUNDLE_CONTENT_TYPE: &str = "application/octet-stream";

/// A fully built upload request.
#[derive(Debug)]
pub struct UploadRequest {
    pub url: String,
    pub bearer_token: SecretString,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Status line and body of the publisher's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResponse {
    pub status: u16,
    pub reason: String,
    pub body: String,
}

impl UploadResponse {
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

/// Failure to obtain any HTTP response.
#[derive(Debug, Clone)]
pub struct TransportError {
    pub message: String,
    /// Timeouts and connection failures; worth another attempt.
    pub transient: bool,
}

/// Sends an [`UploadRequest`] and returns whatever the server answered.
pub trait UploadTransport {
    fn send(
        &self,
        request: &UploadRequest,
    ) -> impl Future<Output = Result<UploadResponse, TransportError>> + Send;
}

/// Production transport backed by `reqwest`.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a client whose every request is bounded by `timeout`.
    pub fn new(timeout: Duration) -> miette::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("relbundle/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ReleaseError::Network {
                message: format!("Failed to create HTTP client: {e}"),
            })?;
        Ok(Self { client })
    }
}

impl UploadTransport for ReqwestTransport {
    async fn send(&self, request: &UploadRequest) -> Result<UploadResponse, TransportError> {
        let part = Part::bytes(request.bytes.clone())
            .file_name(request.file_name.clone())
            .mime_str(BUNDLE_CONTENT_TYPE)
            .map_err(|e| TransportError {
                message: format!("Invalid content type: {e}"),
                transient: false,
            })?;
        let form = Form::new().part(BUNDLE_FIELD, part);

        let req = auth::apply_bearer(self.client.post(&request.url), &request.bearer_token);
        let resp = req.multipart(form).send().await.map_err(|e| TransportError {
            transient: e.is_timeout() || e.is_connect(),
            message: format!("Request to {} failed: {e}", request.url),
        })?;

        let status = resp.status();
        let reason = reason_phrase(status, resp.extensions().get::<ReasonPhrase>());
        let body = resp.text().await.map_err(|e| TransportError {
            transient: e.is_timeout(),
            message: format!("Failed to read response from {}: {e}", request.url),
        })?;

        Ok(UploadResponse {
            status: status.as_u16(),
            reason,
            body,
        })
    }
}

/// The reason phrase the server sent, or the standard one for `status`.
///
/// The HTTP client only records the phrase when it differs from the standard one.
fn reason_phrase(status: StatusCode, sent: Option<&ReasonPhrase>) -> String {
    match sent {
        Some(phrase) => String::from_utf8_lossy(phrase.as_bytes()).into_owned(),
        None => status.canonical_reason().unwrap_or("").to_string(),
    }
}

/// How many extra attempts a transient failure earns, and the pause between them.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub retries: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    /// Send exactly once.
    pub fn none() -> Self {
        Self {
            retries: 0,
            delay: Duration::ZERO,
        }
    }

    pub fn new(retries: u32) -> Self {
        Self {
            retries,
            delay: Duration::from_secs(2),
        }
    }
}

/// Progress of a single upload invocation.
///
/// `Sent` is entered as soon as the request is handed to the transport, so
/// every attempt that reaches the network passes through it before
/// `Succeeded` or `Failed`. Precondition failures stay in `NotStarted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    NotStarted,
    RequestBuilt,
    Sent,
    Succeeded,
    Failed,
}

/// Drives one upload through [`UploadState`] using a pluggable transport.
pub struct Uploader<T> {
    transport: T,
    policy: RetryPolicy,
    trail: Vec<UploadState>,
}

impl<T: UploadTransport> Uploader<T> {
    pub fn new(transport: T, policy: RetryPolicy) -> Self {
        Self {
            transport,
            policy,
            trail: vec![UploadState::NotStarted],
        }
    }

    pub fn state(&self) -> UploadState {
        self.trail.last().copied().unwrap_or(UploadState::NotStarted)
    }

    /// Every state this upload has been in, oldest first.
    pub fn trail(&self) -> &[UploadState] {
        &self.trail
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Upload `bundle` to `endpoint`.
    ///
    /// Fails before any network activity if the bundle is absent or the token
    /// is blank. Prints the request and the response to stdout.
    pub async fn upload(
        &mut self,
        bundle: &Path,
        bearer_token: SecretString,
        endpoint: &str,
    ) -> miette::Result<UploadResponse> {
        if !bundle.is_file() {
            return Err(ReleaseError::MissingArtifact {
                missing: vec![format!("deployment bundle {}", bundle.display())],
            }
            .into());
        }
        if !auth::is_usable(&bearer_token) {
            return Err(ReleaseError::Configuration {
                message: "Bearer token is empty; set BEARER_TOKEN".to_string(),
            }
            .into());
        }

        let request = UploadRequest {
            url: endpoint.to_string(),
            bearer_token,
            file_name: file_name_string(bundle),
            bytes: std::fs::read(bundle).map_err(ReleaseError::Io)?,
        };
        self.transition(UploadState::RequestBuilt);
        print_request(&request, bundle);

        println!("\n===== Sending Request =====");
        self.transition(UploadState::Sent);
        let response = match self.send_with_retries(&request).await {
            Ok(response) => response,
            Err(e) => {
                self.transition(UploadState::Failed);
                return Err(ReleaseError::Network { message: e.message }.into());
            }
        };
        print_response(&response);

        if response.is_success() {
            self.transition(UploadState::Succeeded);
            Ok(response)
        } else {
            self.transition(UploadState::Failed);
            Err(ReleaseError::UploadRejected {
                status: response.status,
                reason: response.reason,
                body: response.body,
            }
            .into())
        }
    }

    async fn send_with_retries(
        &self,
        request: &UploadRequest,
    ) -> Result<UploadResponse, TransportError> {
        let mut attempt = 0;
        loop {
            match self.transport.send(request).await {
                Ok(response) => return Ok(response),
                Err(e) if e.transient && attempt < self.policy.retries => {
                    attempt += 1;
                    tracing::warn!(
                        "Upload attempt {attempt} failed ({}); retrying",
                        e.message
                    );
                    tokio::time::sleep(self.policy.delay * attempt).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn transition(&mut self, next: UploadState) {
        tracing::debug!("Upload state {:?} -> {:?}", self.state(), next);
        self.trail.push(next);
    }
}

fn print_request(request: &UploadRequest, bundle: &Path) {
    println!("===== HTTP Request =====");
    println!("URL: {}", request.url);
    println!("Method: POST");
    println!("  Authorization: {}", auth::masked_authorization());
    println!("Uploading file: {}", bundle.display());
    println!("File size: {} bytes", request.bytes.len());
}

fn print_response(response: &UploadResponse) {
    println!("\n===== HTTP Response =====");
    println!("Status Code: {}", response.status);
    println!("Reason Phrase: {}", response.reason);
    println!("Response Body: {}", response.body);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_range_is_inclusive() {
        let resp = |status| UploadResponse {
            status,
            reason: String::new(),
            body: String::new(),
        };
        assert!(resp(200).is_success());
        assert!(resp(201).is_success());
        assert!(resp(299).is_success());
        assert!(!resp(199).is_success());
        assert!(!resp(300).is_success());
        assert!(!resp(404).is_success());
    }

    #[test]
    fn reason_phrase_prefers_what_the_server_sent() {
        let sent = ReasonPhrase::from_static(b"Deployment Accepted");
        assert_eq!(
            reason_phrase(StatusCode::CREATED, Some(&sent)),
            "Deployment Accepted"
        );
        assert_eq!(reason_phrase(StatusCode::CREATED, None), "Created");
        assert_eq!(reason_phrase(StatusCode::from_u16(599).unwrap(), None), "");
    }

    #[test]
    fn retry_policy_none_sends_once() {
        let policy = RetryPolicy::none();
        assert_eq!(policy.retries, 0);
        assert_eq!(policy.delay, Duration::ZERO);
    }
}
