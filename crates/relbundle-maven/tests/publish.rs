use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use relbundle_maven::publish::{
    ReqwestTransport, RetryPolicy, TransportError, UploadRequest, UploadResponse, UploadState,
    UploadTransport, Uploader,
};
use relbundle_util::errors::ReleaseError;
use secrecy::{ExposeSecret, SecretString};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Scripted transport that records every request it is asked to send.
struct StubTransport {
    replies: Mutex<Vec<Result<UploadResponse, TransportError>>>,
    calls: AtomicUsize,
    seen: Mutex<Vec<(String, String, String, usize)>>,
}

impl StubTransport {
    fn new(replies: Vec<Result<UploadResponse, TransportError>>) -> Self {
        Self {
            replies: Mutex::new(replies),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn responding(status: u16, reason: &str, body: &str) -> Self {
        Self::new(vec![Ok(UploadResponse {
            status,
            reason: reason.to_string(),
            body: body.to_string(),
        })])
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl UploadTransport for StubTransport {
    async fn send(&self, request: &UploadRequest) -> Result<UploadResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push((
            request.url.clone(),
            request.bearer_token.expose_secret().to_string(),
            request.file_name.clone(),
            request.bytes.len(),
        ));
        let mut replies = self.replies.lock().unwrap();
        assert!(!replies.is_empty(), "stub called more often than scripted");
        replies.remove(0)
    }
}

fn transient() -> Result<UploadResponse, TransportError> {
    Err(TransportError {
        message: "connection refused".to_string(),
        transient: true,
    })
}

fn bundle_file(tmp: &TempDir) -> PathBuf {
    let path = tmp.path().join("io.github.lionh-releasedemo-1.0.0-bundle.zip");
    fs::write(&path, b"PK\x03\x04 fake bundle").unwrap();
    path
}

fn token(value: &str) -> SecretString {
    SecretString::new(value.into())
}

fn quick_retries(retries: u32) -> RetryPolicy {
    RetryPolicy {
        retries,
        delay: Duration::from_millis(1),
    }
}

#[tokio::test]
async fn test_missing_bundle_fails_without_network() {
    let tmp = TempDir::new().unwrap();
    let mut uploader = Uploader::new(StubTransport::new(vec![]), RetryPolicy::none());

    let err = uploader
        .upload(
            &tmp.path().join("absent.zip"),
            token("tok"),
            "https://example.com/upload",
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ReleaseError>(),
        Some(ReleaseError::MissingArtifact { .. })
    ));
    assert_eq!(uploader.transport().calls(), 0);
    assert_eq!(uploader.state(), UploadState::NotStarted);
    assert_eq!(uploader.trail(), &[UploadState::NotStarted]);
}

#[tokio::test]
async fn test_empty_token_fails_without_network() {
    let tmp = TempDir::new().unwrap();
    let bundle = bundle_file(&tmp);
    let mut uploader = Uploader::new(StubTransport::new(vec![]), RetryPolicy::none());

    let err = uploader
        .upload(&bundle, token(""), "https://example.com/upload")
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ReleaseError>(),
        Some(ReleaseError::Configuration { .. })
    ));
    assert_eq!(uploader.transport().calls(), 0);
}

#[tokio::test]
async fn test_created_response_is_success() {
    let tmp = TempDir::new().unwrap();
    let bundle = bundle_file(&tmp);
    let mut uploader = Uploader::new(
        StubTransport::responding(201, "Created", "ok"),
        RetryPolicy::none(),
    );

    let response = uploader
        .upload(&bundle, token("tok-1"), "https://example.com/upload")
        .await
        .unwrap();

    assert_eq!(response.status, 201);
    assert_eq!(response.body, "ok");
    assert_eq!(
        uploader.trail(),
        &[
            UploadState::NotStarted,
            UploadState::RequestBuilt,
            UploadState::Sent,
            UploadState::Succeeded,
        ]
    );
    let seen = uploader.transport().seen.lock().unwrap().clone();
    assert_eq!(
        seen,
        vec![(
            "https://example.com/upload".to_string(),
            "tok-1".to_string(),
            "io.github.lionh-releasedemo-1.0.0-bundle.zip".to_string(),
            fs::metadata(&bundle).unwrap().len() as usize,
        )]
    );
}

#[tokio::test]
async fn test_server_error_surfaces_status_and_body() {
    let tmp = TempDir::new().unwrap();
    let bundle = bundle_file(&tmp);
    let mut uploader = Uploader::new(
        StubTransport::responding(500, "Internal Server Error", "server error"),
        quick_retries(3),
    );

    let err = uploader
        .upload(&bundle, token("tok"), "https://example.com/upload")
        .await
        .unwrap_err();

    let msg = err.to_string();
    assert!(msg.contains("500"), "got: {msg}");
    assert!(msg.contains("server error"), "got: {msg}");
    assert_eq!(
        uploader.trail(),
        &[
            UploadState::NotStarted,
            UploadState::RequestBuilt,
            UploadState::Sent,
            UploadState::Failed,
        ]
    );
    assert_eq!(uploader.transport().calls(), 1, "HTTP errors are never retried");
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let tmp = TempDir::new().unwrap();
    let bundle = bundle_file(&tmp);
    let mut uploader = Uploader::new(
        StubTransport::responding(401, "Unauthorized", "bad token"),
        quick_retries(2),
    );

    let err = uploader
        .upload(&bundle, token("tok"), "https://example.com/upload")
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ReleaseError>(),
        Some(ReleaseError::UploadRejected { status: 401, .. })
    ));
    assert_eq!(uploader.transport().calls(), 1);
}

#[tokio::test]
async fn test_transient_failure_retried_until_success() {
    let tmp = TempDir::new().unwrap();
    let bundle = bundle_file(&tmp);
    let stub = StubTransport::new(vec![
        transient(),
        Ok(UploadResponse {
            status: 200,
            reason: "OK".to_string(),
            body: "deployment-id".to_string(),
        }),
    ]);
    let mut uploader = Uploader::new(stub, quick_retries(2));

    let response = uploader
        .upload(&bundle, token("tok"), "https://example.com/upload")
        .await
        .unwrap();
    assert_eq!(response.body, "deployment-id");
    assert_eq!(uploader.transport().calls(), 2);
}

#[tokio::test]
async fn test_retries_are_capped() {
    let tmp = TempDir::new().unwrap();
    let bundle = bundle_file(&tmp);
    let stub = StubTransport::new(vec![transient(), transient(), transient()]);
    let mut uploader = Uploader::new(stub, quick_retries(2));

    let err = uploader
        .upload(&bundle, token("tok"), "https://example.com/upload")
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ReleaseError>(),
        Some(ReleaseError::Network { .. })
    ));
    assert_eq!(uploader.transport().calls(), 3);
    assert_eq!(
        uploader.trail(),
        &[
            UploadState::NotStarted,
            UploadState::RequestBuilt,
            UploadState::Sent,
            UploadState::Failed,
        ]
    );
}

#[tokio::test]
async fn test_default_policy_sends_once() {
    let tmp = TempDir::new().unwrap();
    let bundle = bundle_file(&tmp);
    let mut uploader = Uploader::new(StubTransport::new(vec![transient()]), RetryPolicy::none());

    assert!(uploader
        .upload(&bundle, token("tok"), "https://example.com/upload")
        .await
        .is_err());
    assert_eq!(uploader.transport().calls(), 1);
}

/// Accept one connection, capture the raw request, answer with `status` and `body`.
async fn serve_once(listener: TcpListener, status_line: &'static str, body: &'static str) -> String {
    let (mut socket, _) = listener.accept().await.unwrap();
    let mut raw = Vec::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = socket.read(&mut buf).await.unwrap();
        if n == 0 {
            break;
        }
        raw.extend_from_slice(&buf[..n]);
        if request_complete(&raw) {
            break;
        }
    }
    let response = format!(
        "HTTP/1.1 {status_line}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    );
    socket.write_all(response.as_bytes()).await.unwrap();
    socket.shutdown().await.unwrap();
    String::from_utf8_lossy(&raw).into_owned()
}

fn request_complete(raw: &[u8]) -> bool {
    let text = String::from_utf8_lossy(raw);
    let Some(header_end) = text.find("\r\n\r\n") else {
        return false;
    };
    let length = text[..header_end]
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);
    raw.len() >= header_end + 4 + length
}

#[tokio::test]
async fn test_reqwest_transport_sends_multipart_bundle() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/api/v1/publisher/upload", listener.local_addr().unwrap());
    let server = tokio::spawn(serve_once(listener, "201 Created", "deployment-42"));

    let tmp = TempDir::new().unwrap();
    let bundle = bundle_file(&tmp);
    let transport = ReqwestTransport::new(Duration::from_secs(10)).unwrap();
    let mut uploader = Uploader::new(transport, RetryPolicy::none());

    let response = uploader.upload(&bundle, token("tok-xyz"), &url).await.unwrap();
    assert_eq!(response.status, 201);
    assert_eq!(response.reason, "Created");
    assert_eq!(response.body, "deployment-42");

    let raw = server.await.unwrap();
    assert!(raw.starts_with("POST /api/v1/publisher/upload"), "got: {raw}");
    let lower = raw.to_ascii_lowercase();
    assert!(lower.contains("authorization: bearer tok-xyz"), "got: {raw}");
    assert!(lower.contains("content-type: multipart/form-data"), "got: {raw}");
    assert!(raw.contains("name=\"bundle\""), "got: {raw}");
    assert!(
        raw.contains("filename=\"io.github.lionh-releasedemo-1.0.0-bundle.zip\""),
        "got: {raw}"
    );
    assert!(lower.contains("content-type: application/octet-stream"), "got: {raw}");
    assert!(raw.contains("fake bundle"), "got: {raw}");
}

#[tokio::test]
async fn test_reqwest_transport_reports_rejection() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/upload", listener.local_addr().unwrap());
    let server = tokio::spawn(serve_once(listener, "500 Internal Server Error", "server error"));

    let tmp = TempDir::new().unwrap();
    let bundle = bundle_file(&tmp);
    let transport = ReqwestTransport::new(Duration::from_secs(10)).unwrap();
    let mut uploader = Uploader::new(transport, RetryPolicy::none());

    let err = uploader.upload(&bundle, token("tok"), &url).await.unwrap_err();
    server.await.unwrap();
    let msg = err.to_string();
    assert!(msg.contains("500"), "got: {msg}");
    assert!(msg.contains("Internal Server Error"), "got: {msg}");
    assert!(msg.contains("server error"), "got: {msg}");
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/upload", listener.local_addr().unwrap());
    drop(listener);

    let tmp = TempDir::new().unwrap();
    let bundle = bundle_file(&tmp);
    let transport = ReqwestTransport::new(Duration::from_secs(5)).unwrap();
    let mut uploader = Uploader::new(transport, RetryPolicy::none());

    let err = uploader.upload(&bundle, token("tok"), &url).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ReleaseError>(),
        Some(ReleaseError::Network { .. })
    ));
    assert_eq!(
        uploader.trail(),
        &[
            UploadState::NotStarted,
            UploadState::RequestBuilt,
            UploadState::Sent,
            UploadState::Failed,
        ]
    );
}

#[tokio::test]
async fn test_reqwest_transport_keeps_server_reason_phrase() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/upload", listener.local_addr().unwrap());
    let server = tokio::spawn(serve_once(listener, "202 Queued For Validation", "deployment-7"));

    let tmp = TempDir::new().unwrap();
    let bundle = bundle_file(&tmp);
    let transport = ReqwestTransport::new(Duration::from_secs(10)).unwrap();
    let mut uploader = Uploader::new(transport, RetryPolicy::none());

    let response = uploader.upload(&bundle, token("tok"), &url).await.unwrap();
    server.await.unwrap();
    assert_eq!(response.status, 202);
    assert_eq!(response.reason, "Queued For Validation");
    assert_eq!(response.body, "deployment-7");
}

#[tokio::test]
async fn test_reqwest_transport_reports_custom_rejection_phrase() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/upload", listener.local_addr().unwrap());
    let server = tokio::spawn(serve_once(listener, "400 Bundle Validation Failed", "bad pom"));

    let tmp = TempDir::new().unwrap();
    let bundle = bundle_file(&tmp);
    let transport = ReqwestTransport::new(Duration::from_secs(10)).unwrap();
    let mut uploader = Uploader::new(transport, RetryPolicy::none());

    let err = uploader.upload(&bundle, token("tok"), &url).await.unwrap_err();
    server.await.unwrap();
    let msg = err.to_string();
    assert!(msg.contains("400 Bundle Validation Failed"), "got: {msg}");
    assert!(msg.contains("bad pom"), "got: {msg}");
}
