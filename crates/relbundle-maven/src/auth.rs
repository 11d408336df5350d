//! Publisher API authentication.
//!
//! The Central Publisher API takes a bearer token. The token lives in a
//! [`SecretString`] from configuration load until it is written into the
//! `Authorization` header, and is masked everywhere it is displayed.

use reqwest::RequestBuilder;
use secrecy::{ExposeSecret, SecretString};

/// What is printed in place of a secret value.
pub const MASK: &str = "********";

/// Attach `Authorization: Bearer <token>` to a request.
pub fn apply_bearer(request: RequestBuilder, token: &SecretString) -> RequestBuilder {
    request.bearer_auth(token.expose_secret())
}

/// Whether the token holds anything besides whitespace.
pub fn is_usable(token: &SecretString) -> bool {
    !token.expose_secret().trim().is_empty()
}

/// The `Authorization` header as it may be shown to an operator.
pub fn masked_authorization() -> String {
    format!("Bearer {MASK}")
}
