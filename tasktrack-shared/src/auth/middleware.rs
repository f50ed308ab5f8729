//! Authenticated request context
//!
//! The API's auth layer validates the `Authorization: Bearer <token>` header
//! and inserts an [`AuthContext`] into the request extensions. Handlers take
//! it as `Extension<AuthContext>` and pass it explicitly into the task
//! service; nothing reads the caller's identity from ambient state.
//!
//! # Example
//!
//! ```
//! use axum::Extension;
//! use tasktrack_shared::auth::middleware::AuthContext;
//!
//! async fn handler(Extension(auth): Extension<AuthContext>) -> String {
//!     format!("User: {}", auth.username)
//! }
//! ```

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};

use super::jwt::Claims;

/// Identity derived from a validated session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated username
    pub username: String,
}

impl AuthContext {
    /// Creates a context for `username`
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }

    /// Creates a context from validated claims
    pub fn from_claims(claims: Claims) -> Self {
        Self { username: claims.sub }
    }
}

/// Reads the raw `Authorization` header, if present and valid UTF-8
pub fn authorization_header(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
}

/// Extracts the token from a `Bearer <token>` header value
///
/// The scheme is matched case-insensitively; surrounding whitespace around the
/// token is ignored. Returns `None` for any other scheme or an empty token.
pub fn parse_bearer(header_value: &str) -> Option<&str> {
    let (scheme, token) = header_value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}
