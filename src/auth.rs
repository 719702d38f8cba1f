//! Bearer token gate for every route.
//!
//! The check itself sits behind [`CredentialCheck`] so the static shared
//! secret can later be swapped for signed tokens or per client keys without
//! touching the handlers.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;

use crate::error::ApiError;

pub trait CredentialCheck: Send + Sync {
    fn verify(&self, token: Option<&str>) -> bool;
}

/// A single out of band secret. An empty secret never matches.
pub struct StaticBearerToken {
    expected: String,
}

impl StaticBearerToken {
    pub fn new(expected: impl Into<String>) -> Self {
        StaticBearerToken {
            expected: expected.into(),
        }
    }
}

impl CredentialCheck for StaticBearerToken {
    fn verify(&self, token: Option<&str>) -> bool {
        match token {
            Some(token) if !self.expected.is_empty() => token.as_bytes().ct_eq(self.expected.as_bytes()).into(),
            _ => false,
        }
    }
}

/// The text after the first space of the `Authorization` header, up to the next space.
/// Accepts both `Bearer <token>` and `Bearer: <token>`.
pub fn extract_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .split(' ')
        .nth(1)
}

pub async fn require_bearer_token(
    State(credentials): State<Arc<dyn CredentialCheck>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !credentials.verify(extract_token(request.headers())) {
        tracing::error!(path = %request.uri().path(), "unauthorized request");
        return Err(ApiError::Unauthorized);
    }

    Ok(next.run(request).await)
}
