use axum::{
    Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::api::{DebugErrorResponse, ErrorResponse, UnauthorizedResponse};
use crate::config::Environment;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing '{0}' in request body")]
    MissingField(&'static str),
    #[error("Invalid data")]
    InvalidData,
    #[error("Request body must contain either 'title', 'url', 'description' or 'rating'")]
    EmptyUpdate,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] libsql::Error),
    #[error("{0} returned no row")]
    MissingRow(&'static str),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized request")]
    Unauthorized,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Malformed request body: {0}")]
    MalformedBody(String),
    #[error("Bookmark doesn't exist")]
    NotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Details of a 500, carried in the response extensions so that
/// [`render_server_errors`] can expose them outside production.
#[derive(Debug, Clone)]
pub struct ServerErrorDetail {
    pub message: String,
    pub chain: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        use ApiError::*;
        match self {
            Unauthorized => StatusCode::UNAUTHORIZED,
            Validation(_) | MalformedBody(_) => StatusCode::BAD_REQUEST,
            NotFound => StatusCode::NOT_FOUND,
            Store(_) | Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Unauthorized => (status, Json(UnauthorizedResponse::new())).into_response(),
            ApiError::Store(_) | ApiError::Internal(_) => {
                let detail = ServerErrorDetail {
                    message: self.to_string(),
                    chain: crate::unpack_error(&self),
                };
                tracing::error!(error = %detail.chain, "request failed");

                let mut response = (status, Json(ErrorResponse::new("server error"))).into_response();
                response.extensions_mut().insert(detail);
                response
            }
            other => (status, Json(ErrorResponse::new(&other.to_string()))).into_response(),
        }
    }
}

/// Swaps the generic 500 body for one carrying the error text when not in production.
pub async fn render_server_errors(State(environment): State<Environment>, request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    if environment.is_production() {
        return response;
    }

    match response.extensions().get::<ServerErrorDetail>().cloned() {
        Some(detail) => (
            response.status(),
            Json(DebugErrorResponse {
                message: detail.message,
                error: detail.chain,
            }),
        )
            .into_response(),
        None => response,
    }
}
