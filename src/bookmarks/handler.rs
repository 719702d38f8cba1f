//! HTTP handlers for the bookmarks resource

use axum::{
    Extension, Json, async_trait,
    body::Bytes,
    extract::{FromRequest, Path, Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

use super::BASE_PATH;
use crate::error::ApiError;
use crate::handler::AppState;
use crate::model::{Bookmark, BookmarkPayload};
use crate::sanitize::sanitize_bookmark;
use crate::validate::{validate_new, validate_patch};

/// JSON body extractor that ignores the content type and reads an empty body
/// as `T::default()`, so a bare PATCH reaches validation instead of failing
/// extraction. Anything but a JSON object, and any syntax or type error,
/// becomes a 400.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::MalformedBody(e.body_text()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(JsonBody(T::default()));
        }

        let value: serde_json::Value =
            serde_json::from_slice(&bytes).map_err(|e| ApiError::MalformedBody(e.to_string()))?;
        // derived Deserialize also takes sequences by position
        if !value.is_object() {
            return Err(ApiError::MalformedBody("expected a JSON object".to_string()));
        }

        serde_json::from_value(value)
            .map(JsonBody)
            .map_err(|e| ApiError::MalformedBody(e.to_string()))
    }
}

// ============================================================================
// Existence lookup shared by the `:id` routes
// ============================================================================

pub async fn load_bookmark(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // a non-numeric id can never match a row
    let found = match raw_id.parse::<i64>() {
        Ok(id) => state.store.get_by_id(id).await?,
        Err(_) => None,
    };

    let Some(bookmark) = found else {
        tracing::warn!(id = %raw_id, "bookmark not found");
        return Err(ApiError::NotFound);
    };

    request.extensions_mut().insert(bookmark);
    Ok(next.run(request).await)
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn list_bookmarks(State(state): State<AppState>) -> Result<Json<Vec<Bookmark>>, ApiError> {
    let bookmarks = state.store.list_all().await?;
    Ok(Json(bookmarks.into_iter().map(sanitize_bookmark).collect()))
}

pub async fn get_bookmark(Extension(bookmark): Extension<Bookmark>) -> Json<Bookmark> {
    Json(sanitize_bookmark(bookmark))
}

pub async fn create_bookmark(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<BookmarkPayload>,
) -> Result<Response, ApiError> {
    let new_bookmark = validate_new(payload).inspect_err(|e| {
        tracing::warn!(error = %e, "rejected bookmark create");
    })?;

    let created = state.store.insert(new_bookmark).await?;
    tracing::info!(id = created.id, "bookmark created");

    let location = format!("{}/{}", BASE_PATH, created.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(sanitize_bookmark(created)),
    )
        .into_response())
}

pub async fn delete_bookmark(
    State(state): State<AppState>,
    Extension(bookmark): Extension<Bookmark>,
) -> Result<StatusCode, ApiError> {
    // a concurrent delete between lookup and here leaves 0 rows; still a 204
    let removed = state.store.remove(bookmark.id).await?;
    tracing::info!(id = bookmark.id, removed, "bookmark deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_bookmark(
    State(state): State<AppState>,
    Extension(bookmark): Extension<Bookmark>,
    JsonBody(payload): JsonBody<BookmarkPayload>,
) -> Result<StatusCode, ApiError> {
    let patch = validate_patch(payload).inspect_err(|e| {
        tracing::warn!(id = bookmark.id, error = %e, "rejected bookmark update");
    })?;

    let updated = state.store.update(bookmark.id, patch).await?;
    tracing::info!(id = bookmark.id, updated, "bookmark updated");
    Ok(StatusCode::NO_CONTENT)
}
