use std::sync::Arc;

use axum::{
    Json, Router,
    http::{HeaderValue, Method, StatusCode, header},
    middleware,
    response::IntoResponse,
    routing::get,
};
use tower_http::{
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, info};

use crate::api::StatusResponse;
use crate::auth::{CredentialCheck, require_bearer_token};
use crate::bookmarks;
use crate::config::Environment;
use crate::error::render_server_errors;
use crate::store::BookmarkStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BookmarkStore>,
    pub credentials: Arc<dyn CredentialCheck>,
    pub environment: Environment,
}

pub async fn healthcheck() -> impl IntoResponse {
    info!("got healthcheck request");
    Json(StatusResponse::new_from_msg("ok"))
}

async fn fallback() -> StatusCode {
    StatusCode::NOT_FOUND
}

/// Builds the full service. The bearer token gate wraps every route,
/// including unknown paths, so nothing reaches the store unauthenticated.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers(Any);

    Router::new()
        .route("/", get(healthcheck))
        .nest(bookmarks::BASE_PATH, bookmarks::routes(state.clone()))
        .fallback(fallback)
        .layer(middleware::from_fn_with_state(state.environment, render_server_errors))
        .layer(middleware::from_fn_with_state(state.credentials.clone(), require_bearer_token))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::Mutex;

    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;
    use tracing_subscriber::EnvFilter;

    use super::*;
    use crate::auth::StaticBearerToken;
    use crate::store::MemoryStore;

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn lines_containing(&self, needle: &str) -> usize {
            let buf = self.0.lock().unwrap();
            String::from_utf8_lossy(&buf).lines().filter(|l| l.contains(needle)).count()
        }
    }

    #[tokio::test]
    async fn requests_are_logged_at_info() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_env_filter(EnvFilter::new("info"))
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let router = app(AppState {
            store: Arc::new(MemoryStore::new()),
            credentials: Arc::new(StaticBearerToken::new("secret")),
            environment: Environment::Development,
        });

        for uri in ["/bookmarks", "/bookmarks/42"] {
            let request = Request::builder()
                .uri(uri)
                .header(header::AUTHORIZATION, "Bearer secret")
                .body(Body::empty())
                .unwrap();
            router.clone().oneshot(request).await.unwrap();
        }

        assert_eq!(logs.lines_containing("finished processing request"), 2);
    }
}
