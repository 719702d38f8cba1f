use axum::{
    Router, middleware,
    routing::{delete, get, patch, post},
};

use super::handler;
use crate::handler::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let by_id = Router::new()
        .route("/:id", get(handler::get_bookmark))
        .route("/:id", delete(handler::delete_bookmark))
        .route("/:id", patch(handler::update_bookmark))
        .route_layer(middleware::from_fn_with_state(state, handler::load_bookmark));

    Router::new()
        .route("/", get(handler::list_bookmarks))
        .route("/", post(handler::create_bookmark))
        .merge(by_id)
}
