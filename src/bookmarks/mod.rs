//! Bookmarks resource
//!
//! CRUD over the `bookmarks` table:
//!
//! - `GET    /bookmarks`      list, sanitized
//! - `POST   /bookmarks`      create, `201` with `Location: /bookmarks/{id}`
//! - `GET    /bookmarks/:id`  fetch, sanitized
//! - `DELETE /bookmarks/:id`  delete, `204`
//! - `PATCH  /bookmarks/:id`  partial update, `204`
//!
//! The `:id` routes share one existence lookup: [`handler::load_bookmark`]
//! runs as a route layer, answers `404` for unknown ids and hands the loaded
//! row to the handler through the request extensions.
//!
//! # Usage
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .nest("/bookmarks", bookmarks::routes(state.clone()))
//!     .with_state(state);
//! ```

mod handler;
mod routes;

pub use handler::JsonBody;
pub use routes::routes;

/// Canonical base path of the resource, also used to build `Location` headers.
pub const BASE_PATH: &str = "/bookmarks";
