use std::error::Error;

pub mod api;
pub mod auth;
pub mod bookmarks;
pub mod config;
pub mod error;
pub mod handler;
pub mod model;
pub mod sanitize;
pub mod store;
pub mod validate;

pub fn unpack_error(err: &(dyn Error)) -> String {
    let mut parts = Vec::new();
    parts.push(err.to_string());
    let mut current = err.source();
    while let Some(source) = current {
        parts.push(source.to_string());
        current = source.source();
    }
    parts.join(": ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ApiError, StoreError};

    #[test]
    fn unpack_error_walks_the_source_chain() {
        let err = ApiError::Internal(anyhow::anyhow!("connection reset").context("listing bookmarks"));
        assert_eq!(unpack_error(&err), "listing bookmarks: connection reset");

        let err = ApiError::Store(StoreError::MissingRow("insert"));
        assert_eq!(unpack_error(&err), "insert returned no row");
    }
}
