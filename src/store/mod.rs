//! Bookmark persistence.
//!
//! Handlers only see [`BookmarkStore`]. The concrete backend is chosen once at
//! startup from the `store.kind` config key: `memory` keeps rows in process,
//! `libsql` keeps them in a local file or a synced replica.
//!
//! Every call is a single round trip. Nothing is cached or retried, and backend
//! failures come back as [`StoreError`] untouched.

mod memory;
mod sql;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::config::{StoreConfig, StoreKind};
use crate::error::StoreError;
use crate::model::{Bookmark, BookmarkPatch, NewBookmark};

pub use memory::MemoryStore;
pub use sql::LibsqlStore;

#[async_trait]
pub trait BookmarkStore: Send + Sync {
    /// All rows in insertion order.
    async fn list_all(&self) -> Result<Vec<Bookmark>, StoreError>;
    async fn get_by_id(&self, id: i64) -> Result<Option<Bookmark>, StoreError>;
    async fn insert(&self, bookmark: NewBookmark) -> Result<Bookmark, StoreError>;
    /// Returns the number of rows removed, 0 when `id` does not exist.
    async fn remove(&self, id: i64) -> Result<u64, StoreError>;
    /// Writes only the columns present in `patch`. Returns the number of rows affected.
    async fn update(&self, id: i64, patch: BookmarkPatch) -> Result<u64, StoreError>;
}

pub async fn open(cfg: &StoreConfig, data_dir: &Path) -> Result<Arc<dyn BookmarkStore>> {
    match cfg.kind {
        StoreKind::Memory => {
            tracing::info!("[store] using in-memory bookmark store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreKind::Libsql => Ok(Arc::new(LibsqlStore::open(cfg, data_dir).await?)),
    }
}
