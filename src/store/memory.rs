use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::BookmarkStore;
use crate::error::StoreError;
use crate::model::{Bookmark, BookmarkPatch, NewBookmark};

#[derive(Debug, Default)]
struct Rows {
    last_id: i64,
    // keyed by id, so iteration order is insertion order
    by_id: BTreeMap<i64, Bookmark>,
}

/// Process local store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: RwLock<Rows>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with rows that already carry ids. Later inserts
    /// continue after the largest seeded id.
    pub fn with_bookmarks(bookmarks: Vec<Bookmark>) -> Self {
        let last_id = bookmarks.iter().map(|b| b.id).max().unwrap_or(0);
        let by_id = bookmarks.into_iter().map(|b| (b.id, b)).collect();
        MemoryStore {
            rows: RwLock::new(Rows { last_id, by_id }),
        }
    }
}

#[async_trait]
impl BookmarkStore for MemoryStore {
    async fn list_all(&self) -> Result<Vec<Bookmark>, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows.by_id.values().cloned().collect())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Bookmark>, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows.by_id.get(&id).cloned())
    }

    async fn insert(&self, bookmark: NewBookmark) -> Result<Bookmark, StoreError> {
        let mut rows = self.rows.write().await;
        rows.last_id += 1;

        let created = Bookmark {
            id: rows.last_id,
            title: bookmark.title,
            url: bookmark.url,
            description: bookmark.description,
            rating: bookmark.rating,
        };
        rows.by_id.insert(created.id, created.clone());
        Ok(created)
    }

    async fn remove(&self, id: i64) -> Result<u64, StoreError> {
        let mut rows = self.rows.write().await;
        Ok(rows.by_id.remove(&id).map_or(0, |_| 1))
    }

    async fn update(&self, id: i64, patch: BookmarkPatch) -> Result<u64, StoreError> {
        let mut rows = self.rows.write().await;
        match rows.by_id.get_mut(&id) {
            Some(bookmark) => {
                patch.apply_to(bookmark);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}
