use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use libsql::{Builder, Connection, Database as LibsqlDatabase};

use super::BookmarkStore;
use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::model::{Bookmark, BookmarkPatch, NewBookmark};

const IN_MEMORY: &str = ":memory:";
const SCHEMA: &str = include_str!("schema.sql");

const SELECT_COLUMNS: &str = "SELECT id, title, url, description, rating FROM bookmarks";

pub struct LibsqlStore {
    db: LibsqlDatabase,
    conn: Connection,
    replica: bool,
}

impl LibsqlStore {
    pub fn is_replica(turso_url: &Option<String>, turso_auth_token: &Option<String>) -> bool {
        turso_url.is_some() && turso_auth_token.is_some()
    }

    /// Opens the configured database. A relative `database` path is resolved
    /// against `data_dir`. When both turso settings are present the file is a
    /// replica that syncs with the remote primary on `sync_interval_seconds`.
    pub async fn open(cfg: &StoreConfig, data_dir: &Path) -> Result<Self> {
        let path = if cfg.database == IN_MEMORY {
            Path::new(IN_MEMORY).to_path_buf()
        } else {
            data_dir.join(&cfg.database)
        };

        let db = match (&cfg.turso_url, &cfg.turso_auth_token) {
            (Some(url), Some(token)) => {
                tracing::info!("[store] running in synced database mode (offline writes)");
                let sync_interval = Duration::from_secs(cfg.sync_interval_seconds);
                Builder::new_synced_database(&path, url.clone(), token.clone())
                    .sync_interval(sync_interval)
                    .build()
                    .await?
            }
            _ => {
                tracing::info!(path = ?path, "[store] running against local database");
                Builder::new_local(&path).build().await?
            }
        };

        let store = Self::bootstrap(db, Self::is_replica(&cfg.turso_url, &cfg.turso_auth_token)).await?;
        store.sync().await?;
        Ok(store)
    }

    pub async fn in_memory() -> Result<Self> {
        let db = Builder::new_local(IN_MEMORY).build().await?;
        Self::bootstrap(db, false).await
    }

    async fn bootstrap(db: LibsqlDatabase, replica: bool) -> Result<Self> {
        let conn = db.connect()?;
        conn.query("SELECT 1", ()).await?;
        conn.execute_batch(SCHEMA)
            .await
            .map_err(|e| anyhow::anyhow!("failed to create bookmarks table: {e}"))?;

        Ok(LibsqlStore { db, conn, replica })
    }

    pub async fn sync(&self) -> Result<()> {
        if self.replica {
            self.db
                .sync()
                .await
                .map_err(|e| anyhow::anyhow!("sync failed: {}", e))?;
        }
        Ok(())
    }

    fn row_to_bookmark(row: &libsql::Row) -> Result<Bookmark, StoreError> {
        Ok(Bookmark {
            id: row.get(0)?,
            title: row.get(1)?,
            url: row.get(2)?,
            description: row.get(3)?,
            rating: row.get(4)?,
        })
    }
}

#[async_trait]
impl BookmarkStore for LibsqlStore {
    async fn list_all(&self) -> Result<Vec<Bookmark>, StoreError> {
        let query = format!("{SELECT_COLUMNS} ORDER BY id");
        let mut rows = self.conn.query(&query, ()).await?;
        let mut bookmarks = Vec::new();

        while let Some(row) = rows.next().await? {
            bookmarks.push(Self::row_to_bookmark(&row)?);
        }

        Ok(bookmarks)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Bookmark>, StoreError> {
        let query = format!("{SELECT_COLUMNS} WHERE id = ?");
        let mut rows = self.conn.query(&query, libsql::params![id]).await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(Self::row_to_bookmark(&row)?))
        } else {
            Ok(None)
        }
    }

    async fn insert(&self, bookmark: NewBookmark) -> Result<Bookmark, StoreError> {
        let query = r#"
            INSERT INTO bookmarks (title, url, description, rating)
            VALUES (?, ?, ?, ?)
            RETURNING id, title, url, description, rating
        "#;

        let mut rows = self
            .conn
            .query(
                query,
                libsql::params![bookmark.title, bookmark.url, bookmark.description, bookmark.rating],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Self::row_to_bookmark(&row),
            None => Err(StoreError::MissingRow("insert")),
        }
    }

    async fn remove(&self, id: i64) -> Result<u64, StoreError> {
        let removed = self
            .conn
            .execute("DELETE FROM bookmarks WHERE id = ?", libsql::params![id])
            .await?;
        Ok(removed)
    }

    async fn update(&self, id: i64, patch: BookmarkPatch) -> Result<u64, StoreError> {
        let mut updates = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(title) = patch.title {
            updates.push("title = ?");
            params.push(title.into());
        }
        if let Some(url) = patch.url {
            updates.push("url = ?");
            params.push(url.into());
        }
        if let Some(description) = patch.description {
            updates.push("description = ?");
            params.push(description.into());
        }
        if let Some(rating) = patch.rating {
            updates.push("rating = ?");
            params.push(rating.into());
        }

        if updates.is_empty() {
            return Ok(0);
        }
        params.push(id.into());

        let query = format!("UPDATE bookmarks SET {} WHERE id = ?", updates.join(", "));
        let affected = self.conn.execute(&query, params).await?;
        Ok(affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn schema_rejects_out_of_range_rating() {
        let store = LibsqlStore::in_memory().await.unwrap();
        let result = store
            .insert(NewBookmark {
                title: "t".to_string(),
                url: "u".to_string(),
                description: "d".to_string(),
                rating: 7,
            })
            .await;
        assert!(matches!(result, Err(StoreError::Database(_))));
    }

    #[tokio::test]
    async fn empty_patch_touches_nothing() {
        let store = LibsqlStore::in_memory().await.unwrap();
        assert_eq!(store.update(1, BookmarkPatch::default()).await.unwrap(), 0);
    }

    #[test]
    fn replica_mode_needs_both_settings() {
        assert!(LibsqlStore::is_replica(&Some("libsql://x".into()), &Some("t".into())));
        assert!(!LibsqlStore::is_replica(&Some("libsql://x".into()), &None));
        assert!(!LibsqlStore::is_replica(&None, &None));
    }
}
