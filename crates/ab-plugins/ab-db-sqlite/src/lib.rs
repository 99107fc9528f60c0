//! # ab-db-sqlite Implementation
//!
//! This module implements the mapping between the SQLite relational model
//! and the `ab-core` thread documents. Each thread is one row; its replies
//! are kept as a JSON array column so a thread is always read and written
//! whole, the way a document store would.

use std::str::FromStr;

use ab_core::models::{Reply, Thread};
use ab_core::traits::ThreadStore;
use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use uuid::Uuid;

const THREAD_COLUMNS: &str =
    "id, board, text, created_on, bumped_on, reported, delete_password, replies";

pub struct SqliteThreadStore {
    pool: SqlitePool,
}

impl SqliteThreadStore {
    /// Opens (creating if needed) the database at `url` and applies migrations.
    ///
    /// `sqlite::memory:` gets a single long-lived connection, otherwise every
    /// pooled connection would see its own empty database.
    pub async fn new(url: &str) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("invalid SQLite URL {url}"))?
            .create_if_missing(true);

        let in_memory = url.contains(":memory:");
        let pool = SqlitePoolOptions::new()
            .max_connections(if in_memory { 1 } else { 5 })
            .idle_timeout(if in_memory { None } else { Some(std::time::Duration::from_secs(600)) })
            .max_lifetime(if in_memory { None } else { Some(std::time::Duration::from_secs(1800)) })
            .connect_with(options)
            .await
            .with_context(|| format!("failed to open SQLite database {url}"))?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to run SQLite migrations")?;

        log::info!("SQLite thread store ready at {}", url);
        Ok(Self { pool })
    }
}

// Helpers for UUID conversion
fn uuid_to_blob(id: Uuid) -> Vec<u8> {
    id.as_bytes().to_vec()
}

fn blob_to_uuid(blob: &[u8]) -> anyhow::Result<Uuid> {
    Uuid::from_slice(blob).context("malformed thread id in database")
}

/// Fixed-width RFC 3339 with milliseconds, so that text order is time order.
fn timestamp_to_text(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn text_to_timestamp(text: &str) -> anyhow::Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(text)
        .with_context(|| format!("malformed timestamp {text:?} in database"))?
        .with_timezone(&Utc))
}

fn row_to_thread(row: &SqliteRow) -> anyhow::Result<Thread> {
    let replies: Vec<Reply> = serde_json::from_str(&row.try_get::<String, _>("replies")?)
        .context("malformed replies column")?;

    Ok(Thread {
        id: blob_to_uuid(row.try_get::<Vec<u8>, _>("id")?.as_slice())?,
        board: row.try_get("board")?,
        text: row.try_get("text")?,
        created_on: text_to_timestamp(&row.try_get::<String, _>("created_on")?)?,
        bumped_on: text_to_timestamp(&row.try_get::<String, _>("bumped_on")?)?,
        reported: row.try_get("reported")?,
        delete_password: row.try_get("delete_password")?,
        replies,
    })
}

#[async_trait]
impl ThreadStore for SqliteThreadStore {
    async fn create(&self, thread: &Thread) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO threads \
             (id, board, text, created_on, bumped_on, reported, delete_password, replies) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(thread.id))
        .bind(&thread.board)
        .bind(&thread.text)
        .bind(timestamp_to_text(thread.created_on))
        .bind(timestamp_to_text(thread.bumped_on))
        .bind(thread.reported)
        .bind(&thread.delete_password)
        .bind(serde_json::to_string(&thread.replies)?)
        .execute(&self.pool)
        .await
        .context("failed to insert thread")?;
        Ok(())
    }

    async fn find_by_board(&self, board: &str, limit: usize) -> anyhow::Result<Vec<Thread>> {
        let rows = sqlx::query(&format!(
            "SELECT {THREAD_COLUMNS} FROM threads WHERE board = ? \
             ORDER BY bumped_on DESC, id DESC LIMIT ?"
        ))
        .bind(board)
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .context("failed to list threads")?;

        rows.iter().map(row_to_thread).collect()
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Thread>> {
        let row = sqlx::query(&format!("SELECT {THREAD_COLUMNS} FROM threads WHERE id = ?"))
            .bind(uuid_to_blob(id))
            .fetch_optional(&self.pool)
            .await
            .context("failed to load thread")?;

        row.as_ref().map(row_to_thread).transpose()
    }

    async fn find_by_id_and_board(
        &self,
        id: Uuid,
        board: &str,
    ) -> anyhow::Result<Option<Thread>> {
        let row = sqlx::query(&format!(
            "SELECT {THREAD_COLUMNS} FROM threads WHERE id = ? AND board = ?"
        ))
        .bind(uuid_to_blob(id))
        .bind(board)
        .fetch_optional(&self.pool)
        .await
        .context("failed to load thread")?;

        row.as_ref().map(row_to_thread).transpose()
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM threads WHERE id = ?")
            .bind(uuid_to_blob(id))
            .execute(&self.pool)
            .await
            .context("failed to delete thread")?;
        Ok(result.rows_affected() > 0)
    }

    /// Rewrites the mutable fields. A thread deleted in the meantime stays deleted.
    async fn save(&self, thread: &Thread) -> anyhow::Result<bool> {
        let result = sqlx::query(
            "UPDATE threads \
             SET text = ?, bumped_on = ?, reported = ?, delete_password = ?, replies = ? \
             WHERE id = ?",
        )
        .bind(&thread.text)
        .bind(timestamp_to_text(thread.bumped_on))
        .bind(thread.reported)
        .bind(&thread.delete_password)
        .bind(serde_json::to_string(&thread.replies)?)
        .bind(uuid_to_blob(thread.id))
        .execute(&self.pool)
        .await
        .context("failed to save thread")?;

        if result.rows_affected() == 0 {
            log::warn!("Thread {} vanished before save; update dropped", thread.id);
            return Ok(false);
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ab_core::{BoardService, Outcome};
    use chrono::{Duration, TimeZone};
    use std::sync::Arc;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    async fn store() -> SqliteThreadStore {
        SqliteThreadStore::new("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get_thread() {
        let repo = store().await;
        let mut thread = Thread::new("test".into(), "OP".into(), "pw".into(), t0());
        thread.push_reply("first".into(), "rpw".into(), t0() + Duration::milliseconds(5));

        repo.create(&thread).await.expect("Failed to create thread");

        let loaded = repo.find_by_id(thread.id).await.unwrap().unwrap();
        assert_eq!(loaded, thread);
        assert_eq!(loaded.bumped_on, loaded.replies[0].created_on);
    }

    #[tokio::test]
    async fn board_scoped_lookup_ignores_other_boards() {
        let repo = store().await;
        let thread = Thread::new("a".into(), "OP".into(), "pw".into(), t0());
        repo.create(&thread).await.unwrap();

        assert!(repo.find_by_id_and_board(thread.id, "a").await.unwrap().is_some());
        assert!(repo.find_by_id_and_board(thread.id, "b").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn listing_orders_by_bump_and_limits() {
        let repo = store().await;
        let mut ids = Vec::new();
        for i in 0..12 {
            let bumped = t0() + Duration::seconds(i);
            let thread = Thread::new("b".into(), format!("t{i}"), "pw".into(), bumped);
            ids.push(thread.id);
            repo.create(&thread).await.unwrap();
        }
        let tomorrow = t0() + Duration::days(1);
        let elsewhere = Thread::new("other".into(), "x".into(), "pw".into(), tomorrow);
        repo.create(&elsewhere).await.unwrap();

        let listed = repo.find_by_board("b", 10).await.unwrap();
        assert_eq!(listed.len(), 10);
        assert_eq!(listed[0].id, ids[11]);
        assert_eq!(listed[9].id, ids[2]);
        assert!(listed.windows(2).all(|w| w[0].bumped_on >= w[1].bumped_on));
    }

    #[tokio::test]
    async fn save_rewrites_document_and_delete_removes_it() {
        let repo = store().await;
        let mut thread = Thread::new("b".into(), "OP".into(), "pw".into(), t0());
        repo.create(&thread).await.unwrap();

        thread.reported = true;
        thread.push_reply("hi".into(), "r".into(), t0() + Duration::minutes(1));
        assert!(repo.save(&thread).await.unwrap());
        assert_eq!(repo.find_by_id(thread.id).await.unwrap().unwrap(), thread);

        assert!(repo.delete(thread.id).await.unwrap());
        assert!(!repo.delete(thread.id).await.unwrap());
        assert!(repo.find_by_id(thread.id).await.unwrap().is_none());

        // Saving a deleted thread must not bring it back.
        assert!(!repo.save(&thread).await.unwrap());
        assert!(repo.find_by_id(thread.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn reported_flags_survive_a_reload() {
        let repo = Arc::new(store().await);
        let service = BoardService::new(repo.clone());

        let thread = service.create_thread("b", "OP", "pw").await.unwrap();
        let id = thread.id.to_string();
        service.create_reply("b", &id, "hi", "rpw").await.unwrap();
        let reply_id = repo.find_by_id(thread.id).await.unwrap().unwrap().replies[0].id;

        assert_eq!(service.report_thread(&id).await.unwrap(), Outcome::Reported);
        assert_eq!(
            service.report_reply("b", &id, &reply_id.to_string()).await.unwrap(),
            Outcome::Reported
        );

        let stored = repo.find_by_id(thread.id).await.unwrap().unwrap();
        assert!(stored.reported);
        assert!(stored.replies[0].reported);
    }
}
