use crate::config::Config;
use crate::db::models::{DbContent, DbImage};
use crate::db::schema::SQLITE_INIT;
use crate::error::{Access, AlphabyteError, is_unique_violation};
use crate::types::{Content, Image};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite, SqliteConnection};
use std::str::FromStr;
use tracing::debug;

pub type SqlitePool = Pool<Sqlite>;

fn read_err(op: &'static str) -> impl FnOnce(sqlx::Error) -> AlphabyteError {
    move |e| AlphabyteError::from_sqlx(op, Access::Read, e)
}

fn write_err(op: &'static str) -> impl FnOnce(sqlx::Error) -> AlphabyteError {
    move |e| AlphabyteError::from_sqlx(op, Access::Write, e)
}

/// Content and image rows behind a shared connection pool.
///
/// Each aggregate operation runs in its own transaction. A transaction that
/// is dropped before `commit` (early return, error, cancelled future) is
/// rolled back by sqlx.
#[derive(Clone)]
pub struct ContentStorage {
    pool: SqlitePool,
}

impl ContentStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open the pool described by `cfg`, creating the database file if needed.
    pub async fn connect(cfg: &Config) -> Result<Self, AlphabyteError> {
        let connect_opts = SqliteConnectOptions::from_str(cfg.database_url.as_str())
            .map_err(read_err("parse database url"))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(cfg.busy_timeout());
        let pool = SqlitePoolOptions::new()
            .max_connections(cfg.max_connections)
            .connect_with(connect_opts)
            .await
            .map_err(read_err("open database"))?;
        Ok(Self::new(pool))
    }

    /// Connect and ensure the schema exists. Startup must not continue past
    /// an error from here.
    pub async fn open(cfg: &Config) -> Result<Self, AlphabyteError> {
        let storage = Self::connect(cfg).await?;
        storage.init_schema().await?;
        Ok(storage)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), AlphabyteError> {
        // sqlx::query runs one statement at a time
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s)
                .execute(&self.pool)
                .await
                .map_err(write_err("initialize schema"))?;
        }
        Ok(())
    }

    /// Insert the content row and all of its images atomically.
    pub async fn insert_aggregate(&self, content: &Content) -> Result<(), AlphabyteError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(write_err("begin create transaction"))?;

        let row = DbContent::from(content);
        sqlx::query(
            r#"INSERT INTO content (id, title, body, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(row.id)
        .bind(row.title)
        .bind(row.body)
        .bind(row.created_at)
        .bind(row.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AlphabyteError::Conflict { id: content.id }
            } else {
                AlphabyteError::from_sqlx("insert content", Access::Write, e)
            }
        })?;

        Self::insert_images(&mut *tx, content.id, &content.images).await?;

        tx.commit()
            .await
            .map_err(write_err("commit create transaction"))?;
        Ok(())
    }

    /// Read the content row and its images from one snapshot.
    /// Returns `None` when no content row has this id.
    pub async fn fetch_aggregate(&self, id: i64) -> Result<Option<Content>, AlphabyteError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(read_err("begin read transaction"))?;

        let row: Option<DbContent> = sqlx::query_as(
            r#"SELECT id, COALESCE(title, '') AS title, COALESCE(body, '') AS body,
               COALESCE(created_at, 0) AS created_at, COALESCE(updated_at, 0) AS updated_at
               FROM content WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(read_err("query content"))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let images: Vec<DbImage> = sqlx::query_as(
            r#"SELECT id, content_id, COALESCE(url, '') AS url,
               COALESCE(filename, '') AS filename, COALESCE(type, 0) AS type
               FROM images WHERE content_id = ? ORDER BY id"#,
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await
        .map_err(read_err("query images"))?;

        tx.commit().await.map_err(read_err("end read transaction"))?;
        debug!(id, images = images.len(), "content aggregate loaded");
        Ok(Some(row.into_content(images)))
    }

    /// Overwrite the content row and replace its image set.
    ///
    /// Returns `false`, writing nothing, when no content row has this id.
    pub async fn replace_aggregate(&self, content: &Content) -> Result<bool, AlphabyteError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(write_err("begin update transaction"))?;

        let row = DbContent::from(content);
        let updated = sqlx::query(
            r#"UPDATE content SET
                title = ?,
                body = ?,
                created_at = ?,
                updated_at = ?
              WHERE id = ?"#,
        )
        .bind(row.title)
        .bind(row.body)
        .bind(row.created_at)
        .bind(row.updated_at)
        .bind(row.id)
        .execute(&mut *tx)
        .await
        .map_err(write_err("update content"))?
        .rows_affected();

        if updated == 0 {
            return Ok(false);
        }

        sqlx::query("DELETE FROM images WHERE content_id = ?")
            .bind(content.id)
            .execute(&mut *tx)
            .await
            .map_err(write_err("delete stale images"))?;

        Self::insert_images(&mut *tx, content.id, &content.images).await?;

        tx.commit()
            .await
            .map_err(write_err("commit update transaction"))?;
        Ok(true)
    }

    /// Remove the content row and every image referencing it.
    /// Returns the number of content rows removed (0 or 1).
    pub async fn delete_aggregate(&self, id: i64) -> Result<u64, AlphabyteError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(write_err("begin delete transaction"))?;

        // Tables created before the cascade existed still hold orphans otherwise.
        sqlx::query("DELETE FROM images WHERE content_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(write_err("delete images"))?;

        let removed = sqlx::query("DELETE FROM content WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(write_err("delete content"))?
            .rows_affected();

        tx.commit()
            .await
            .map_err(write_err("commit delete transaction"))?;
        Ok(removed)
    }

    async fn insert_images(
        conn: &mut SqliteConnection,
        content_id: i64,
        images: &[Image],
    ) -> Result<(), AlphabyteError> {
        for img in images {
            sqlx::query(
                r#"INSERT INTO images (content_id, url, filename, type)
                   VALUES (?, ?, ?, ?)"#,
            )
            .bind(content_id)
            .bind(&img.url)
            .bind(&img.filename)
            .bind(img.kind)
            .execute(&mut *conn)
            .await
            .map_err(write_err("insert image"))?;
        }
        Ok(())
    }
}
