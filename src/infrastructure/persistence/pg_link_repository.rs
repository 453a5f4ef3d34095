//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use super::db_error::map_sqlx_error;
use crate::domain::entities::{LinkRecord, NewLinkRecord};
use crate::domain::repositories::{LinkCounts, LinkRepository, StoreResult};

#[derive(sqlx::FromRow)]
struct LinkRow {
    id: String,
    original_url: String,
    short_url: String,
    clicks: i64,
    created_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
}

impl From<LinkRow> for LinkRecord {
    fn from(r: LinkRow) -> Self {
        LinkRecord {
            id: r.id,
            original_url: r.original_url,
            short_url: r.short_url,
            clicks: r.clicks,
            created_at: r.created_at,
            expires_at: r.expires_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CountsRow {
    total: i64,
    permanent: i64,
    expiring: i64,
    expired_pending: i64,
    total_clicks: i64,
}

/// PostgreSQL repository for link storage and retrieval.
///
/// All statements are parameterized. Uniqueness on `id` and `short_url` is
/// enforced by the schema in `migrations/`; `original_url` is indexed through
/// its md5 digest and is not unique.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn insert(&self, new_link: NewLinkRecord) -> StoreResult<LinkRecord> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            INSERT INTO links (id, original_url, short_url, clicks, created_at, expires_at)
            VALUES ($1, $2, $3, 0, $4, $5)
            RETURNING id, original_url, short_url, clicks, created_at, expires_at
            "#,
        )
        .bind(&new_link.id)
        .bind(&new_link.original_url)
        .bind(&new_link.short_url)
        .bind(new_link.created_at)
        .bind(new_link.expires_at)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<LinkRecord>> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT id, original_url, short_url, clicks, created_at, expires_at
            FROM links
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(Into::into))
    }

    async fn find_by_original_url(&self, original_url: &str) -> StoreResult<Option<LinkRecord>> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT id, original_url, short_url, clicks, created_at, expires_at
            FROM links
            WHERE md5(original_url) = md5($1) AND original_url = $1
            ORDER BY created_at ASC
            LIMIT 1
            "#,
        )
        .bind(original_url)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(Into::into))
    }

    async fn increment_clicks(&self, id: &str) -> StoreResult<Option<i64>> {
        let clicks = sqlx::query_scalar::<_, i64>(
            "UPDATE links SET clicks = clicks + 1 WHERE id = $1 RETURNING clicks",
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(map_sqlx_error)?;

        Ok(clicks)
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM links WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> StoreResult<u64> {
        let result =
            sqlx::query("DELETE FROM links WHERE expires_at IS NOT NULL AND expires_at <= $1")
                .bind(now)
                .execute(self.pool.as_ref())
                .await
                .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }

    async fn counts(&self, now: DateTime<Utc>) -> StoreResult<LinkCounts> {
        let row = sqlx::query_as::<_, CountsRow>(
            r#"
            SELECT
                COUNT(*)                                                AS total,
                COUNT(*) FILTER (WHERE expires_at IS NULL)              AS permanent,
                COUNT(*) FILTER (WHERE expires_at > $1)                 AS expiring,
                COUNT(*) FILTER (WHERE expires_at <= $1)                AS expired_pending,
                COALESCE(SUM(clicks), 0)::BIGINT                        AS total_clicks
            FROM links
            "#,
        )
        .bind(now)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(map_sqlx_error)?;

        Ok(LinkCounts {
            total: row.total,
            permanent: row.permanent,
            expiring: row.expiring,
            expired_pending: row.expired_pending,
            total_clicks: row.total_clicks,
        })
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }
}
