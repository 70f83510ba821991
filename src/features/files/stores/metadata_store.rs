//! SQL for the `file_info` table.
//!
//! Every function takes any Postgres executor so it can run against the pool
//! or inside a transaction opened by the caller.

use chrono::{DateTime, Utc};
use sqlx::PgExecutor;

use crate::features::files::models::{FileInfo, FilePatch, FileSummary};

pub async fn list_all<'e, E>(executor: E) -> Result<Vec<FileSummary>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, FileSummary>("SELECT id, name FROM file_info ORDER BY id")
        .fetch_all(executor)
        .await
}

pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<FileInfo>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, FileInfo>(
        r#"
        SELECT id, name, create_date, extension, size
        FROM file_info
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

/// Existence probe; avoids depending on driver-reported affected rows.
pub async fn count_by_id<'e, E>(executor: E, id: i64) -> Result<i64, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_scalar::<_, i64>("SELECT COUNT(1) FROM file_info WHERE id = $1")
        .bind(id)
        .fetch_one(executor)
        .await
}

pub async fn insert<'e, E>(
    executor: E,
    name: &str,
    create_date: DateTime<Utc>,
    extension: &str,
    size: &str,
) -> Result<i64, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO file_info (name, create_date, extension, size)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(name)
    .bind(create_date)
    .bind(extension)
    .bind(size)
    .fetch_one(executor)
    .await
}

pub async fn update<'e, E>(executor: E, id: i64, patch: &FilePatch) -> Result<u64, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query(
        r#"
        UPDATE file_info
        SET name = $1,
            extension = $2,
            size = $3,
            create_date = COALESCE($4, create_date)
        WHERE id = $5
        "#,
    )
    .bind(&patch.name)
    .bind(&patch.extension)
    .bind(&patch.size)
    .bind(patch.create_date)
    .bind(id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

pub async fn delete<'e, E>(executor: E, id: i64) -> Result<u64, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM file_info WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}
