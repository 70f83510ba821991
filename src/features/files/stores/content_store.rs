//! SQL for the `file_content` table.

use sqlx::PgExecutor;

use crate::features::files::models::FileContent;

/// Store base64 text as-is; nothing is decoded or validated here.
pub async fn insert<'e, E>(executor: E, content: &str, file_info_id: i64) -> Result<i64, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO file_content (content, file_info_id)
        VALUES ($1, $2)
        RETURNING id
        "#,
    )
    .bind(content)
    .bind(file_info_id)
    .fetch_one(executor)
    .await
}

/// Oldest content row for a metadata row. Only one is ever written per file.
pub async fn find_by_file_info_id<'e, E>(
    executor: E,
    file_info_id: i64,
) -> Result<Option<FileContent>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, FileContent>(
        r#"
        SELECT id, content, file_info_id
        FROM file_content
        WHERE file_info_id = $1
        ORDER BY id
        LIMIT 1
        "#,
    )
    .bind(file_info_id)
    .fetch_optional(executor)
    .await
}

/// Safe to call when nothing matches.
pub async fn delete_by_file_info_id<'e, E>(executor: E, file_info_id: i64) -> Result<u64, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM file_content WHERE file_info_id = $1")
        .bind(file_info_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}
