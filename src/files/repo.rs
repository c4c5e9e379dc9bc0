use sqlx::PgPool;

use crate::error::{AppError, Result};
use crate::files::dto::{UpdateFileRequest, UploadMeta};
use crate::files::repo_types::StoredFile;

const FILE_COLUMNS: &str = r#"id, filename, original_filename, file_path, file_type, file_size,
    title, description, tags, is_favorite, created_at, updated_at"#;

impl StoredFile {
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        db: &PgPool,
        filename: &str,
        original_filename: &str,
        file_path: &str,
        file_type: &str,
        file_size: i64,
        meta: &UploadMeta,
    ) -> Result<StoredFile> {
        let file = sqlx::query_as::<_, StoredFile>(&format!(
            r#"
            INSERT INTO files (filename, original_filename, file_path, file_type, file_size,
                title, description, tags)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {FILE_COLUMNS}
            "#
        ))
        .bind(filename)
        .bind(original_filename)
        .bind(file_path)
        .bind(file_type)
        .bind(file_size)
        .bind(&meta.title)
        .bind(&meta.description)
        .bind(&meta.tags)
        .fetch_one(db)
        .await?;
        Ok(file)
    }

    pub async fn list(db: &PgPool, limit: i64, offset: i64) -> Result<(Vec<StoredFile>, i64)> {
        let rows = sqlx::query_as::<_, StoredFile>(&format!(
            "SELECT {FILE_COLUMNS} FROM files ORDER BY updated_at DESC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM files")
            .fetch_one(db)
            .await?;
        Ok((rows, total))
    }

    pub async fn find_by_id(db: &PgPool, id: i64) -> Result<StoredFile> {
        sqlx::query_as::<_, StoredFile>(&format!(
            "SELECT {FILE_COLUMNS} FROM files WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or(AppError::NotFound("File"))
    }

    pub async fn update(db: &PgPool, id: i64, req: &UpdateFileRequest) -> Result<StoredFile> {
        sqlx::query_as::<_, StoredFile>(&format!(
            r#"
            UPDATE files
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                tags = COALESCE($4, tags),
                is_favorite = COALESCE($5, is_favorite),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {FILE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&req.title)
        .bind(&req.description)
        .bind(&req.tags)
        .bind(req.is_favorite)
        .fetch_optional(db)
        .await?
        .ok_or(AppError::NotFound("File"))
    }

    pub async fn delete(db: &PgPool, id: i64) -> Result<()> {
        let res = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        if res.rows_affected() == 0 {
            return Err(AppError::NotFound("File"));
        }
        Ok(())
    }

    pub async fn search(db: &PgPool, query: &str) -> Result<Vec<StoredFile>> {
        let pattern = format!("%{}%", query);
        let rows = sqlx::query_as::<_, StoredFile>(&format!(
            r#"
            SELECT {FILE_COLUMNS} FROM files
            WHERE title ILIKE $1 OR description ILIKE $1 OR tags ILIKE $1
                OR original_filename ILIKE $1
            ORDER BY updated_at DESC
            "#
        ))
        .bind(pattern)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn favorites(db: &PgPool) -> Result<Vec<StoredFile>> {
        let rows = sqlx::query_as::<_, StoredFile>(&format!(
            "SELECT {FILE_COLUMNS} FROM files WHERE is_favorite ORDER BY updated_at DESC"
        ))
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn by_type(db: &PgPool, file_type: &str) -> Result<Vec<StoredFile>> {
        let rows = sqlx::query_as::<_, StoredFile>(&format!(
            "SELECT {FILE_COLUMNS} FROM files WHERE file_type = $1 ORDER BY updated_at DESC"
        ))
        .bind(file_type)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}
