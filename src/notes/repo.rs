use sqlx::PgPool;

use crate::error::{AppError, Result};
use crate::notes::repo_types::Note;

const NOTE_COLUMNS: &str = "id, title, content, tags, is_favorite, created_at, updated_at";

impl Note {
    pub async fn create(
        db: &PgPool,
        title: &str,
        content: Option<&str>,
        tags: Option<&str>,
        is_favorite: bool,
    ) -> Result<Note> {
        let note = sqlx::query_as::<_, Note>(&format!(
            r#"
            INSERT INTO notes (title, content, tags, is_favorite)
            VALUES ($1, $2, $3, $4)
            RETURNING {NOTE_COLUMNS}
            "#
        ))
        .bind(title)
        .bind(content)
        .bind(tags)
        .bind(is_favorite)
        .fetch_one(db)
        .await?;
        Ok(note)
    }

    pub async fn list(db: &PgPool, limit: i64, offset: i64) -> Result<(Vec<Note>, i64)> {
        let rows = sqlx::query_as::<_, Note>(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes ORDER BY updated_at DESC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM notes")
            .fetch_one(db)
            .await?;
        Ok((rows, total))
    }

    pub async fn find_by_id(db: &PgPool, id: i64) -> Result<Note> {
        sqlx::query_as::<_, Note>(&format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or(AppError::NotFound("Note"))
    }

    pub async fn update(
        db: &PgPool,
        id: i64,
        title: Option<&str>,
        content: Option<&str>,
        tags: Option<&str>,
        is_favorite: Option<bool>,
    ) -> Result<Note> {
        sqlx::query_as::<_, Note>(&format!(
            r#"
            UPDATE notes
            SET title = COALESCE($2, title),
                content = COALESCE($3, content),
                tags = COALESCE($4, tags),
                is_favorite = COALESCE($5, is_favorite),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {NOTE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(title)
        .bind(content)
        .bind(tags)
        .bind(is_favorite)
        .fetch_optional(db)
        .await?
        .ok_or(AppError::NotFound("Note"))
    }

    pub async fn delete(db: &PgPool, id: i64) -> Result<()> {
        let res = sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        if res.rows_affected() == 0 {
            return Err(AppError::NotFound("Note"));
        }
        Ok(())
    }

    pub async fn search(db: &PgPool, query: &str) -> Result<Vec<Note>> {
        let pattern = format!("%{}%", query);
        let rows = sqlx::query_as::<_, Note>(&format!(
            r#"
            SELECT {NOTE_COLUMNS} FROM notes
            WHERE title ILIKE $1 OR content ILIKE $1 OR tags ILIKE $1
            ORDER BY updated_at DESC
            "#
        ))
        .bind(pattern)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn favorites(db: &PgPool) -> Result<Vec<Note>> {
        let rows = sqlx::query_as::<_, Note>(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes WHERE is_favorite ORDER BY updated_at DESC"
        ))
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}
