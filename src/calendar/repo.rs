use sqlx::PgPool;
use time::OffsetDateTime;

use crate::calendar::dto::{CreateEventRequest, UpdateEventRequest};
use crate::calendar::repo_types::{Event, EventStatus, EventType};
use crate::error::{AppError, Result};

const EVENT_COLUMNS: &str = r#"id, title, description, start_date, end_date, reminder_date,
    event_type, status, is_recurring, recurrence_pattern, tags, is_favorite,
    is_all_day, color, location, created_at, updated_at"#;

impl Event {
    pub async fn create(db: &PgPool, req: &CreateEventRequest) -> Result<Event> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            INSERT INTO events (title, description, start_date, end_date, reminder_date,
                event_type, status, is_recurring, recurrence_pattern, tags, is_favorite,
                is_all_day, color, location)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.start_date)
        .bind(req.end_date)
        .bind(req.reminder_date)
        .bind(req.event_type)
        .bind(req.status)
        .bind(req.is_recurring)
        .bind(&req.recurrence_pattern)
        .bind(&req.tags)
        .bind(req.is_favorite)
        .bind(req.is_all_day)
        .bind(&req.color)
        .bind(&req.location)
        .fetch_one(db)
        .await?;
        Ok(event)
    }

    pub async fn list(db: &PgPool, limit: i64, offset: i64) -> Result<(Vec<Event>, i64)> {
        let rows = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY start_date ASC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM events")
            .fetch_one(db)
            .await?;
        Ok((rows, total))
    }

    pub async fn find_by_id(db: &PgPool, id: i64) -> Result<Event> {
        sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or(AppError::NotFound("Event"))
    }

    pub async fn update(db: &PgPool, id: i64, req: &UpdateEventRequest) -> Result<Event> {
        sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                start_date = COALESCE($4, start_date),
                end_date = COALESCE($5, end_date),
                reminder_date = COALESCE($6, reminder_date),
                event_type = COALESCE($7, event_type),
                status = COALESCE($8, status),
                is_recurring = COALESCE($9, is_recurring),
                recurrence_pattern = COALESCE($10, recurrence_pattern),
                tags = COALESCE($11, tags),
                is_favorite = COALESCE($12, is_favorite),
                is_all_day = COALESCE($13, is_all_day),
                color = COALESCE($14, color),
                location = COALESCE($15, location),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.start_date)
        .bind(req.end_date)
        .bind(req.reminder_date)
        .bind(req.event_type)
        .bind(req.status)
        .bind(req.is_recurring)
        .bind(&req.recurrence_pattern)
        .bind(&req.tags)
        .bind(req.is_favorite)
        .bind(req.is_all_day)
        .bind(&req.color)
        .bind(&req.location)
        .fetch_optional(db)
        .await?
        .ok_or(AppError::NotFound("Event"))
    }

    pub async fn delete(db: &PgPool, id: i64) -> Result<()> {
        let res = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        if res.rows_affected() == 0 {
            return Err(AppError::NotFound("Event"));
        }
        Ok(())
    }

    pub async fn in_range(
        db: &PgPool,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> Result<Vec<Event>> {
        let rows = sqlx::query_as::<_, Event>(&format!(
            r#"
            SELECT {EVENT_COLUMNS} FROM events
            WHERE start_date BETWEEN $1 AND $2
            ORDER BY start_date ASC
            "#
        ))
        .bind(start)
        .bind(end)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn upcoming(
        db: &PgPool,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> Result<Vec<Event>> {
        let rows = sqlx::query_as::<_, Event>(&format!(
            r#"
            SELECT {EVENT_COLUMNS} FROM events
            WHERE start_date BETWEEN $1 AND $2 AND status = $3
            ORDER BY start_date ASC
            "#
        ))
        .bind(start)
        .bind(end)
        .bind(EventStatus::Pending)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn favorites(db: &PgPool) -> Result<Vec<Event>> {
        let rows = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE is_favorite ORDER BY start_date ASC"
        ))
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn by_type(db: &PgPool, event_type: EventType) -> Result<Vec<Event>> {
        let rows = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE event_type = $1 ORDER BY start_date ASC"
        ))
        .bind(event_type)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn recurring(db: &PgPool) -> Result<Vec<Event>> {
        let rows = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE is_recurring ORDER BY start_date ASC"
        ))
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn search(db: &PgPool, query: &str) -> Result<Vec<Event>> {
        let pattern = format!("%{}%", query);
        let rows = sqlx::query_as::<_, Event>(&format!(
            r#"
            SELECT {EVENT_COLUMNS} FROM events
            WHERE title ILIKE $1 OR description ILIKE $1 OR tags ILIKE $1
            ORDER BY start_date ASC
            "#
        ))
        .bind(pattern)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn mark_completed(db: &PgPool, id: i64) -> Result<Event> {
        sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(EventStatus::Completed)
        .fetch_optional(db)
        .await?
        .ok_or(AppError::NotFound("Event"))
    }
}
