use sqlx::PgPool;
use time::OffsetDateTime;

use crate::error::{AppError, Result};
use crate::notifications::dto::{CreateNotificationRequest, UpdateNotificationRequest};
use crate::notifications::repo_types::{
    Notification, NotificationPriority, NotificationStatus, NotificationType,
};

const NOTIFICATION_COLUMNS: &str = r#"id, title, message, notification_type, status, priority,
    scheduled_for, sent_at, read_at, is_read, related_module, related_id,
    created_at, updated_at"#;

impl Notification {
    pub async fn create(db: &PgPool, req: &CreateNotificationRequest) -> Result<Notification> {
        let row = sqlx::query_as::<_, Notification>(&format!(
            r#"
            INSERT INTO notifications (title, message, notification_type, status, priority,
                scheduled_for, related_module, related_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {NOTIFICATION_COLUMNS}
            "#
        ))
        .bind(&req.title)
        .bind(&req.message)
        .bind(req.notification_type)
        .bind(req.status)
        .bind(req.priority)
        .bind(req.scheduled_for)
        .bind(&req.related_module)
        .bind(req.related_id)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn list(db: &PgPool, limit: i64, offset: i64) -> Result<(Vec<Notification>, i64)> {
        let rows = sqlx::query_as::<_, Notification>(&format!(
            r#"
            SELECT {NOTIFICATION_COLUMNS} FROM notifications
            ORDER BY scheduled_for ASC LIMIT $1 OFFSET $2
            "#
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM notifications")
            .fetch_one(db)
            .await?;
        Ok((rows, total))
    }

    pub async fn find_by_id(db: &PgPool, id: i64) -> Result<Notification> {
        sqlx::query_as::<_, Notification>(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or(AppError::NotFound("Notification"))
    }

    pub async fn update(
        db: &PgPool,
        id: i64,
        req: &UpdateNotificationRequest,
    ) -> Result<Notification> {
        sqlx::query_as::<_, Notification>(&format!(
            r#"
            UPDATE notifications
            SET title = COALESCE($2, title),
                message = COALESCE($3, message),
                notification_type = COALESCE($4, notification_type),
                status = COALESCE($5, status),
                priority = COALESCE($6, priority),
                scheduled_for = COALESCE($7, scheduled_for),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {NOTIFICATION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&req.title)
        .bind(&req.message)
        .bind(req.notification_type)
        .bind(req.status)
        .bind(req.priority)
        .bind(req.scheduled_for)
        .fetch_optional(db)
        .await?
        .ok_or(AppError::NotFound("Notification"))
    }

    pub async fn delete(db: &PgPool, id: i64) -> Result<()> {
        let res = sqlx::query("DELETE FROM notifications WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        if res.rows_affected() == 0 {
            return Err(AppError::NotFound("Notification"));
        }
        Ok(())
    }

    pub async fn mark_read(db: &PgPool, id: i64) -> Result<Notification> {
        sqlx::query_as::<_, Notification>(&format!(
            r#"
            UPDATE notifications SET is_read = TRUE, read_at = NOW(), updated_at = NOW()
            WHERE id = $1
            RETURNING {NOTIFICATION_COLUMNS}
            "#
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or(AppError::NotFound("Notification"))
    }

    pub async fn set_status(
        db: &PgPool,
        id: i64,
        status: NotificationStatus,
        stamp_sent_at: bool,
    ) -> Result<Notification> {
        let sent_clause = if stamp_sent_at { "sent_at = NOW()," } else { "" };
        sqlx::query_as::<_, Notification>(&format!(
            r#"
            UPDATE notifications SET status = $2, {sent_clause} updated_at = NOW()
            WHERE id = $1
            RETURNING {NOTIFICATION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(db)
        .await?
        .ok_or(AppError::NotFound("Notification"))
    }

    /// Pending notifications whose scheduled time has already passed.
    pub async fn pending(db: &PgPool, now: OffsetDateTime) -> Result<Vec<Notification>> {
        let rows = sqlx::query_as::<_, Notification>(&format!(
            r#"
            SELECT {NOTIFICATION_COLUMNS} FROM notifications
            WHERE status = $1 AND scheduled_for < $2
            ORDER BY priority DESC, scheduled_for ASC
            "#
        ))
        .bind(NotificationStatus::Pending)
        .bind(now)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn upcoming(
        db: &PgPool,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> Result<Vec<Notification>> {
        let rows = sqlx::query_as::<_, Notification>(&format!(
            r#"
            SELECT {NOTIFICATION_COLUMNS} FROM notifications
            WHERE status = $1 AND scheduled_for BETWEEN $2 AND $3
            ORDER BY scheduled_for ASC
            "#
        ))
        .bind(NotificationStatus::Pending)
        .bind(start)
        .bind(end)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn unread_count(db: &PgPool) -> Result<i64> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM notifications WHERE NOT is_read")
                .fetch_one(db)
                .await?;
        Ok(count)
    }

    pub async fn by_priority(
        db: &PgPool,
        priority: NotificationPriority,
    ) -> Result<Vec<Notification>> {
        let rows = sqlx::query_as::<_, Notification>(&format!(
            r#"
            SELECT {NOTIFICATION_COLUMNS} FROM notifications
            WHERE priority = $1
            ORDER BY scheduled_for ASC
            "#
        ))
        .bind(priority)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn by_type(
        db: &PgPool,
        notification_type: NotificationType,
    ) -> Result<Vec<Notification>> {
        let rows = sqlx::query_as::<_, Notification>(&format!(
            r#"
            SELECT {NOTIFICATION_COLUMNS} FROM notifications
            WHERE notification_type = $1
            ORDER BY scheduled_for ASC
            "#
        ))
        .bind(notification_type)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn by_module(db: &PgPool, module: &str) -> Result<Vec<Notification>> {
        let rows = sqlx::query_as::<_, Notification>(&format!(
            r#"
            SELECT {NOTIFICATION_COLUMNS} FROM notifications
            WHERE related_module = $1
            ORDER BY scheduled_for ASC
            "#
        ))
        .bind(module)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn search(db: &PgPool, query: &str) -> Result<Vec<Notification>> {
        let pattern = format!("%{}%", query);
        let rows = sqlx::query_as::<_, Notification>(&format!(
            r#"
            SELECT {NOTIFICATION_COLUMNS} FROM notifications
            WHERE title ILIKE $1 OR message ILIKE $1
            ORDER BY scheduled_for DESC
            "#
        ))
        .bind(pattern)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}
