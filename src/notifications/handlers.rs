use axum::{
    extract::{Path, Query, State},
    routing::{get, patch, post},
    Json, Router,
};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{info, instrument};

use crate::auth::extractors::AuthUser;
use crate::error::{AppError, Result};
use crate::pagination::{Paginated, Pagination};
use crate::state::AppState;

use super::dto::{CreateNotificationRequest, SearchQuery, UpcomingQuery, UpdateNotificationRequest};
use super::repo_types::{
    Notification, NotificationPriority, NotificationStatus, NotificationType,
};

pub fn notification_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/notifications",
            post(create_notification).get(list_notifications),
        )
        .route("/notifications/pending", get(pending_notifications))
        .route("/notifications/upcoming", get(upcoming_notifications))
        .route("/notifications/unread-count", get(unread_count))
        .route("/notifications/priority/:priority", get(by_priority))
        .route("/notifications/type/:notification_type", get(by_type))
        .route("/notifications/module/:module", get(by_module))
        .route("/notifications/search", get(search_notifications))
        .route(
            "/notifications/:id",
            get(get_notification)
                .patch(update_notification)
                .delete(delete_notification),
        )
        .route("/notifications/:id/read", patch(mark_read))
        .route("/notifications/:id/sent", patch(mark_sent))
        .route("/notifications/:id/failed", patch(mark_failed))
}

fn check_title(title: &str) -> Result<()> {
    if title.trim().is_empty() || title.len() > 255 {
        return Err(AppError::Validation("Title must be 1-255 characters".into()));
    }
    Ok(())
}

#[instrument(skip(state, payload))]
pub async fn create_notification(
    State(state): State<AppState>,
    AuthUser { user_id, .. }: AuthUser,
    Json(payload): Json<CreateNotificationRequest>,
) -> Result<Json<Notification>> {
    check_title(&payload.title)?;
    let n = Notification::create(&state.db, &payload).await?;
    info!(notification_id = %n.id, user_id = %user_id, "notification created");
    Ok(Json(n))
}

#[instrument(skip(state))]
pub async fn list_notifications(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Paginated<Notification>>> {
    let (data, total) = Notification::list(&state.db, p.limit(), p.offset()).await?;
    Ok(Json(Paginated { data, total }))
}

#[instrument(skip(state))]
pub async fn pending_notifications(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<Vec<Notification>>> {
    Ok(Json(
        Notification::pending(&state.db, OffsetDateTime::now_utc()).await?,
    ))
}

#[instrument(skip(state))]
pub async fn upcoming_notifications(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(q): Query<UpcomingQuery>,
) -> Result<Json<Vec<Notification>>> {
    let now = OffsetDateTime::now_utc();
    let until = now + TimeDuration::hours(q.hours.clamp(1, 24 * 30));
    Ok(Json(Notification::upcoming(&state.db, now, until).await?))
}

#[instrument(skip(state))]
pub async fn unread_count(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<serde_json::Value>> {
    let count = Notification::unread_count(&state.db).await?;
    Ok(Json(serde_json::json!({ "count": count })))
}

#[instrument(skip(state))]
pub async fn by_priority(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(priority): Path<NotificationPriority>,
) -> Result<Json<Vec<Notification>>> {
    Ok(Json(Notification::by_priority(&state.db, priority).await?))
}

#[instrument(skip(state))]
pub async fn by_type(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(notification_type): Path<NotificationType>,
) -> Result<Json<Vec<Notification>>> {
    Ok(Json(
        Notification::by_type(&state.db, notification_type).await?,
    ))
}

#[instrument(skip(state))]
pub async fn by_module(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(module): Path<String>,
) -> Result<Json<Vec<Notification>>> {
    Ok(Json(Notification::by_module(&state.db, &module).await?))
}

#[instrument(skip(state))]
pub async fn search_notifications(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(q): Query<SearchQuery>,
) -> Result<Json<Vec<Notification>>> {
    Ok(Json(Notification::search(&state.db, &q.q).await?))
}

#[instrument(skip(state))]
pub async fn get_notification(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Notification>> {
    Ok(Json(Notification::find_by_id(&state.db, id).await?))
}

#[instrument(skip(state, payload))]
pub async fn update_notification(
    State(state): State<AppState>,
    AuthUser { user_id, .. }: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateNotificationRequest>,
) -> Result<Json<Notification>> {
    if let Some(title) = payload.title.as_deref() {
        check_title(title)?;
    }
    let n = Notification::update(&state.db, id, &payload).await?;
    info!(notification_id = %id, user_id = %user_id, "notification updated");
    Ok(Json(n))
}

#[instrument(skip(state))]
pub async fn mark_read(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Notification>> {
    Ok(Json(Notification::mark_read(&state.db, id).await?))
}

#[instrument(skip(state))]
pub async fn mark_sent(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Notification>> {
    Ok(Json(
        Notification::set_status(&state.db, id, NotificationStatus::Sent, true).await?,
    ))
}

#[instrument(skip(state))]
pub async fn mark_failed(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Notification>> {
    Ok(Json(
        Notification::set_status(&state.db, id, NotificationStatus::Failed, false).await?,
    ))
}

#[instrument(skip(state))]
pub async fn delete_notification(
    State(state): State<AppState>,
    AuthUser { user_id, .. }: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>> {
    Notification::delete(&state.db, id).await?;
    info!(notification_id = %id, user_id = %user_id, "notification deleted");
    Ok(Json(serde_json::json!({ "message": "Notification deleted" })))
}
