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

use super::dto::{
    CreateEventRequest, DateRangeQuery, SearchQuery, UpcomingQuery, UpdateEventRequest,
};
use super::repo_types::{Event, EventType};

pub fn calendar_routes() -> Router<AppState> {
    Router::new()
        .route("/calendar", post(create_event).get(list_events))
        .route("/calendar/date-range", get(events_in_range))
        .route("/calendar/upcoming", get(upcoming_events))
        .route("/calendar/today", get(todays_events))
        .route("/calendar/favorites", get(list_favorites))
        .route("/calendar/recurring", get(recurring_events))
        .route("/calendar/type/:event_type", get(events_by_type))
        .route("/calendar/search", get(search_events))
        .route(
            "/calendar/:id",
            get(get_event).patch(update_event).delete(delete_event),
        )
        .route("/calendar/:id/complete", patch(complete_event))
}

fn check_title(title: &str) -> Result<()> {
    if title.trim().is_empty() || title.len() > 255 {
        return Err(AppError::Validation("Title must be 1-255 characters".into()));
    }
    Ok(())
}

#[instrument(skip(state, payload))]
pub async fn create_event(
    State(state): State<AppState>,
    AuthUser { user_id, .. }: AuthUser,
    Json(payload): Json<CreateEventRequest>,
) -> Result<Json<Event>> {
    check_title(&payload.title)?;
    let event = Event::create(&state.db, &payload).await?;
    info!(event_id = %event.id, user_id = %user_id, "event created");
    Ok(Json(event))
}

#[instrument(skip(state))]
pub async fn list_events(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Paginated<Event>>> {
    let (data, total) = Event::list(&state.db, p.limit(), p.offset()).await?;
    Ok(Json(Paginated { data, total }))
}

#[instrument(skip(state))]
pub async fn events_in_range(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(range): Query<DateRangeQuery>,
) -> Result<Json<Vec<Event>>> {
    Ok(Json(
        Event::in_range(&state.db, range.start_date, range.end_date).await?,
    ))
}

#[instrument(skip(state))]
pub async fn upcoming_events(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(q): Query<UpcomingQuery>,
) -> Result<Json<Vec<Event>>> {
    let now = OffsetDateTime::now_utc();
    let until = now + TimeDuration::days(q.days.clamp(1, 365));
    Ok(Json(Event::upcoming(&state.db, now, until).await?))
}

#[instrument(skip(state))]
pub async fn todays_events(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<Vec<Event>>> {
    let start = OffsetDateTime::now_utc().date().midnight().assume_utc();
    let end = start + TimeDuration::days(1);
    Ok(Json(Event::in_range(&state.db, start, end).await?))
}

#[instrument(skip(state))]
pub async fn list_favorites(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<Vec<Event>>> {
    Ok(Json(Event::favorites(&state.db).await?))
}

#[instrument(skip(state))]
pub async fn recurring_events(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<Vec<Event>>> {
    Ok(Json(Event::recurring(&state.db).await?))
}

#[instrument(skip(state))]
pub async fn events_by_type(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(event_type): Path<EventType>,
) -> Result<Json<Vec<Event>>> {
    Ok(Json(Event::by_type(&state.db, event_type).await?))
}

#[instrument(skip(state))]
pub async fn search_events(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(q): Query<SearchQuery>,
) -> Result<Json<Vec<Event>>> {
    Ok(Json(Event::search(&state.db, &q.q).await?))
}

#[instrument(skip(state))]
pub async fn get_event(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Event>> {
    Ok(Json(Event::find_by_id(&state.db, id).await?))
}

#[instrument(skip(state, payload))]
pub async fn update_event(
    State(state): State<AppState>,
    AuthUser { user_id, .. }: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateEventRequest>,
) -> Result<Json<Event>> {
    if let Some(title) = payload.title.as_deref() {
        check_title(title)?;
    }
    let event = Event::update(&state.db, id, &payload).await?;
    info!(event_id = %id, user_id = %user_id, "event updated");
    Ok(Json(event))
}

#[instrument(skip(state))]
pub async fn complete_event(
    State(state): State<AppState>,
    AuthUser { user_id, .. }: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Event>> {
    let event = Event::mark_completed(&state.db, id).await?;
    info!(event_id = %id, user_id = %user_id, "event completed");
    Ok(Json(event))
}

#[instrument(skip(state))]
pub async fn delete_event(
    State(state): State<AppState>,
    AuthUser { user_id, .. }: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>> {
    Event::delete(&state.db, id).await?;
    info!(event_id = %id, user_id = %user_id, "event deleted");
    Ok(Json(serde_json::json!({ "message": "Event deleted" })))
}
