use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::auth::extractors::AuthUser;
use crate::error::{AppError, Result};
use crate::pagination::{Paginated, Pagination};
use crate::state::AppState;

use super::dto::{CreateNoteRequest, SearchQuery, UpdateNoteRequest};
use super::repo_types::Note;

pub fn note_routes() -> Router<AppState> {
    Router::new()
        .route("/notes", post(create_note).get(list_notes))
        .route("/notes/search", get(search_notes))
        .route("/notes/favorites", get(list_favorites))
        .route(
            "/notes/:id",
            get(get_note).patch(update_note).delete(delete_note),
        )
}

fn check_note_fields(title: Option<&str>, tags: Option<&str>) -> Result<()> {
    if let Some(title) = title {
        if title.trim().is_empty() || title.len() > 255 {
            return Err(AppError::Validation(
                "Title must be 1-255 characters".into(),
            ));
        }
    }
    if let Some(tags) = tags {
        if tags.len() > 500 {
            return Err(AppError::Validation(
                "Tags must be at most 500 characters".into(),
            ));
        }
    }
    Ok(())
}

#[instrument(skip(state, payload))]
pub async fn create_note(
    State(state): State<AppState>,
    AuthUser { user_id, .. }: AuthUser,
    Json(payload): Json<CreateNoteRequest>,
) -> Result<Json<Note>> {
    check_note_fields(Some(&payload.title), payload.tags.as_deref())?;
    let note = Note::create(
        &state.db,
        &payload.title,
        payload.content.as_deref(),
        payload.tags.as_deref(),
        payload.is_favorite,
    )
    .await?;
    info!(note_id = %note.id, user_id = %user_id, "note created");
    Ok(Json(note))
}

#[instrument(skip(state))]
pub async fn list_notes(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Paginated<Note>>> {
    let (data, total) = Note::list(&state.db, p.limit(), p.offset()).await?;
    Ok(Json(Paginated { data, total }))
}

#[instrument(skip(state))]
pub async fn search_notes(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(q): Query<SearchQuery>,
) -> Result<Json<Vec<Note>>> {
    Ok(Json(Note::search(&state.db, &q.q).await?))
}

#[instrument(skip(state))]
pub async fn list_favorites(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<Vec<Note>>> {
    Ok(Json(Note::favorites(&state.db).await?))
}

#[instrument(skip(state))]
pub async fn get_note(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Note>> {
    Ok(Json(Note::find_by_id(&state.db, id).await?))
}

#[instrument(skip(state, payload))]
pub async fn update_note(
    State(state): State<AppState>,
    AuthUser { user_id, .. }: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateNoteRequest>,
) -> Result<Json<Note>> {
    check_note_fields(payload.title.as_deref(), payload.tags.as_deref())?;
    let note = Note::update(
        &state.db,
        id,
        payload.title.as_deref(),
        payload.content.as_deref(),
        payload.tags.as_deref(),
        payload.is_favorite,
    )
    .await?;
    info!(note_id = %id, user_id = %user_id, "note updated");
    Ok(Json(note))
}

#[instrument(skip(state))]
pub async fn delete_note(
    State(state): State<AppState>,
    AuthUser { user_id, .. }: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>> {
    Note::delete(&state.db, id).await?;
    info!(note_id = %id, user_id = %user_id, "note deleted");
    Ok(Json(serde_json::json!({ "message": "Note deleted" })))
}
