use axum::{
    extract::{Multipart, Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::auth::extractors::AuthUser;
use crate::error::{AppError, Result};
use crate::pagination::{Paginated, Pagination};
use crate::state::AppState;

use super::dto::{SearchQuery, UpdateFileRequest, UploadMeta};
use super::repo_types::StoredFile;
use super::upload::{self, IncomingFile};

pub fn file_routes() -> Router<AppState> {
    Router::new()
        .route("/files/upload", post(upload_file))
        .route("/files", get(list_files))
        .route("/files/search", get(search_files))
        .route("/files/favorites", get(list_favorites))
        .route("/files/type/:file_type", get(list_by_type))
        .route(
            "/files/:id",
            get(get_file).patch(update_file).delete(delete_file),
        )
}

async fn read_multipart(mut multipart: Multipart) -> Result<(IncomingFile, UploadMeta)> {
    let mut file: Option<IncomingFile> = None;
    let mut meta = UploadMeta::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.to_string()))?
    {
        match field.name() {
            Some("file") => {
                let original_filename = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| AppError::Validation("File part needs a filename".into()))?;
                let content_type = field
                    .content_type()
                    .map(str::to_string)
                    .unwrap_or_else(|| "application/octet-stream".into());
                let body = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(e.to_string()))?;
                file = Some(IncomingFile {
                    original_filename,
                    content_type,
                    body,
                });
            }
            Some("title") => meta.title = Some(text(field).await?),
            Some("description") => meta.description = Some(text(field).await?),
            Some("tags") => meta.tags = Some(text(field).await?),
            _ => {}
        }
    }

    let file = file.ok_or_else(|| AppError::Validation("No file uploaded".into()))?;
    Ok((file, meta))
}

async fn text(field: axum::extract::multipart::Field<'_>) -> Result<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(e.to_string()))
}

#[instrument(skip(state, multipart))]
pub async fn upload_file(
    State(state): State<AppState>,
    AuthUser { user_id, .. }: AuthUser,
    multipart: Multipart,
) -> Result<Json<StoredFile>> {
    let (incoming, meta) = read_multipart(multipart).await?;
    upload::validate(&state.config.upload, &incoming)?;

    let (filename, path) = upload::save(&state.config.upload, &incoming).await?;
    let record = StoredFile::create(
        &state.db,
        &filename,
        &incoming.original_filename,
        &path.to_string_lossy(),
        &incoming.content_type,
        incoming.body.len() as i64,
        &meta,
    )
    .await;

    // The row is the source of truth: if the insert fails, drop the blob.
    let record = match record {
        Ok(r) => r,
        Err(e) => {
            upload::remove(&path.to_string_lossy()).await;
            return Err(e);
        }
    };

    info!(file_id = %record.id, user_id = %user_id, size = %record.file_size, "file uploaded");
    Ok(Json(record))
}

#[instrument(skip(state))]
pub async fn list_files(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Paginated<StoredFile>>> {
    let (data, total) = StoredFile::list(&state.db, p.limit(), p.offset()).await?;
    Ok(Json(Paginated { data, total }))
}

#[instrument(skip(state))]
pub async fn search_files(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(q): Query<SearchQuery>,
) -> Result<Json<Vec<StoredFile>>> {
    Ok(Json(StoredFile::search(&state.db, &q.q).await?))
}

#[instrument(skip(state))]
pub async fn list_favorites(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<Vec<StoredFile>>> {
    Ok(Json(StoredFile::favorites(&state.db).await?))
}

#[instrument(skip(state))]
pub async fn list_by_type(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(file_type): Path<String>,
) -> Result<Json<Vec<StoredFile>>> {
    Ok(Json(StoredFile::by_type(&state.db, &file_type).await?))
}

#[instrument(skip(state))]
pub async fn get_file(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<StoredFile>> {
    Ok(Json(StoredFile::find_by_id(&state.db, id).await?))
}

#[instrument(skip(state, payload))]
pub async fn update_file(
    State(state): State<AppState>,
    AuthUser { user_id, .. }: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateFileRequest>,
) -> Result<Json<StoredFile>> {
    let file = StoredFile::update(&state.db, id, &payload).await?;
    info!(file_id = %id, user_id = %user_id, "file metadata updated");
    Ok(Json(file))
}

#[instrument(skip(state))]
pub async fn delete_file(
    State(state): State<AppState>,
    AuthUser { user_id, .. }: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>> {
    let file = StoredFile::find_by_id(&state.db, id).await?;
    StoredFile::delete(&state.db, id).await?;
    upload::remove(&file.file_path).await;
    info!(file_id = %id, user_id = %user_id, "file deleted");
    Ok(Json(serde_json::json!({ "message": "File deleted" })))
}
