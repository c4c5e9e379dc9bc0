use axum::extract::DefaultBodyLimit;
use axum::Router;

use crate::state::AppState;

pub mod dto;
pub mod handlers;
mod repo;
pub mod repo_types;
pub mod upload;

pub fn router(max_upload: usize) -> Router<AppState> {
    handlers::file_routes().layer(DefaultBodyLimit::max(max_upload))
}
