use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// Metadata for a blob stored on local disk.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    pub id: i64,
    pub filename: String,
    pub original_filename: String,
    pub file_path: String,
    pub file_type: String,
    pub file_size: i64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<String>,
    pub is_favorite: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}
