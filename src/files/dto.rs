use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFileRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<String>,
    pub is_favorite: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

/// Metadata parts accepted alongside the `file` part of an upload.
#[derive(Debug, Default)]
pub struct UploadMeta {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<String>,
}
