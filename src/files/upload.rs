use std::path::{Path, PathBuf};

use bytes::Bytes;
use tracing::warn;
use uuid::Uuid;

use crate::config::UploadConfig;
use crate::error::{AppError, Result};

/// One file extracted from a multipart request.
#[derive(Debug)]
pub struct IncomingFile {
    pub original_filename: String,
    pub content_type: String,
    pub body: Bytes,
}

pub fn validate(cfg: &UploadConfig, file: &IncomingFile) -> Result<()> {
    if file.body.is_empty() {
        return Err(AppError::Validation("No file uploaded".into()));
    }
    if file.body.len() > cfg.max_file_size {
        return Err(AppError::Validation(format!(
            "File size exceeds {} bytes",
            cfg.max_file_size
        )));
    }
    if !cfg.allowed_types.iter().any(|t| t == &file.content_type) {
        return Err(AppError::Validation("File type not supported".into()));
    }
    Ok(())
}

/// Write the blob under the upload directory with a collision-free name.
/// Returns (stored filename, full path).
pub async fn save(cfg: &UploadConfig, file: &IncomingFile) -> Result<(String, PathBuf)> {
    tokio::fs::create_dir_all(&cfg.dir)
        .await
        .map_err(|e| anyhow::anyhow!("create upload dir: {e}"))?;

    let ext = Path::new(&file.original_filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();
    let filename = format!("file-{}{ext}", Uuid::new_v4());
    let path = Path::new(&cfg.dir).join(&filename);

    tokio::fs::write(&path, &file.body)
        .await
        .map_err(|e| anyhow::anyhow!("write upload: {e}"))?;

    Ok((filename, path))
}

/// Best effort: a missing blob must not block deleting the record.
pub async fn remove(path: &str) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        warn!(path = %path, error = %e, "could not remove stored file");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> UploadConfig {
        UploadConfig {
            dir: std::env::temp_dir()
                .join("thinkcate-upload-tests")
                .to_string_lossy()
                .into_owned(),
            max_file_size: 16,
            allowed_types: vec!["text/plain".into()],
        }
    }

    fn incoming(body: &[u8], content_type: &str) -> IncomingFile {
        IncomingFile {
            original_filename: "notes.txt".into(),
            content_type: content_type.into(),
            body: Bytes::copy_from_slice(body),
        }
    }

    #[test]
    fn rejects_empty_oversized_and_disallowed() {
        let cfg = cfg();
        assert!(validate(&cfg, &incoming(b"", "text/plain")).is_err());
        assert!(validate(&cfg, &incoming(&[0u8; 17], "text/plain")).is_err());
        assert!(validate(&cfg, &incoming(b"hi", "application/zip")).is_err());
        assert!(validate(&cfg, &incoming(b"hi", "text/plain")).is_ok());
    }

    #[tokio::test]
    async fn save_keeps_extension_and_generates_unique_names() {
        let cfg = cfg();
        let file = incoming(b"hello", "text/plain");
        let (name_a, path_a) = save(&cfg, &file).await.expect("save a");
        let (name_b, path_b) = save(&cfg, &file).await.expect("save b");
        assert_ne!(name_a, name_b);
        assert!(name_a.ends_with(".txt"));
        assert_eq!(tokio::fs::read(&path_a).await.unwrap(), b"hello");
        remove(&path_a.to_string_lossy()).await;
        remove(&path_b.to_string_lossy()).await;
    }
}
