//! Menu image storage.
//!
//! `POST /images` takes a multipart upload (field `file`) and stores it under
//! the configured directory as `<random>_<unix millis>.<ext>`.
//! `GET /images/{name}` serves it back.

use std::path::PathBuf;

use api_types::upload::ImageUploaded;
use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif"];

#[derive(Clone, Debug)]
pub(crate) struct ImageStore {
    dir: PathBuf,
    public_url: String,
}

impl ImageStore {
    pub(crate) fn new(dir: PathBuf, public_url: &str) -> Self {
        Self {
            dir,
            public_url: public_url.trim_end_matches('/').to_string(),
        }
    }

    fn url_for(&self, filename: &str) -> String {
        format!("{}/images/{filename}", self.public_url)
    }
}

/// Lowercased extension of an uploaded file name, if supported.
fn supported_extension(filename: &str) -> Option<String> {
    let ext = std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)?;
    SUPPORTED_FORMATS.contains(&ext.as_str()).then_some(ext)
}

fn stored_name(ext: &str) -> String {
    format!(
        "{}_{}.{ext}",
        Uuid::new_v4().simple(),
        Utc::now().timestamp_millis()
    )
}

/// Names we hand out never contain separators; anything else is rejected.
fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

fn content_type(name: &str) -> &'static str {
    match supported_extension(name).as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

pub async fn upload(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ImageUploaded>), ServerError> {
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::Generic(format!("multipart error: {e}")))?
    {
        if field.name() == Some("file") {
            let original = field.file_name().unwrap_or_default().to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| ServerError::Generic(format!("read error: {e}")))?;
            file = Some((original, data.to_vec()));
            break;
        }
    }

    let (original, data) = file.ok_or_else(|| ServerError::Generic("no file provided".to_string()))?;
    if data.is_empty() {
        return Err(ServerError::Generic("empty file".to_string()));
    }
    let ext = supported_extension(&original).ok_or_else(|| {
        ServerError::Generic(format!(
            "unsupported format: {original}. Supported: {}",
            SUPPORTED_FORMATS.join(", ")
        ))
    })?;

    let filename = stored_name(&ext);
    let path = state.images.dir.join(&filename);
    if let Err(err) = tokio::fs::write(&path, &data).await {
        tracing::error!("failed to store image {}: {err}", path.display());
        return Err(ServerError::Internal("failed to store image".to_string()));
    }
    tracing::info!(%filename, bytes = data.len(), "image stored");

    Ok((
        StatusCode::CREATED,
        Json(ImageUploaded {
            url: state.images.url_for(&filename),
            filename,
        }),
    ))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
    if !is_safe_name(&name) {
        return Err(ServerError::NotFound("image not found".to_string()));
    }
    let bytes = tokio::fs::read(state.images.dir.join(&name))
        .await
        .map_err(|_| ServerError::NotFound("image not found".to_string()))?;
    Ok(([(header::CONTENT_TYPE, content_type(&name))], bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_name_has_token_timestamp_and_extension() {
        let name = stored_name("png");
        let (stem, ext) = name.rsplit_once('.').unwrap();
        assert_eq!(ext, "png");
        let (token, millis) = stem.split_once('_').unwrap();
        assert_eq!(token.len(), 32);
        assert!(millis.parse::<i64>().is_ok());
        assert!(is_safe_name(&name));
    }

    #[test]
    fn extensions_are_checked_case_insensitively() {
        assert_eq!(supported_extension("Photo.JPG").as_deref(), Some("jpg"));
        assert_eq!(supported_extension("menu.exe"), None);
        assert_eq!(supported_extension("noext"), None);
    }

    #[test]
    fn traversal_names_are_rejected() {
        assert!(!is_safe_name("../secret"));
        assert!(!is_safe_name("a/b.png"));
        assert!(!is_safe_name(".hidden"));
        assert!(is_safe_name("abc_123.png"));
    }

    #[test]
    fn public_url_trailing_slash_is_ignored() {
        let store = ImageStore::new(PathBuf::from("/tmp"), "http://host:3000/");
        assert_eq!(store.url_for("a.png"), "http://host:3000/images/a.png");
    }
}
