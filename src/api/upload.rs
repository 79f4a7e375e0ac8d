//! Image upload endpoints.

use std::path::Path as FsPath;

use axum::{
    extract::{multipart::Field, Multipart, Path, State},
    http::{header, HeaderMap},
};
use chrono::Utc;

use super::{acknowledged, error, success, ApiResult};
use crate::errors::AppError;
use crate::models::UploadedImage;
use crate::AppState;

/// Largest accepted image, in bytes.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Multipart field carrying the image.
const IMAGE_FIELD: &str = "image";

/// POST /api/upload/image - Store a single image.
pub async fn upload_image(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> ApiResult<UploadedImage> {
    match store_image(&state, &headers, multipart).await {
        Ok(image) => success(image).map(|r| r.with_message("Image uploaded successfully")),
        Err(e) => error(e, "Error uploading image"),
    }
}

/// DELETE /api/upload/image/:filename - Remove a stored image.
pub async fn delete_image(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> ApiResult<()> {
    if !is_safe_filename(&filename) {
        return error(
            AppError::NotFound("Image not found".to_string()),
            "Error deleting image",
        );
    }

    match tokio::fs::remove_file(state.config.upload_dir.join(&filename)).await {
        Ok(()) => {
            tracing::info!(%filename, "image deleted");
            acknowledged("Image deleted successfully")
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => error(
            AppError::NotFound("Image not found".to_string()),
            "Error deleting image",
        ),
        Err(e) => error(e.into(), "Error deleting image"),
    }
}

async fn store_image(
    state: &AppState,
    headers: &HeaderMap,
    mut multipart: Multipart,
) -> Result<UploadedImage, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        return save_field(state, headers, field).await;
    }

    Err(AppError::BadRequest("No image file provided".to_string()))
}

async fn save_field(
    state: &AppState,
    headers: &HeaderMap,
    field: Field<'_>,
) -> Result<UploadedImage, AppError> {
    let mimetype = field.content_type().unwrap_or_default().to_string();
    if !mimetype.starts_with("image/") {
        return Err(AppError::BadRequest(
            "Only image files are allowed".to_string(),
        ));
    }

    let extension = field
        .file_name()
        .map(file_extension)
        .unwrap_or_default();
    let bytes = field.bytes().await.map_err(multipart_error)?;

    if bytes.is_empty() {
        return Err(AppError::BadRequest("No image file provided".to_string()));
    }
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(AppError::BadRequest(
            "Image exceeds the 5 MB size limit".to_string(),
        ));
    }

    let filename = unique_filename(&extension);
    tokio::fs::create_dir_all(&state.config.upload_dir).await?;
    tokio::fs::write(state.config.upload_dir.join(&filename), &bytes).await?;

    tracing::info!(%filename, size = bytes.len(), %mimetype, "image stored");

    Ok(UploadedImage {
        url: format!("{}/uploads/{}", base_url(state, headers), filename),
        filename,
        size: bytes.len() as u64,
        mimetype,
    })
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::BadRequest(format!("Invalid upload: {}", e.body_text()))
}

/// `<millis>-<random><ext>`
fn unique_filename(extension: &str) -> String {
    let random = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "{}-{}{}",
        Utc::now().timestamp_millis(),
        &random[..12],
        extension
    )
}

/// Lowercased `.ext` of the client file name, or empty when it has none usable.
fn file_extension(name: &str) -> String {
    FsPath::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
        .unwrap_or_default()
}

/// Names we generated never contain separators or start with a dot.
fn is_safe_filename(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.contains("..")
        && !name.contains('/')
        && !name.contains('\\')
}

fn base_url(state: &AppState, headers: &HeaderMap) -> String {
    if let Some(url) = &state.config.public_url {
        return url.clone();
    }
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| state.config.bind_addr.to_string());
    format!("http://{}", host)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("photo.JPG"), ".jpg");
        assert_eq!(file_extension("archive.tar.gz"), ".gz");
        assert_eq!(file_extension("noext"), "");
        assert_eq!(file_extension("weird.p$g"), "");
    }

    #[test]
    fn test_unique_filename_shape() {
        let a = unique_filename(".png");
        let b = unique_filename(".png");
        assert_ne!(a, b);
        assert!(a.ends_with(".png"));
        let (millis, rest) = a.split_once('-').unwrap();
        assert!(millis.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(rest.len(), 12 + ".png".len());
    }

    #[test]
    fn test_is_safe_filename() {
        assert!(is_safe_filename("1700000000000-abcdef123456.png"));
        assert!(!is_safe_filename("../secret"));
        assert!(!is_safe_filename("a/b.png"));
        assert!(!is_safe_filename("a\\b.png"));
        assert!(!is_safe_filename(".env"));
        assert!(!is_safe_filename(""));
    }
}
