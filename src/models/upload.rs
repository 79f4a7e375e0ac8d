//! Uploaded image metadata.

use serde::{Deserialize, Serialize};

/// Stored image returned by `POST /api/upload/image`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedImage {
    pub filename: String,
    pub url: String,
    pub size: u64,
    pub mimetype: String,
}
