//! Image Upload Handler

use axum::Json;
use axum::extract::{Multipart, State};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::io::Cursor;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

/// Maximum upload size (5MB)
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// JPEG quality for stored images
const JPEG_QUALITY: u8 = 85;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub filename: String,
    pub size: usize,
    /// Path under this server, `/images/<hash>.jpg`
    pub url: String,
}

/// POST /api/upload - multipart form with an `image` (or `file`) part
pub async fn upload(
    State(state): State<ServerState>,
    _user: CurrentUser,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    let mut data: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default();
        if name == "image" || name == "file" {
            let bytes = field.bytes().await?;
            data = Some(bytes.to_vec());
            break;
        }
    }

    let data = data.ok_or_else(|| AppError::validation("Missing image field"))?;
    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::validation(format!(
            "File too large, maximum is {}MB",
            MAX_FILE_SIZE / 1024 / 1024
        )));
    }

    let jpeg = convert_to_jpeg(&data)?;

    let mut hasher = Sha256::new();
    hasher.update(&jpeg);
    let hash = hex::encode(hasher.finalize());
    let filename = format!("{hash}.jpg");

    let path = state.config.images_dir().join(&filename);
    if !path.exists() {
        std::fs::write(&path, &jpeg)
            .map_err(|e| AppError::internal(format!("Failed to store image: {e}")))?;
    }

    Ok(Json(UploadResponse {
        url: format!("/images/{filename}"),
        size: jpeg.len(),
        filename,
    }))
}

fn convert_to_jpeg(data: &[u8]) -> AppResult<Vec<u8>> {
    let img = image::load_from_memory(data)
        .map_err(|e| AppError::validation(format!("Invalid image: {e}")))?;

    let mut buffer = Vec::new();
    {
        let mut cursor = Cursor::new(&mut buffer);
        let rgb = img.to_rgb8();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
        rgb.write_with_encoder(encoder)
            .map_err(|e| AppError::internal(format!("Failed to encode image: {e}")))?;
    }
    Ok(buffer)
}
