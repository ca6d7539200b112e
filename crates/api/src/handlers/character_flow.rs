//! Handlers for the character creation flow (`/flows/character`).
//!
//! A preview is produced by generation or upload, then either committed to
//! the library or discarded.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use cameo_core::character::Character;
use cameo_core::image::ImageArtifact;
use cameo_pipeline::{CharacterDraft, FlowSnapshot};
use image::ImageFormat;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

type SnapshotResponse = Json<DataResponse<FlowSnapshot<CharacterDraft>>>;

#[derive(Debug, Deserialize)]
pub struct GenerateCharacterRequest {
    pub prompt: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CommitCharacterRequest {
    #[serde(default)]
    pub name: Option<String>,
}

/// GET /api/v1/flows/character
pub async fn status(State(state): State<AppState>) -> SnapshotResponse {
    Json(DataResponse::new(state.studio.character_flow().await))
}

/// POST /api/v1/flows/character/generate
///
/// Blocks until the portrait is ready or generation fails.
pub async fn generate(
    State(state): State<AppState>,
    Json(input): Json<GenerateCharacterRequest>,
) -> AppResult<SnapshotResponse> {
    let snapshot = state.studio.generate_character(&input.prompt).await?;
    Ok(Json(DataResponse::new(snapshot)))
}

/// POST /api/v1/flows/character/upload
///
/// Accepts a multipart form with a required `file` field holding a PNG,
/// JPEG or WebP image.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<SnapshotResponse> {
    let mut file_data: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() == Some("file") {
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            file_data = Some(data.to_vec());
        }
    }

    let data =
        file_data.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;
    let image = sniff_image(&data)?;

    let snapshot = state.studio.upload_character(image).await?;
    Ok(Json(DataResponse::new(snapshot)))
}

/// POST /api/v1/flows/character/commit
pub async fn commit(
    State(state): State<AppState>,
    Json(input): Json<CommitCharacterRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Character>>)> {
    let character = state.studio.commit_character(input.name.as_deref()).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(character))))
}

/// POST /api/v1/flows/character/discard
pub async fn discard(State(state): State<AppState>) -> AppResult<SnapshotResponse> {
    let snapshot = state.studio.discard_character().await?;
    Ok(Json(DataResponse::new(snapshot)))
}

/// Detect the image format from its magic bytes; the declared content type
/// is not trusted.
fn sniff_image(data: &[u8]) -> AppResult<ImageArtifact> {
    let format = image::guess_format(data)
        .map_err(|_| AppError::BadRequest("Uploaded file is not a recognized image".into()))?;

    match format {
        ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::WebP => {
            Ok(ImageArtifact::from_bytes(format.to_mime_type(), data)?)
        }
        other => Err(AppError::BadRequest(format!(
            "Unsupported image format {other:?}; use PNG, JPEG or WebP"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
    const JPEG_MAGIC: &[u8] = b"\xFF\xD8\xFF\xE0\0\x10JFIF";

    #[test]
    fn png_upload_keeps_bytes_and_mime() {
        let image = sniff_image(PNG_MAGIC).unwrap();
        assert_eq!(image.mime_type(), "image/png");
        assert_eq!(image.decode().unwrap(), PNG_MAGIC);
    }

    #[test]
    fn jpeg_is_detected_from_content() {
        assert_eq!(sniff_image(JPEG_MAGIC).unwrap().mime_type(), "image/jpeg");
    }

    #[test]
    fn text_is_rejected() {
        assert_matches!(sniff_image(b"hello world"), Err(AppError::BadRequest(_)));
    }

    #[test]
    fn gif_is_rejected() {
        assert_matches!(sniff_image(b"GIF89a\x01\0\x01\0"), Err(AppError::BadRequest(_)));
    }
}
