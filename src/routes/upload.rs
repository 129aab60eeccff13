//! Image upload endpoint
//!
//! POST /api/v1/upload_image
//!
//! Multipart form with a `file` field holding a JPEG or PNG image. The
//! original is stored, analyzed and annotated; the response carries the
//! extracted fields and the annotated image as base64 PNG.

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::Instrument;
use uuid::Uuid;

use crate::annotate::SourceImage;
use crate::error::{AppError, Result};
use crate::fields::FieldRecord;
use crate::state::AppState;
use crate::storage::sanitize_file_name;

/// Content types accepted for upload
pub const SUPPORTED_CONTENT_TYPES: [&str; 2] = ["image/jpeg", "image/png"];

/// Upload response
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadImageResponse {
    pub extracted_data: FieldRecord,
    /// Base64-encoded PNG with highlights and legend
    pub highlighted_image: String,
}

/// Create the upload router
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/upload_image", post(upload_image))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

/// Whether `content_type` names JPEG or PNG (parameters ignored)
pub fn is_supported_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    SUPPORTED_CONTENT_TYPES.contains(&essence.as_str())
}

async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadImageResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        if !is_supported_content_type(&content_type) {
            tracing::warn!(content_type = %content_type, "Rejected upload with unsupported type");
            return Err(AppError::BadRequest(format!(
                "Invalid file type '{}'. Only JPEG and PNG images are supported.",
                content_type
            )));
        }

        let file_name = sanitize_file_name(field.file_name().unwrap_or_default());
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read file data: {}", e)))?;

        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("upload", %request_id, file_name = %file_name);

        return process_upload(&state, &file_name, data.to_vec())
            .instrument(span)
            .await
            .map(Json);
    }

    tracing::warn!("No file field found in multipart upload");
    Err(AppError::BadRequest(
        "No file provided. Use field name 'file'".to_string(),
    ))
}

async fn process_upload(
    state: &AppState,
    file_name: &str,
    data: Vec<u8>,
) -> Result<UploadImageResponse> {
    tracing::info!(size = data.len(), "Received image upload");

    state.image_store().save_original(file_name, &data).await?;

    let source = SourceImage::decode(data)
        .map_err(|e| AppError::BadRequest(format!("Invalid image: {}", e)))?;

    let output = state.pipeline().run(source).await?;

    state
        .image_store()
        .save_annotated(file_name, output.annotated.as_bytes())
        .await?;

    let mut fields_found = 0;
    for (field, value) in output.fields.iter() {
        if value.is_empty() {
            tracing::debug!(field = field.display_name(), "Field not found");
        } else {
            fields_found += 1;
        }
    }

    tracing::info!(
        detections = output.detections.len(),
        fields_found,
        "Image processed"
    );

    Ok(UploadImageResponse {
        highlighted_image: output.annotated.to_base64(),
        extracted_data: output.fields,
    })
}
