//! Image upload handler
//!
//! Handles POST /upload requests: stores the file, registers its metadata and
//! returns the new record.

use axum::{
    extract::{Multipart, State},
    Json,
};
use galleria_core::{ImageMetadata, ImageRecord, NewImage};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::handlers::AppState;
use crate::multipart::MultipartFields;

/// Multipart field carrying the image bytes. Also used as the stored name prefix.
pub const IMAGE_FIELD: &str = "image";

/// Response for successful upload
#[derive(Serialize, ToSchema)]
pub struct UploadResponse {
    /// Human-readable confirmation
    #[schema(example = "Image uploaded successfully!")]
    pub message: String,
    /// The registered image record
    pub image: ImageRecord,
}

/// Upload an image
///
/// Accepts multipart/form-data with:
/// - **image** (required): the image file
/// - **type** (optional): classification tag, default "regular"
/// - **title** (optional): default ""
/// - **description** (optional): default ""
#[utoipa::path(
    post,
    path = "/upload",
    tag = "Images",
    request_body(
        content_type = "multipart/form-data",
        description = "Image file with optional type, title and description"
    ),
    responses(
        (status = 200, description = "Image stored and registered", body = UploadResponse),
        (status = 400, description = "No image part in the request"),
        (status = 413, description = "Request body too large"),
        (status = 500, description = "File could not be written")
    )
)]
pub async fn upload_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut fields = MultipartFields::parse(&mut multipart, IMAGE_FIELD).await?;
    let file = fields.take_file()?;

    let metadata = ImageMetadata::from_fields(
        fields.get_text("type"),
        fields.get_text("title"),
        fields.get_text("description"),
    );

    let stored = state
        .store
        .save(IMAGE_FIELD, file.file_name.as_deref(), &file.data)
        .await?;

    let image = state.registry.append(NewImage::new(
        &state.public_base_url,
        stored.name,
        metadata,
    ));

    tracing::info!(
        id = image.id,
        name = %image.name,
        size = stored.size,
        content_type = file.content_type.as_deref().unwrap_or("unknown"),
        kind = %image.kind,
        "Image uploaded"
    );

    Ok(Json(UploadResponse {
        message: "Image uploaded successfully!".to_string(),
        image,
    }))
}
