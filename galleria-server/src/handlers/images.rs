//! Image listing handler

use axum::{extract::State, Json};
use galleria_core::ImageRecord;

use crate::handlers::AppState;

/// List all uploaded images
///
/// Returns every registered image in upload order. The list is empty until
/// the first upload and is reset when the server restarts.
#[utoipa::path(
    get,
    path = "/api/images",
    tag = "Images",
    responses(
        (status = 200, description = "All image records in upload order", body = [ImageRecord])
    )
)]
pub async fn list_images_handler(State(state): State<AppState>) -> Json<Vec<ImageRecord>> {
    Json(state.registry.list_all())
}
