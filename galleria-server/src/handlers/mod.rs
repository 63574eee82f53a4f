//! HTTP request handlers
//!
//! This module contains all the request handlers for the API endpoints.

pub mod health;
pub mod images;
pub mod upload;

pub use crate::state::AppState;
pub use health::{health, ready, HealthResponse, ReadyResponse};
pub use images::list_images_handler;
pub use upload::{upload_handler, UploadResponse, IMAGE_FIELD};
