//! OpenAPI documentation configuration
//!
//! Generates the OpenAPI 3 document served at `/api-docs/openapi.json`.

use galleria_core::ImageRecord;
use utoipa::OpenApi;

use crate::handlers::{HealthResponse, ReadyResponse, UploadResponse};

/// Galleria image API - OpenAPI Documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Galleria - Image API",
        version = "0.1.0",
        description = r#"
## Image upload and hosting API

1. **Upload** an image with `POST /upload` (multipart field `image`, optional `type`, `title`, `description`)
2. **List** every uploaded image with `GET /api/images`
3. **Fetch** the raw file from the returned `url` (`GET /uploads/{name}`)

Metadata lives in memory and is cleared when the server restarts; files stay on disk.
"#,
        license(name = "MIT OR Apache-2.0")
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development server")
    ),
    tags(
        (name = "Images", description = "Upload and list images"),
        (name = "Health", description = "Service health and readiness endpoints")
    ),
    paths(
        crate::handlers::health::health,
        crate::handlers::health::ready,
        crate::handlers::upload::upload_handler,
        crate::handlers::images::list_images_handler,
    ),
    components(
        schemas(
            HealthResponse,
            ReadyResponse,
            UploadResponse,
            ImageRecord,
        )
    )
)]
pub struct ApiDoc;
