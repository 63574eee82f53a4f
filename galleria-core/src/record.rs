//! Image metadata records
//!
//! An [`ImageRecord`] describes one stored upload. Records are built as a
//! [`NewImage`] by the upload path and receive their `id` from the
//! [`ImageRegistry`](crate::ImageRegistry) when appended.

use serde::{Deserialize, Serialize};

/// Classification used when the client does not send a `type` field.
pub const DEFAULT_IMAGE_KIND: &str = "regular";

/// URL path prefix under which stored files are served.
pub const PUBLIC_PREFIX: &str = "/uploads";

/// Descriptor of one stored image, as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ImageRecord {
    /// 1-based position in the registry at insertion time
    #[cfg_attr(feature = "openapi", schema(example = 1))]
    pub id: u64,
    /// Fully-qualified retrieval URL
    #[cfg_attr(
        feature = "openapi",
        schema(example = "http://localhost:5000/uploads/image-1704067200000-123456789.png")
    )]
    pub url: String,
    /// On-disk filename, unique per upload
    #[cfg_attr(
        feature = "openapi",
        schema(example = "image-1704067200000-123456789.png")
    )]
    pub name: String,
    /// Free-text classification tag ("regular", "banner", ...)
    #[serde(rename = "type")]
    #[cfg_attr(feature = "openapi", schema(example = "regular"))]
    pub kind: String,
    pub title: String,
    pub description: String,
}

/// Client supplied metadata with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageMetadata {
    pub kind: String,
    pub title: String,
    pub description: String,
}

impl ImageMetadata {
    /// Build metadata from optional form values.
    ///
    /// Missing or empty `kind` falls back to [`DEFAULT_IMAGE_KIND`]; missing
    /// `title` and `description` become empty strings.
    pub fn from_fields(
        kind: Option<&str>,
        title: Option<&str>,
        description: Option<&str>,
    ) -> Self {
        let kind = match kind {
            Some(k) if !k.is_empty() => k.to_string(),
            _ => DEFAULT_IMAGE_KIND.to_string(),
        };

        Self {
            kind,
            title: title.unwrap_or_default().to_string(),
            description: description.unwrap_or_default().to_string(),
        }
    }
}

impl Default for ImageMetadata {
    fn default() -> Self {
        Self::from_fields(None, None, None)
    }
}

/// An image that has been stored but not yet registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewImage {
    pub url: String,
    pub name: String,
    pub metadata: ImageMetadata,
}

impl NewImage {
    /// Describe a stored file, deriving its public URL from `base_url`.
    pub fn new(base_url: &str, name: impl Into<String>, metadata: ImageMetadata) -> Self {
        let name = name.into();
        Self {
            url: public_url(base_url, &name),
            name,
            metadata,
        }
    }

    /// Attach the registry-assigned id.
    pub(crate) fn into_record(self, id: u64) -> ImageRecord {
        ImageRecord {
            id,
            url: self.url,
            name: self.name,
            kind: self.metadata.kind,
            title: self.metadata.title,
            description: self.metadata.description,
        }
    }
}

/// `<base_url>/uploads/<name>`, tolerating a trailing slash on the base.
pub fn public_url(base_url: &str, name: &str) -> String {
    format!("{}{}/{}", base_url.trim_end_matches('/'), PUBLIC_PREFIX, name)
}
