//! Galleria Core - image upload storage and metadata registry
//!
//! This crate holds the pieces of the Galleria image service that do not
//! depend on HTTP:
//!
//! - [`UploadStore`] writes uploaded bytes into a flat directory under
//!   collision-resistant generated names
//! - [`ImageRegistry`] keeps an ordered, append-only, in-memory list of
//!   [`ImageRecord`]s for the lifetime of the process
//!
//! # Example
//!
//! ```no_run
//! use galleria_core::{ImageMetadata, ImageRegistry, NewImage, UploadStore};
//!
//! # async fn example() -> galleria_core::Result<()> {
//! let store = UploadStore::open("uploads").await?;
//! let registry = ImageRegistry::new();
//!
//! let stored = store.save("image", Some("cat.png"), b"...").await?;
//! let metadata = ImageMetadata::from_fields(Some("banner"), Some("Cat"), None);
//! let record = registry.append(NewImage::new("http://localhost:5000", stored.name, metadata));
//!
//! assert_eq!(record.id, 1);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod record;
pub mod registry;
pub mod store;

pub use error::{GalleriaError, Result};
pub use record::{
    public_url, ImageMetadata, ImageRecord, NewImage, DEFAULT_IMAGE_KIND, PUBLIC_PREFIX,
};
pub use registry::ImageRegistry;
pub use store::{extension_of, generate_file_name, StoredFile, UploadStore, RANDOM_SUFFIX_MAX};
