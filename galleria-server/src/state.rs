//! Application state module
//!
//! Defines shared state accessible across all request handlers.

use std::sync::Arc;

use galleria_core::{ImageRegistry, UploadStore};

use crate::config::Config;

/// Application state containing shared resources.
#[derive(Clone)]
pub struct AppState {
    /// In-memory metadata registry for uploaded images
    pub registry: Arc<ImageRegistry>,
    /// Upload directory store
    pub store: Arc<UploadStore>,
    /// Base URL used when building image URLs
    pub public_base_url: Arc<str>,
}

impl AppState {
    /// Build state around an already opened store with an empty registry.
    pub fn new(store: UploadStore, public_base_url: impl Into<Arc<str>>) -> Self {
        Self {
            registry: Arc::new(ImageRegistry::new()),
            store: Arc::new(store),
            public_base_url: public_base_url.into(),
        }
    }

    /// Open the configured upload directory (creating it if missing) and
    /// build fresh state.
    pub async fn from_config(config: &Config) -> galleria_core::Result<Self> {
        let store = UploadStore::open(&config.upload_dir).await?;
        Ok(Self::new(store, config.public_base_url.as_str()))
    }
}
