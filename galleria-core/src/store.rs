//! Upload storage
//!
//! Writes uploaded bytes into a single flat directory under generated names
//! of the form `<tag>-<unix-millis>-<random>.<ext>`.
//!
//! Uniqueness is best effort: two uploads in the same millisecond collide
//! only if they also draw the same number from `0..=999_999_999`. Files are
//! opened with create-new semantics, so a collision surfaces as
//! [`GalleriaError::NameCollision`] instead of overwriting an earlier upload.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use rand::Rng;
use tokio::io::AsyncWriteExt;

use crate::error::{GalleriaError, Result};

/// Upper bound (inclusive) of the random name component
pub const RANDOM_SUFFIX_MAX: u32 = 999_999_999;

/// Longest original extension carried over to the stored name
const MAX_EXTENSION_LEN: usize = 16;

/// A file written by [`UploadStore::save`]
#[derive(Debug, Clone)]
pub struct StoredFile {
    /// Generated filename (no directory component)
    pub name: String,
    /// Full path on disk
    pub path: PathBuf,
    /// Number of bytes written
    pub size: usize,
}

/// Flat-directory file store for uploaded images
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    /// Open the store at `root`, creating the directory if missing.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|source| GalleriaError::UploadDir {
                path: root.clone(),
                source,
            })?;

        tracing::debug!(root = %root.display(), "Upload directory ready");
        Ok(Self { root })
    }

    /// Wrap an existing directory without touching the filesystem.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether the upload directory currently exists.
    pub async fn is_available(&self) -> bool {
        tokio::fs::metadata(&self.root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
    }

    /// Resolve a stored filename to its path, rejecting anything that is not
    /// a plain name inside the store.
    pub fn path_for(&self, name: &str) -> Result<PathBuf> {
        let is_plain = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\', '\0']);

        if !is_plain {
            return Err(GalleriaError::InvalidFileName(name.to_string()));
        }
        Ok(self.root.join(name))
    }

    /// Write `bytes` under a freshly generated name derived from `tag` and
    /// the extension of `original_name`.
    pub async fn save(
        &self,
        tag: &str,
        original_name: Option<&str>,
        bytes: &[u8],
    ) -> Result<StoredFile> {
        let name = generate_file_name(tag, original_name);
        let path = self.path_for(&name)?;

        let mut file = match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(GalleriaError::NameCollision(name));
            }
            Err(e) => return Err(e.into()),
        };

        file.write_all(bytes).await?;
        file.flush().await?;

        tracing::debug!(name = %name, size = bytes.len(), "Stored upload");

        Ok(StoredFile {
            name,
            path,
            size: bytes.len(),
        })
    }
}

/// Build `<tag>-<unix-millis>-<random>[.<ext>]`.
pub fn generate_file_name(tag: &str, original_name: Option<&str>) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix = rand::rng().random_range(0..=RANDOM_SUFFIX_MAX);

    match original_name.and_then(extension_of) {
        Some(ext) => format!("{tag}-{millis}-{suffix}.{ext}"),
        None => format!("{tag}-{millis}-{suffix}"),
    }
}

/// Extension of a client-supplied filename, if it is short ASCII alphanumeric.
///
/// Only the last path component is considered, with either separator style.
pub fn extension_of(original_name: &str) -> Option<&str> {
    let base = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_name);

    let (stem, ext) = base.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || ext.len() > MAX_EXTENSION_LEN {
        return None;
    }
    ext.chars().all(|c| c.is_ascii_alphanumeric()).then_some(ext)
}
