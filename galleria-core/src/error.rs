use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GalleriaError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Upload directory {path} unavailable: {source}")]
    UploadDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Stored file name already taken: {0}")]
    NameCollision(String),

    #[error("Invalid stored file name: {0}")]
    InvalidFileName(String),
}

pub type Result<T> = std::result::Result<T, GalleriaError>;
