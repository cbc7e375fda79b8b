use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JtmError {
    #[error("directory not found or unreadable '{}': {source}", path.display())]
    NotFound {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode '{}' as an image: {source}", path.display())]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("shape error: {0}")]
    Shape(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("load cancelled after {loaded} images")]
    Cancelled { loaded: usize },
}

pub type Result<T> = std::result::Result<T, JtmError>;
