#![allow(clippy::missing_errors_doc)]
pub mod config;
pub mod error;
pub mod loader;
pub mod progress;

pub use config::DatasetConfig;
pub use error::{JtmError, Result};
pub use loader::{CancelToken, DecodePolicy, DirectoryLoader, ImageCollection, ImageRecord};
pub use progress::{ProgressSink, StdoutProgress};
