use crate::error::{JtmError, Result};
use std::env;
use std::path::PathBuf;

/// Environment variable naming the HMDB51 dataset root.
pub const ROOT_ENV: &str = "HMDB51_ROOT";

/// Location of one train/test partition of the JTM dataset.
///
/// The on-disk layout is `<root>/train<split>/JTM/` and
/// `<root>/test<split>/JTM/`.
#[derive(Debug, Clone)]
pub struct DatasetConfig {
    pub root: PathBuf,
    pub split: String,
}

impl DatasetConfig {
    pub fn new(root: impl Into<PathBuf>, split: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            split: split.into(),
        }
    }

    /// Read the dataset root from the `HMDB51_ROOT` environment variable.
    pub fn from_env(split: impl Into<String>) -> Result<Self> {
        let root = env::var_os(ROOT_ENV)
            .ok_or_else(|| JtmError::Config(format!("{ROOT_ENV} is not set")))?;
        Ok(Self::new(PathBuf::from(root), split))
    }

    /// Directory holding the training images for this split.
    #[must_use]
    pub fn train_dir(&self) -> PathBuf {
        self.root.join(format!("train{}", self.split)).join("JTM")
    }

    /// Directory holding the test images for this split.
    #[must_use]
    pub fn test_dir(&self) -> PathBuf {
        self.root.join(format!("test{}", self.split)).join("JTM")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn split_dirs() {
        let config = DatasetConfig::new("/data/HMDB51", "2");
        assert_eq!(config.train_dir(), Path::new("/data/HMDB51/train2/JTM"));
        assert_eq!(config.test_dir(), Path::new("/data/HMDB51/test2/JTM"));
    }
}
