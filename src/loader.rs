use crate::error::{JtmError, Result};
use crate::progress::{ProgressSink, StdoutProgress, REPORT_INTERVAL};
use ndarray::{Array3, Array4, Axis};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// One decoded image: (height, width, 3) RGB bytes.
pub type ImageRecord = Array3<u8>;

/// What to do with a directory entry that does not decode as an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodePolicy {
    /// Abort the whole load on the first undecodable entry.
    #[default]
    FailFast,
    /// Log a warning, count the entry as skipped, and keep going.
    Skip,
}

/// Cooperative cancellation flag, checked between entries.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Ordered result of loading one directory.
#[derive(Debug, Default)]
pub struct ImageCollection {
    records: Vec<ImageRecord>,
    skipped: usize,
}

impl ImageCollection {
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Entries that failed to decode under `DecodePolicy::Skip`.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    #[must_use]
    pub fn records(&self) -> &[ImageRecord] {
        &self.records
    }

    #[must_use]
    pub fn into_records(self) -> Vec<ImageRecord> {
        self.records
    }

    /// Stack all records into one (n, height, width, 3) array.
    ///
    /// Fails when the collection is empty or the records do not share a
    /// single shape.
    pub fn stack(&self) -> Result<Array4<u8>> {
        let first = self
            .records
            .first()
            .ok_or_else(|| JtmError::Shape("cannot stack an empty collection".into()))?;
        let dim = first.dim();
        for (i, record) in self.records.iter().enumerate() {
            if record.dim() != dim {
                return Err(JtmError::Shape(format!(
                    "record {i} has shape {:?}, expected {dim:?}",
                    record.dim()
                )));
            }
        }

        let views: Vec<_> = self.records.iter().map(|r| r.view()).collect();
        ndarray::stack(Axis(0), &views).map_err(|e| JtmError::Shape(e.to_string()))
    }
}

/// Loads every file in a directory as an image, in a fixed order, with
/// periodic progress reports.
#[derive(Debug, Clone, Default)]
pub struct DirectoryLoader {
    policy: DecodePolicy,
    unsorted: bool,
    cancel: Option<CancelToken>,
}

impl DirectoryLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_policy(mut self, policy: DecodePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Keep the raw, platform-dependent filesystem order instead of sorting
    /// entries by path.
    #[must_use]
    pub fn unsorted(mut self) -> Self {
        self.unsorted = true;
        self
    }

    #[must_use]
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Load a directory, reporting progress on standard output.
    pub fn load(&self, dir: impl AsRef<Path>) -> Result<ImageCollection> {
        self.load_with_progress(dir, &mut StdoutProgress)
    }

    /// Load a directory, reporting progress to the given sink every
    /// 100 entries.
    pub fn load_with_progress(
        &self,
        dir: impl AsRef<Path>,
        sink: &mut dyn ProgressSink,
    ) -> Result<ImageCollection> {
        let entries = self.list_entries(dir.as_ref())?;
        let begin = Instant::now();

        let mut records = Vec::with_capacity(entries.len());
        let mut skipped = 0;
        for (i, path) in entries.iter().enumerate() {
            if self.check_cancelled() {
                return Err(JtmError::Cancelled {
                    loaded: records.len(),
                });
            }

            let count = i + 1;
            if count % REPORT_INTERVAL == 0 {
                sink.report(count, begin.elapsed());
            }

            match decode_image(path) {
                Ok(record) => records.push(record),
                Err(e) => self.handle_bad_entry(path, e, &mut skipped)?,
            }
        }

        Ok(ImageCollection { records, skipped })
    }

    /// Load a directory, decoding entries on the rayon pool.
    ///
    /// Record order still matches enumeration order. Progress goes through
    /// `tracing` instead of a sink; counts are monotone but interleaved
    /// across workers.
    pub fn load_parallel(&self, dir: impl AsRef<Path>) -> Result<ImageCollection> {
        let entries = self.list_entries(dir.as_ref())?;
        let begin = Instant::now();
        let done = AtomicUsize::new(0);

        let decoded = entries
            .par_iter()
            .map(|path| {
                if self.check_cancelled() {
                    return Err(JtmError::Cancelled {
                        loaded: done.load(Ordering::Relaxed),
                    });
                }

                let result = decode_image(path);
                let count = done.fetch_add(1, Ordering::Relaxed) + 1;
                if count % REPORT_INTERVAL == 0 {
                    info!(count, elapsed = ?begin.elapsed(), "loading images");
                }

                match result {
                    Ok(record) => Ok(Some(record)),
                    Err(e) => match self.policy {
                        DecodePolicy::FailFast => Err(e),
                        DecodePolicy::Skip => {
                            warn!(path = %path.display(), error = %e, "skipping undecodable entry");
                            Ok(None)
                        }
                    },
                }
            })
            .collect::<Result<Vec<Option<ImageRecord>>>>()?;

        let total = decoded.len();
        let records: Vec<ImageRecord> = decoded.into_iter().flatten().collect();
        let skipped = total - records.len();
        Ok(ImageCollection { records, skipped })
    }

    fn list_entries(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let read_dir = fs::read_dir(dir).map_err(|e| JtmError::NotFound {
            path: dir.to_owned(),
            source: e,
        })?;

        let mut entries = Vec::new();
        for entry in read_dir {
            entries.push(entry?.path());
        }
        if !self.unsorted {
            entries.sort();
        }
        Ok(entries)
    }

    fn check_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }

    fn handle_bad_entry(&self, path: &Path, err: JtmError, skipped: &mut usize) -> Result<()> {
        match self.policy {
            DecodePolicy::FailFast => Err(err),
            DecodePolicy::Skip => {
                warn!(path = %path.display(), error = %err, "skipping undecodable entry");
                *skipped += 1;
                Ok(())
            }
        }
    }
}

/// Decode one file into a (height, width, 3) RGB array.
fn decode_image(path: &Path) -> Result<ImageRecord> {
    let rgb = image::open(path)
        .map_err(|e| JtmError::Decode {
            path: path.to_owned(),
            source: e,
        })?
        .to_rgb8();

    let (width, height) = rgb.dimensions();
    Array3::from_shape_vec((height as usize, width as usize, 3), rgb.into_raw())
        .map_err(|e| JtmError::Shape(e.to_string()))
}
