//! Newline-delimited JSON sink
//!
//! Objects land at `<root>/<bucket>/<key>`. Rows are written to a temporary
//! file in the destination directory and renamed into place, so readers see
//! either the whole object or nothing.

use std::io::{BufWriter, Write};
use std::path::{Component, Path, PathBuf};

use degreed_core::RowSink;
use degreed_domain::{Dataset, DegreedError, ObjectLocation, Result, SinkConfig, SinkReceipt};
use tempfile::NamedTempFile;
use tracing::{info, instrument};

use crate::errors::InfraError;

/// Writes one JSON object per row, one row per line
#[derive(Debug, Clone)]
pub struct JsonLinesSink {
    root: PathBuf,
}

impl JsonLinesSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn from_config(config: &SinkConfig) -> Self {
        Self::new(config.output_root.clone())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem path backing `location`, always below the sink root.
    ///
    /// # Errors
    /// `Sink` when the bucket or key would resolve outside the root.
    pub fn path_for(&self, location: &ObjectLocation) -> Result<PathBuf> {
        let mut path = self.root.clone();
        let segments = std::iter::once(location.bucket.as_str())
            .chain(location.key.split(['/', '\\']).filter(|segment| !segment.is_empty()));

        for segment in segments {
            let mut components = Path::new(segment).components();
            match (components.next(), components.next()) {
                (Some(Component::Normal(part)), None) => path.push(part),
                _ => {
                    return Err(DegreedError::Sink(format!(
                        "{location} resolves outside {}",
                        self.root.display()
                    )))
                }
            }
        }
        Ok(path)
    }

    fn write_rows(&self, path: &Path, dataset: &Dataset) -> std::result::Result<u64, InfraError> {
        let parent = path
            .parent()
            .ok_or_else(|| DegreedError::Sink(format!("{} has no parent directory", path.display())))?;
        std::fs::create_dir_all(parent)?;

        let staged = NamedTempFile::new_in(parent)?;
        let mut writer = BufWriter::new(staged);
        let mut bytes = 0u64;

        for row in &dataset.rows {
            let line = serde_json::to_vec(row)
                .map_err(|e| DegreedError::Sink(format!("failed to serialize row: {e}")))?;
            writer.write_all(&line)?;
            writer.write_all(b"\n")?;
            bytes += line.len() as u64 + 1;
        }

        let staged = writer
            .into_inner()
            .map_err(|e| DegreedError::Sink(format!("failed to flush rows: {}", e.error())))?;
        staged.as_file().sync_all()?;
        staged.persist(path)?;

        Ok(bytes)
    }
}

impl RowSink for JsonLinesSink {
    #[instrument(skip(self, location, dataset), fields(location = %location, rows = dataset.len()))]
    fn write(&mut self, location: &ObjectLocation, dataset: &Dataset) -> Result<SinkReceipt> {
        let path = self.path_for(location)?;
        let bytes_written = self.write_rows(&path, dataset)?;

        info!(path = %path.display(), bytes = bytes_written, "rows written");

        Ok(SinkReceipt { location: location.clone(), rows_written: dataset.len(), bytes_written })
    }
}
