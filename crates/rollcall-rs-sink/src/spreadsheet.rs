//! Sink that appends rows to a local CSV spreadsheet file.

use crate::render::{row_cells, ROW_HEADER};
use crate::{RecordSink, SinkError};
use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};
use parking_lot::Mutex;
use rollcall_rs_protocol::IntakeRecord;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

/// Appends one CSV row per record, writing a header row when it creates
/// the file.
pub struct CsvSink {
    path: PathBuf,
    /// Serialize write access so rows never interleave.
    write_lock: Mutex<()>,
}

impl CsvSink {
    /// Create a CSV sink writing to the given path.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        info!("initialized csv sink (path={})", path.display());
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }
}

#[async_trait]
impl RecordSink for CsvSink {
    async fn persist(&self, record: &IntakeRecord) -> Result<(), SinkError> {
        let _guard = self.write_lock.lock();
        let new_file = !self.path.exists();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if new_file {
            writer.write_record(ROW_HEADER)?;
        }
        writer.write_record(row_cells(record, Utc::now()))?;
        writer.flush()?;
        debug!(
            "appended csv row (path={}, user_id={}, new_file={})",
            self.path.display(),
            record.user_id,
            new_file
        );
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "csv"
    }
}
