//! Append-only CSV logs of download outcomes
//!
//! Each row is `(title, link)`. Only the success log is ever read back;
//! its first row is treated as a header.

use std::{
    collections::HashSet,
    fs::{File, OpenOptions},
    io::ErrorKind,
    path::{Path, PathBuf},
};

use csv::{ReaderBuilder, WriterBuilder};
use log::{debug, warn};

use crate::{config::LedgerConfig, storage::error::StorageError};

const HEADER: [&str; 2] = ["title", "link"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Success,
    Failure,
}

#[derive(Debug, Clone)]
pub struct Ledger {
    success_log: PathBuf,
    failure_log: PathBuf,
}

impl Ledger {
    pub fn new(config: &LedgerConfig) -> Self {
        Self::from_paths(&config.success_log, &config.failure_log)
    }

    pub fn from_paths(success_log: impl Into<PathBuf>, failure_log: impl Into<PathBuf>) -> Self {
        Self {
            success_log: success_log.into(),
            failure_log: failure_log.into(),
        }
    }

    pub fn path(&self, target: LogTarget) -> &Path {
        match target {
            LogTarget::Success => &self.success_log,
            LogTarget::Failure => &self.failure_log,
        }
    }

    /// Reads the links of all rows in the success log.
    ///
    /// A missing log is an empty set. Rows with fewer than two columns are skipped.
    pub fn load_successful_links(&self) -> Result<HashSet<String>, StorageError> {
        let path = &self.success_log;
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(HashSet::new()),
            Err(err) => return Err(err.into()),
        };

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);

        let mut links = HashSet::new();
        for (i, record) in reader.records().enumerate() {
            match record {
                Ok(record) => match record.get(1) {
                    Some(link) => {
                        links.insert(link.to_string());
                    }
                    None => debug!("{}: skipping row {} with too few columns", path.display(), i + 1),
                },
                Err(err) if err.is_io_error() => {
                    return Err(StorageError::Csv {
                        path: path.clone(),
                        source: err,
                    });
                }
                Err(err) => warn!("{}: skipping unreadable row: {err}", path.display()),
            }
        }

        Ok(links)
    }

    /// Appends one `(title, link)` row, creating the log if needed.
    ///
    /// A fresh success log gets a header row first so the reader never drops a record.
    pub fn append_record(
        &self,
        target: LogTarget,
        title: &str,
        link: &str,
    ) -> Result<(), StorageError> {
        let path = self.path(target);
        let needs_header = target == LogTarget::Success && is_missing_or_empty(path);

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);

        let csv_err = |source| StorageError::Csv {
            path: path.to_path_buf(),
            source,
        };

        if needs_header {
            writer.write_record(HEADER).map_err(csv_err)?;
        }
        writer.write_record([title, link]).map_err(csv_err)?;
        writer.flush()?;

        Ok(())
    }
}

fn is_missing_or_empty(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|meta| meta.len() == 0)
        .unwrap_or(true)
}
