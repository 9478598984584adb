use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use chrono::{Datelike, NaiveDate};
use serde::{de::DeserializeOwned, Serialize};
use tokio::{fs, io::AsyncWriteExt};
use tracing::debug;

use crate::utils::time::week_of_month;

use super::error::StorageError;

/// All file-level access for one day's records.
///
/// The file path is a pure function of `(date, base_dir)`:
/// `base/YYYY/MM/WW/DD`, where `WW` is the week bucket of the month and
/// `DD` the weekday number (Monday = 0). Deriving the path needs no
/// index, so instances are cheap value objects re-created on every
/// access rather than cached. That keeps the store stateless: there is
/// no in-memory structure a crash could lose.
///
/// Rows are raw delimited tuples at this level. The typed record shape
/// is applied by [CsvLogStore](super::log_store::CsvLogStore).
pub struct DateLog {
    date: NaiveDate,
    file: PathBuf,
}

impl DateLog {
    pub fn new(date: NaiveDate, base_dir: &Path) -> Self {
        let file = base_dir
            .join(format!("{:04}", date.year()))
            .join(format!("{:02}", date.month()))
            .join(format!("{:02}", week_of_month(date)))
            .join(format!("{:02}", date.weekday().num_days_from_monday()));
        Self { date, file }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn path(&self) -> &Path {
        &self.file
    }

    pub async fn exists(&self) -> bool {
        fs::try_exists(&self.file).await.unwrap_or(false)
    }

    /// Creates the parent directory chain and an empty log file. Safe to
    /// call again once the file exists, existing rows are never touched.
    pub async fn create(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.file.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.file)
            .await?;
        Ok(())
    }

    /// Returns every row in file order. A file that was never created,
    /// or was created and never written to, reads as no rows.
    pub async fn read<R: DeserializeOwned>(&self) -> Result<Vec<R>, StorageError> {
        debug!("Reading log rows from {:?}", self.file);
        let raw = match fs::read(&self.file).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(raw.as_slice());
        let mut rows = Vec::new();
        for row in reader.deserialize() {
            rows.push(row?);
        }
        Ok(rows)
    }

    /// Appends one row, creating the file first when needed. Fields are
    /// quoted by the writer, so values containing the delimiter or a
    /// newline survive the round trip intact.
    pub async fn append<R: Serialize>(&self, row: &R) -> Result<(), StorageError> {
        self.create().await?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        writer.serialize(row)?;
        let line = writer
            .into_inner()
            .map_err(|e| StorageError::Io(e.into_error()))?;

        let mut file = fs::OpenOptions::new().append(true).open(&self.file).await?;
        file.write_all(&line).await?;
        file.flush().await?;
        Ok(())
    }

    /// Removes the log file. Deleting a day that was never written is
    /// not an error.
    pub async fn delete(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.file).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
