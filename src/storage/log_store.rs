use std::{collections::BTreeMap, future::Future, io::ErrorKind, ops::Deref, path::Path};

use chrono::NaiveDate;
use tokio::fs;
use tracing::{debug, warn};

use super::{
    date_log::DateLog,
    entities::SessionRecord,
    error::StorageError,
    metadata::DatabaseMetadata,
};

/// Records of every day inside a queried interval, in date order. Days
/// without a log file are present with an empty row list, so consumers
/// can walk the whole range without guarding lookups.
pub type RecordsByDate = BTreeMap<NaiveDate, Vec<SessionRecord>>;

/// Interface a storage backend must satisfy to hold session records.
/// There is one file-based realization, [CsvLogStore]; anything that can
/// append and read per-day record sequences can stand in for it.
pub trait LogStore {
    /// Returns one day's records in append order.
    fn read_log(
        &self,
        date: NaiveDate,
    ) -> impl Future<Output = Result<Vec<SessionRecord>, StorageError>>;

    fn append_log(
        &self,
        date: NaiveDate,
        record: SessionRecord,
    ) -> impl Future<Output = Result<(), StorageError>>;

    fn delete_log(&self, date: NaiveDate) -> impl Future<Output = Result<(), StorageError>>;

    /// Returns records of every day from `start` to `end`, inclusive on
    /// both ends. `end` defaults to `start`. A reversed interval is
    /// answered with an empty map and a warning, not an error, since
    /// callers may legitimately probe with swapped dates.
    fn read_interval(
        &self,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> impl Future<Output = Result<RecordsByDate, StorageError>>;
}

impl<T: Deref> LogStore for T
where
    T::Target: LogStore,
{
    fn read_log(
        &self,
        date: NaiveDate,
    ) -> impl Future<Output = Result<Vec<SessionRecord>, StorageError>> {
        self.deref().read_log(date)
    }

    fn append_log(
        &self,
        date: NaiveDate,
        record: SessionRecord,
    ) -> impl Future<Output = Result<(), StorageError>> {
        self.deref().append_log(date, record)
    }

    fn delete_log(&self, date: NaiveDate) -> impl Future<Output = Result<(), StorageError>> {
        self.deref().delete_log(date)
    }

    fn read_interval(
        &self,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> impl Future<Output = Result<RecordsByDate, StorageError>> {
        self.deref().read_interval(start, end)
    }
}

/// The main realization of [LogStore]: per-day CSV files under the
/// database directory described by a [DatabaseMetadata].
pub struct CsvLogStore {
    metadata: DatabaseMetadata,
}

impl CsvLogStore {
    /// Creates a new database directory with its metadata file. Fails
    /// when a database of the same name already sits under `par_dir`.
    pub async fn create(
        name: &str,
        activities: Vec<String>,
        par_dir: &Path,
    ) -> Result<Self, StorageError> {
        let metadata = DatabaseMetadata::new(name, activities, par_dir);
        if fs::try_exists(metadata.db_path()).await? {
            return Err(StorageError::DatabaseAlreadyExists {
                name: name.to_owned(),
                par_dir: par_dir.to_owned(),
            });
        }

        fs::create_dir_all(metadata.db_path()).await?;
        let json = serde_json::to_string_pretty(&metadata)?;
        fs::write(metadata.file(), json).await?;
        debug!("Created database {name:?} under {par_dir:?}");
        Ok(Self { metadata })
    }

    /// Loads an existing database from its metadata file.
    pub async fn load_by_name(name: &str, par_dir: &Path) -> Result<Self, StorageError> {
        let file = DatabaseMetadata::metadata_file(par_dir, name);
        let raw = match fs::read_to_string(&file).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::DatabaseNotFound {
                    name: name.to_owned(),
                    par_dir: par_dir.to_owned(),
                })
            }
            Err(e) => return Err(e.into()),
        };
        let metadata = serde_json::from_str(&raw)?;
        Ok(Self { metadata })
    }

    pub fn metadata(&self) -> &DatabaseMetadata {
        &self.metadata
    }

    fn log(&self, date: NaiveDate) -> DateLog {
        DateLog::new(date, &self.metadata.db_path())
    }
}

impl LogStore for CsvLogStore {
    async fn read_log(&self, date: NaiveDate) -> Result<Vec<SessionRecord>, StorageError> {
        self.log(date).read().await
    }

    async fn append_log(
        &self,
        date: NaiveDate,
        record: SessionRecord,
    ) -> Result<(), StorageError> {
        self.log(date).append(&record).await
    }

    async fn delete_log(&self, date: NaiveDate) -> Result<(), StorageError> {
        self.log(date).delete().await
    }

    async fn read_interval(
        &self,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Result<RecordsByDate, StorageError> {
        let end = end.unwrap_or(start);
        let mut records = RecordsByDate::new();

        if end < start {
            warn!("Invalid interval: end date {end} is earlier than start date {start}");
            return Ok(records);
        }

        for date in start.iter_days() {
            if date > end {
                break;
            }
            records.insert(date, self.log(date).read().await?);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::LazyLock;

    use anyhow::Result;
    use chrono::{Days, NaiveDate};
    use tempfile::tempdir;

    use crate::{
        storage::{entities::SessionRecord, error::StorageError, metadata::DatabaseMetadata},
        utils::logging::TEST_LOGGING,
    };

    use super::{CsvLogStore, LogStore};

    fn activities() -> Vec<String> {
        vec!["projects".into(), "house".into(), "rest".into()]
    }

    fn sample_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 5, 28).unwrap()
    }

    fn sample_record(activity: usize) -> SessionRecord {
        SessionRecord {
            activity,
            duration_secs: 1200,
            offset_secs: 54000,
        }
    }

    #[tokio::test]
    async fn test_create_writes_pretty_metadata() -> Result<()> {
        let dir = tempdir()?;
        let store = CsvLogStore::create("habits", activities(), dir.path()).await?;

        let raw = std::fs::read_to_string(store.metadata().file())?;
        // Pretty-printed, not a single line.
        assert!(raw.lines().count() > 1);

        let loaded: DatabaseMetadata = serde_json::from_str(&raw)?;
        assert_eq!(&loaded, store.metadata());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_existing_database_fails() -> Result<()> {
        let dir = tempdir()?;
        CsvLogStore::create("habits", activities(), dir.path()).await?;

        let result = CsvLogStore::create("habits", activities(), dir.path()).await;
        assert!(matches!(
            result,
            Err(StorageError::DatabaseAlreadyExists { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_load_by_name_round_trip() -> Result<()> {
        let dir = tempdir()?;
        let created = CsvLogStore::create("habits", activities(), dir.path()).await?;

        let loaded = CsvLogStore::load_by_name("habits", dir.path()).await?;
        assert_eq!(loaded.metadata(), created.metadata());
        Ok(())
    }

    #[tokio::test]
    async fn test_load_missing_database_fails() -> Result<()> {
        let dir = tempdir()?;
        let result = CsvLogStore::load_by_name("nothing-here", dir.path()).await;
        assert!(matches!(result, Err(StorageError::DatabaseNotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_append_and_read_log() -> Result<()> {
        LazyLock::force(&TEST_LOGGING);
        let dir = tempdir()?;
        let store = CsvLogStore::create("habits", activities(), dir.path()).await?;

        store.append_log(sample_date(), sample_record(0)).await?;
        store.append_log(sample_date(), sample_record(1)).await?;

        let rows = store.read_log(sample_date()).await?;
        assert_eq!(rows, vec![sample_record(0), sample_record(1)]);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_log() -> Result<()> {
        let dir = tempdir()?;
        let store = CsvLogStore::create("habits", activities(), dir.path()).await?;

        store.append_log(sample_date(), sample_record(0)).await?;
        store.delete_log(sample_date()).await?;

        assert!(store.read_log(sample_date()).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_read_interval_single_day() -> Result<()> {
        let dir = tempdir()?;
        let store = CsvLogStore::create("habits", activities(), dir.path()).await?;
        store.append_log(sample_date(), sample_record(2)).await?;

        let records = store.read_interval(sample_date(), None).await?;
        assert_eq!(records.len(), 1);
        assert_eq!(records[&sample_date()], vec![sample_record(2)]);
        Ok(())
    }

    #[tokio::test]
    async fn test_read_interval_includes_empty_days() -> Result<()> {
        let dir = tempdir()?;
        let store = CsvLogStore::create("habits", activities(), dir.path()).await?;

        let start = sample_date();
        let end = start + Days::new(2);
        store.append_log(start, sample_record(0)).await?;
        store.append_log(end, sample_record(1)).await?;

        let records = store.read_interval(start, Some(end)).await?;
        assert_eq!(records.len(), 3);
        assert_eq!(records[&start], vec![sample_record(0)]);
        assert!(records[&(start + Days::new(1))].is_empty());
        assert_eq!(records[&end], vec![sample_record(1)]);
        Ok(())
    }

    #[tokio::test]
    async fn test_read_interval_spans_month_boundary() -> Result<()> {
        let dir = tempdir()?;
        let store = CsvLogStore::create("habits", activities(), dir.path()).await?;

        let start = NaiveDate::from_ymd_opt(2023, 5, 30).unwrap();
        let end = NaiveDate::from_ymd_opt(2023, 6, 2).unwrap();
        store.append_log(end, sample_record(1)).await?;

        let records = store.read_interval(start, Some(end)).await?;
        assert_eq!(records.len(), 4);
        assert_eq!(records[&end], vec![sample_record(1)]);
        Ok(())
    }

    #[tokio::test]
    async fn test_read_reversed_interval_is_empty() -> Result<()> {
        let dir = tempdir()?;
        let store = CsvLogStore::create("habits", activities(), dir.path()).await?;
        store.append_log(sample_date(), sample_record(0)).await?;

        let records = store
            .read_interval(sample_date() + Days::new(5), Some(sample_date()))
            .await?;
        assert!(records.is_empty());
        Ok(())
    }
}
