use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use vacant_core::VacancyRecord;
use vacant_logging::{vacant_info, vacant_warn};

use crate::persist::{AtomicFileWriter, PersistError};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error on {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("store {path:?} is not a valid vacancy list: {message}")]
    Malformed { path: PathBuf, message: String },
    #[error("cannot serialize vacancies: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
}

/// Flat JSON file holding an ordered list of vacancy records.
///
/// The file is read into an in-memory cache owned by this value. Mutations
/// only touch the cache; `flush` writes it back and `reload` re-reads it.
#[derive(Debug, Clone)]
pub struct JsonVacancyStore {
    path: PathBuf,
    records: Vec<VacancyRecord>,
}

impl JsonVacancyStore {
    /// Opens the store, creating an empty file if none exists.
    ///
    /// A malformed file is logged and treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let mut store = Self {
            path: path.into(),
            records: Vec::new(),
        };
        store.reload()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-reads the file into the cache, discarding unflushed changes.
    ///
    /// Only IO and write failures are returned; a malformed file is
    /// reported as a warning and leaves the cache empty.
    pub fn reload(&mut self) -> Result<(), StoreError> {
        match self.load_all().map(|_| ()) {
            Ok(()) => Ok(()),
            Err(StoreError::Malformed { path, message }) => {
                vacant_warn!("Store {:?} is not valid JSON, using an empty store: {}", path, message);
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// Re-reads the file strictly and returns the cached records.
    ///
    /// A missing file is created empty. Malformed content is an error and
    /// leaves the cache empty.
    pub fn load_all(&mut self) -> Result<&[VacancyRecord], StoreError> {
        self.records.clear();
        self.records = match read_records(&self.path)? {
            Some(records) => records,
            None => {
                vacant_info!("Store {:?} not found, creating an empty one", self.path);
                let empty = Vec::new();
                write_records(&self.path, &empty)?;
                empty
            }
        };
        Ok(&self.records)
    }

    pub fn records(&self) -> &[VacancyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record at `position` in store order.
    pub fn get(&self, position: usize) -> Option<&VacancyRecord> {
        self.records.get(position)
    }

    /// Every record of `platform` carrying `vacancy_id`.
    pub fn find(&self, platform: &str, vacancy_id: i64) -> Vec<&VacancyRecord> {
        self.records
            .iter()
            .filter(|record| record.platform() == platform && record.vacancy_id() == vacancy_id)
            .collect()
    }

    pub fn append(&mut self, record: VacancyRecord) {
        self.records.push(record);
    }

    /// Removes the first record structurally equal to `record`.
    ///
    /// Returns false, with a warning, when nothing matched.
    pub fn delete(&mut self, record: &VacancyRecord) -> bool {
        match self.records.iter().position(|stored| stored == record) {
            Some(index) => {
                self.records.remove(index);
                true
            }
            None => {
                vacant_warn!("Vacancy \"{}\" not found", record.title());
                false
            }
        }
    }

    pub fn replace_all(&mut self, records: Vec<VacancyRecord>) {
        self.records = records;
    }

    /// Writes the cache to disk atomically.
    pub fn flush(&self) -> Result<(), StoreError> {
        write_records(&self.path, &self.records)
    }
}

/// `Ok(None)` when the file does not exist.
///
/// Entries that fail to rebuild into a record are skipped with a warning;
/// only a file that is not a JSON array at all counts as malformed.
fn read_records(path: &Path) -> Result<Option<Vec<VacancyRecord>>, StoreError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let entries: Vec<Value> =
        serde_json::from_str(&content).map_err(|err| StoreError::Malformed {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;

    let mut records = Vec::with_capacity(entries.len());
    for (position, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<VacancyRecord>(entry) {
            Ok(record) => records.push(record),
            Err(err) => vacant_warn!("Skipping stored vacancy #{}: {}", position, err),
        }
    }
    Ok(Some(records))
}

fn write_records(path: &Path, records: &[VacancyRecord]) -> Result<(), StoreError> {
    let mut content = serde_json::to_string_pretty(records)?;
    content.push('\n');
    AtomicFileWriter::new(path.to_path_buf()).write(&content)?;
    Ok(())
}
