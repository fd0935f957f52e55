//! Flat-file record store.
//!
//! Each collection is a single pretty-printed JSON array on disk. Reads scan
//! the whole file; writes replace it through a temp file and an atomic rename.
//! A per-collection mutex serialises read-modify-write cycles inside this
//! process. Separate processes sharing the directory are last-writer-wins.

pub mod jobs;
pub mod users;

use std::io::Write as _;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::info;

use crate::models::job::JobRecord;
use crate::models::user::User;

const USERS_FILE: &str = "users.json";
const JOBS_FILE: &str = "jobs.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} does not contain a valid record list: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize records: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Background write failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// What a [`JsonCollection::transact`] closure wants done with its changes.
pub enum Write<R> {
    /// Persist the modified records, then return the value.
    Commit(R),
    /// Return the value without touching the file.
    Discard(R),
}

/// One JSON-array file holding records of type `T`.
pub struct JsonCollection<T> {
    path: PathBuf,
    lock: Mutex<()>,
    _records: PhantomData<fn() -> T>,
}

impl<T> JsonCollection<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
            _records: PhantomData,
        }
    }

    /// Writes `seed` if the file does not exist yet.
    pub async fn ensure_exists(&self, seed: &[T]) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let exists = tokio::fs::try_exists(&self.path)
            .await
            .map_err(|source| self.io_error(source))?;
        if !exists {
            info!("Initializing {}", self.path.display());
            self.save(seed).await?;
        }
        Ok(())
    }

    /// Reads every record. A missing or blank file reads as empty; an
    /// unparsable file is an error and is never overwritten implicitly.
    pub async fn load(&self) -> Result<Vec<T>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(self.io_error(source)),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Loads, hands the records to `f`, and saves them if `f` commits.
    pub async fn transact<R>(
        &self,
        f: impl FnOnce(&mut Vec<T>) -> Write<R>,
    ) -> Result<R, StoreError> {
        let _guard = self.lock.lock().await;
        let mut records = self.load().await?;
        match f(&mut records) {
            Write::Commit(value) => {
                self.save(&records).await?;
                Ok(value)
            }
            Write::Discard(value) => Ok(value),
        }
    }

    async fn save(&self, records: &[T]) -> Result<(), StoreError> {
        let content = serde_json::to_vec_pretty(records).map_err(StoreError::Serialize)?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || atomic_write(&path, &content)).await?
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// Writes to a sibling temp file, then renames it over `path`.
fn atomic_write(path: &Path, content: &[u8]) -> Result<(), StoreError> {
    let io_error = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    let dir = path.parent().unwrap_or_else(|| Path::new("."));

    let mut temp = NamedTempFile::new_in(dir).map_err(io_error)?;
    temp.write_all(content).map_err(io_error)?;
    temp.as_file().sync_all().map_err(io_error)?;
    temp.persist(path).map_err(|e| io_error(e.error))?;
    Ok(())
}

/// Users and jobs under one data directory.
pub struct RecordStore {
    data_dir: PathBuf,
    pub users: users::UserStore,
    pub jobs: jobs::JobStore,
}

impl RecordStore {
    pub fn open(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            users: users::UserStore::new(JsonCollection::<User>::new(data_dir.join(USERS_FILE))),
            jobs: jobs::JobStore::new(JsonCollection::<JobRecord>::new(data_dir.join(JOBS_FILE))),
            data_dir,
        }
    }

    /// Creates the data directory and both files when absent.
    pub async fn init(&self) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.data_dir)
            .await
            .map_err(|source| StoreError::Io {
                path: self.data_dir.clone(),
                source,
            })?;
        self.users.init().await?;
        self.jobs.init().await?;
        info!("Record store ready at {}", self.data_dir.display());
        Ok(())
    }
}
