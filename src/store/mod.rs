//! File-backed attendance store.
//!
//! The full state lives in one JSON file. All access goes through a
//! [`Store`] handle. Every operation holds an exclusive `fs2` lock on the
//! sibling `<file>.lock` for its whole load-mutate-save cycle, so commands
//! running in separate processes never interleave. Handles on the same path
//! inside one process also share a mutex and queue there first.

mod file;
pub mod state;

use std::collections::HashMap;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use derive_more::Display;
use fs2::FileExt;
use once_cell::sync::Lazy;
use parking_lot::{Mutex, MutexGuard};
use tracing::{debug, info};

pub use state::StoreState;

/// One mutex per absolute data-file path, shared by every handle in the process.
static STORE_LOCKS: Lazy<Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

fn lock_for(path: &Path) -> Arc<Mutex<()>> {
    STORE_LOCKS
        .lock()
        .entry(path.to_path_buf())
        .or_default()
        .clone()
}

fn lock_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("state"));
    name.push(".lock");
    path.with_file_name(name)
}

/// Both locks for one operation. The file lock is released when `_file`
/// closes, before the in-process mutex.
struct StoreGuard<'a> {
    _file: File,
    _local: MutexGuard<'a, ()>,
}

#[derive(Debug, Display)]
pub enum StoreError {
    #[display(fmt = "no persisted state at {}", "_0.display()")]
    Missing(PathBuf),
    #[display(fmt = "i/o failure on {}", "path.display()")]
    Io { path: PathBuf, source: io::Error },
    #[display(fmt = "malformed state in {}", "path.display()")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[display(fmt = "failed to encode state for {}", "path.display()")]
    Encode {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[display(fmt = "invalid state in {}: {}", "path.display()", reason)]
    Invalid { path: PathBuf, reason: String },
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io { source, .. } => Some(source),
            StoreError::Malformed { source, .. } | StoreError::Encode { source, .. } => {
                Some(source)
            }
            StoreError::Missing(_) | StoreError::Invalid { .. } => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
    lock_path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl Store {
    /// Bind a handle to `path`. Nothing is read or written until an operation runs.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let path = std::path::absolute(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let lock = lock_for(&path);
        let lock_path = lock_path_for(&path);
        Ok(Self {
            path,
            lock_path,
            lock,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Seed the file with the default admin if it does not exist yet.
    /// Returns `true` when this call created it.
    pub fn initialize(&self) -> Result<bool, StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let _guard = self.acquire()?;

        if self.path.exists() {
            debug!(path = %self.path.display(), "store already initialized");
            return Ok(false);
        }

        file::atomic_write(&self.path, &StoreState::seeded())?;
        info!(path = %self.path.display(), "seeded attendance store");
        Ok(true)
    }

    pub fn load(&self) -> Result<StoreState, StoreError> {
        let _guard = self.acquire()?;
        self.load_locked()
    }

    pub fn save(&self, state: &StoreState) -> Result<(), StoreError> {
        let _guard = self.acquire()?;
        self.save_locked(state)
    }

    /// Load once under the lock and hand the state to `f`. Nothing is written.
    pub fn read<T>(&self, f: impl FnOnce(&StoreState) -> T) -> Result<T, StoreError> {
        let _guard = self.acquire()?;
        let state = self.load_locked()?;
        Ok(f(&state))
    }

    /// Load, apply `f`, and save, all under the lock. When `f` fails the
    /// file is left untouched.
    pub fn transaction<T, E>(&self, f: impl FnOnce(&mut StoreState) -> Result<T, E>) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let _guard = self.acquire()?;
        let mut state = self.load_locked()?;
        let value = f(&mut state)?;
        self.save_locked(&state)?;
        Ok(value)
    }

    /// Take the in-process mutex, then block on the exclusive file lock.
    fn acquire(&self) -> Result<StoreGuard<'_>, StoreError> {
        let local = self.lock.lock();

        let lock_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.lock_path)
            .map_err(|source| match source.kind() {
                // no directory yet, so no data file either
                io::ErrorKind::NotFound => StoreError::Missing(self.path.clone()),
                _ => StoreError::Io {
                    path: self.lock_path.clone(),
                    source,
                },
            })?;

        lock_file.lock_exclusive().map_err(|source| StoreError::Io {
            path: self.lock_path.clone(),
            source,
        })?;

        Ok(StoreGuard {
            _file: lock_file,
            _local: local,
        })
    }

    fn load_locked(&self) -> Result<StoreState, StoreError> {
        let state = file::read_state(&self.path)?;
        debug!(
            users = state.users.len(),
            entries = state.attendance.len(),
            "state loaded"
        );
        Ok(state)
    }

    fn save_locked(&self, state: &StoreState) -> Result<(), StoreError> {
        state.validate().map_err(|reason| StoreError::Invalid {
            path: self.path.clone(),
            reason,
        })?;
        file::atomic_write(&self.path, state)?;
        debug!(
            users = state.users.len(),
            entries = state.attendance.len(),
            "state saved"
        );
        Ok(())
    }
}
