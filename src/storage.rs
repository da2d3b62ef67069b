use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::Task;

/// On-disk container for the full task collection.
///
/// Serialized as `{ "tasks": [ ... ] }`; the file is equivalent to
/// `{ "tasks": [] }` when no task has been created yet.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct TaskFile {
    pub tasks: Vec<Task>,
}

/// Backend holding the task collection.
///
/// Every `load` is a full read and every `save` a full rewrite; partial
/// updates are applied to the in-memory copy by the repository before
/// saving.
pub trait TaskStore: Send + Sync {
    fn load(&self) -> io::Result<TaskFile>;
    fn save(&self, file: &TaskFile) -> io::Result<()>;
}

/// Returns the path to the tasks database file (`tasks.json`).
///
/// The path is determined in the following order:
/// 1. `TASKD_DB` environment variable.
/// 2. `~/.local/share/taskd/tasks.json` (on Linux).
/// 3. `./tasks.json` (fallback).
pub fn db_path() -> PathBuf {
    std::env::var("TASKD_DB")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut p = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
            p.push("taskd");
            if !p.exists() {
                let _ = fs::create_dir_all(&p);
            }
            p.push("tasks.json");
            p
        })
}

/// File-backed task store.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Creates the backing file with an empty collection if it is absent.
    pub fn init(&self) -> io::Result<()> {
        if !self.path.exists() {
            self.save(&TaskFile::default())?;
        }
        Ok(())
    }

    /// Deletes the backing file if it exists.
    pub fn delete_database(&self) -> io::Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new(db_path())
    }
}

impl TaskStore for FileStore {
    /// Loads the full task collection from the backing file.
    ///
    /// An absent file yields an empty collection; malformed content
    /// yields an empty collection and a warning. Any other I/O failure
    /// propagates.
    fn load(&self) -> io::Result<TaskFile> {
        if !self.path.exists() {
            return Ok(TaskFile::default());
        }
        let raw = fs::read_to_string(&self.path)?;
        match serde_json::from_str(&raw) {
            Ok(file) => Ok(file),
            Err(e) => {
                warn!(
                    "malformed task database at {}, starting from an empty collection: {}",
                    self.path.display(),
                    e
                );
                Ok(TaskFile::default())
            }
        }
    }

    /// Saves the full task collection to the backing file.
    ///
    /// Overwrites the existing file.
    fn save(&self, file: &TaskFile) -> io::Result<()> {
        let s = serde_json::to_string_pretty(file).map_err(io::Error::other)?;
        let mut f = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        f.write_all(s.as_bytes())?;
        Ok(())
    }
}

/// In-memory task store, used in tests.
#[derive(Default)]
pub struct MemStore {
    file: Mutex<TaskFile>,
}

impl TaskStore for MemStore {
    fn load(&self) -> io::Result<TaskFile> {
        let file = self
            .file
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(file.clone())
    }

    fn save(&self, file: &TaskFile) -> io::Result<()> {
        let mut slot = self
            .file
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *slot = file.clone();
        Ok(())
    }
}
