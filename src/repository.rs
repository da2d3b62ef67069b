use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tracing::info;

use crate::error::{TaskError, TaskResult};
use crate::models::{NewTask, Task, TaskPatch, TaskStatus};
use crate::storage::TaskStore;

/// Create/read/update/delete logic on top of a [`TaskStore`].
///
/// Every operation is a full load-modify-save cycle over the stored
/// collection; the in-memory copy lives only for the duration of one
/// operation. A single mutex serializes all operations, reads included,
/// so concurrent requests cannot interleave their cycles (duplicate ids,
/// lost updates, reads of a half-rewritten file).
pub struct TaskRepository {
    store: Box<dyn TaskStore>,
    lock: Mutex<()>,
}

impl TaskRepository {
    pub fn new<S: TaskStore + 'static>(store: S) -> Self {
        Self {
            store: Box::new(store),
            lock: Mutex::new(()),
        }
    }

    /// Returns tasks in collection order, optionally filtered by status
    /// and truncated to at most `limit` entries.
    ///
    /// Callers are expected to have bounded `limit` already; the
    /// repository only truncates.
    pub fn list(&self, filter: Option<TaskStatus>, limit: usize) -> TaskResult<Vec<Task>> {
        let _guard = self.guard();
        let mut tasks = self.store.load()?.tasks;
        if let Some(status) = filter {
            tasks.retain(|t| t.status == status);
        }
        tasks.truncate(limit);
        Ok(tasks)
    }

    pub fn get(&self, id: u64) -> TaskResult<Task> {
        let _guard = self.guard();
        self.store
            .load()?
            .tasks
            .into_iter()
            .find(|t| t.id == id)
            .ok_or(TaskError::NotFound(id))
    }

    /// Validates the fields, assigns the next id, stamps `created_at` and
    /// persists the new task.
    ///
    /// The next id is one greater than the current maximum in the freshly
    /// loaded collection (1 when empty), recomputed on every create so
    /// the scheme survives external edits of the backing file.
    pub fn create(&self, fields: NewTask) -> TaskResult<Task> {
        let _guard = self.guard();
        let mut file = self.store.load()?;
        let next_id = file.tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        let task = Task::new(next_id, fields, Utc::now())?;
        file.tasks.push(task.clone());
        self.store.save(&file)?;
        info!("task {} created", task.id);
        Ok(task)
    }

    /// Merges the supplied fields onto the stored task, refreshes
    /// `updated_at` and persists the collection.
    pub fn update(&self, id: u64, patch: TaskPatch) -> TaskResult<Task> {
        let _guard = self.guard();
        let mut file = self.store.load()?;
        let task = file
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(TaskError::NotFound(id))?;
        task.apply(patch, Utc::now())?;
        let updated = task.clone();
        self.store.save(&file)?;
        info!("task {} updated", id);
        Ok(updated)
    }

    /// Removes the task with the given id, returning the id on success.
    pub fn delete(&self, id: u64) -> TaskResult<u64> {
        let _guard = self.guard();
        let mut file = self.store.load()?;
        let len_before = file.tasks.len();
        file.tasks.retain(|t| t.id != id);
        if file.tasks.len() == len_before {
            return Err(TaskError::NotFound(id));
        }
        self.store.save(&file)?;
        info!("task {} deleted", id);
        Ok(id)
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
