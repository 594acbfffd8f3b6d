pub mod json;
pub mod memory;
pub mod subscription;

pub use json::{default_store_path, JsonStore};
pub use memory::MemoryStore;
pub use subscription::{ErrorFn, Publisher, SnapshotFn, Subscription};

use crate::domain::{NewTimeLog, Task, TaskDraft, TaskPatch, TimeLog};
use crate::error::{Error, Result};
use chrono::{DateTime, Local};
use uuid::Uuid;

/// Mutable persistence of task records
///
/// Identity and creation timestamps are store-assigned; `create` always
/// initializes status TODO and full visibility regardless of caller input.
/// Snapshots arrive ordered by creation time ascending.
pub trait TaskStore: Send + Sync {
    /// Watch the task collection; every change delivers a full snapshot
    fn subscribe(&self, on_snapshot: SnapshotFn<Task>, on_error: ErrorFn) -> Subscription;

    fn create(&self, draft: TaskDraft) -> Result<Task>;

    fn update(&self, id: Uuid, patch: TaskPatch) -> Result<()>;

    /// Remove a single task record. Callers wanting cascade semantics go
    /// through [`crate::lifecycle::TaskLifecycle::hard_delete`].
    fn remove(&self, id: Uuid) -> Result<()>;

    /// Current task records, creation time ascending
    fn snapshot(&self) -> Vec<Task>;

    fn get(&self, id: Uuid) -> Option<Task> {
        self.snapshot().into_iter().find(|task| task.id == id)
    }
}

/// Append-only persistence of work-log records
///
/// Logs are immutable once appended; `remove_for_task` exists solely for the
/// cascade hard-delete. Snapshots arrive ordered by creation time descending.
pub trait LogStore: Send + Sync {
    /// Watch the log collection; every change delivers a full snapshot
    fn subscribe(&self, on_snapshot: SnapshotFn<TimeLog>, on_error: ErrorFn) -> Subscription;

    fn append(&self, log: NewTimeLog) -> Result<TimeLog>;

    /// Delete every log referencing `task_id`, returning how many went
    fn remove_for_task(&self, task_id: Uuid) -> Result<usize>;

    /// Current log records, creation time descending
    fn snapshot(&self) -> Vec<TimeLog>;

    fn logs_for_task(&self, task_id: Uuid) -> Vec<TimeLog> {
        self.snapshot()
            .into_iter()
            .filter(|log| log.task_id == task_id)
            .collect()
    }
}

/// The record sets backing a store, with the shared mutation rules
///
/// Both concrete stores guard one of these behind a mutex so a cascade
/// observes tasks and logs in a single consistent view.
#[derive(Debug, Clone, Default)]
pub(crate) struct Collections {
    pub tasks: Vec<Task>,
    pub logs: Vec<TimeLog>,
}

impl Collections {
    pub fn create_task(&mut self, draft: &TaskDraft, now: DateTime<Local>) -> Task {
        let task = Task {
            id: Uuid::new_v4(),
            title: draft.title.clone(),
            status: crate::domain::TaskStatus::Todo,
            estimated_minutes: draft.estimated_minutes,
            deadline: Some(draft.deadline),
            is_visible: true,
            created_at: now,
            updated_at: now,
        };
        self.tasks.push(task.clone());
        task
    }

    pub fn update_task(&mut self, id: Uuid, patch: &TaskPatch, now: DateTime<Local>) -> Result<()> {
        let task = self
            .tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or_else(|| Error::persistence(format!("no task with id {}", id)))?;
        patch.apply(task, now);
        Ok(())
    }

    pub fn remove_task(&mut self, id: Uuid) -> Result<()> {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        if self.tasks.len() == before {
            return Err(Error::persistence(format!("no task with id {}", id)));
        }
        Ok(())
    }

    pub fn append_log(&mut self, log: &NewTimeLog, now: DateTime<Local>) -> TimeLog {
        let log = TimeLog {
            id: Uuid::new_v4(),
            task_id: log.task_id,
            sub_task_name: log.sub_task_name.clone(),
            start_time: log.start_time,
            end_time: log.end_time,
            duration_seconds: log.duration_seconds,
            created_at: now,
        };
        self.logs.push(log.clone());
        log
    }

    pub fn remove_logs_for(&mut self, task_id: Uuid) -> usize {
        let before = self.logs.len();
        self.logs.retain(|log| log.task_id != task_id);
        before - self.logs.len()
    }

    /// Tasks ordered by creation time ascending
    pub fn task_snapshot(&self) -> Vec<Task> {
        let mut tasks = self.tasks.clone();
        tasks.sort_by_key(|task| task.created_at);
        tasks
    }

    /// Logs ordered by creation time descending
    pub fn log_snapshot(&self) -> Vec<TimeLog> {
        let mut logs = self.logs.clone();
        logs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        logs
    }
}
