use crate::domain::{Task, TaskDraft, TaskPatch, TaskStatus};
use crate::error::{Error, Result};
use crate::store::{LogStore, TaskStore};
use std::sync::Arc;
use uuid::Uuid;

/// Task lifecycle operations over the two stores
///
/// Mutations are independent and never serialized against each other; a
/// failure is terminal for that action and the caller re-triggers it. The
/// read models catch up from the stores' next snapshot.
pub struct TaskLifecycle {
    tasks: Arc<dyn TaskStore>,
    logs: Arc<dyn LogStore>,
}

impl TaskLifecycle {
    pub fn new(tasks: Arc<dyn TaskStore>, logs: Arc<dyn LogStore>) -> Self {
        Self { tasks, logs }
    }

    /// Create a task; the store initializes status, visibility, and identity
    pub fn create(&self, draft: TaskDraft) -> Result<Task> {
        if draft.title.trim().is_empty() {
            return Err(Error::validation("title is required"));
        }
        self.tasks.create(draft)
    }

    /// Patch arbitrary fields on a task
    pub fn update(&self, id: Uuid, patch: TaskPatch) -> Result<()> {
        self.tasks.update(id, patch)
    }

    /// Hide a task from default listings; its logs are retained
    ///
    /// Destructive from the user's point of view, so the presentation layer
    /// asks for confirmation before calling this.
    pub fn soft_delete(&self, id: Uuid) -> Result<()> {
        self.tasks.update(id, TaskPatch::visibility(false))
    }

    /// Bring a hidden task back into default listings
    pub fn restore(&self, id: Uuid) -> Result<()> {
        self.tasks.update(id, TaskPatch::visibility(true))
    }

    /// Mark a task done (confirmation is the caller's responsibility)
    pub fn complete(&self, id: Uuid) -> Result<()> {
        self.tasks.update(id, TaskPatch::status(TaskStatus::Done))
    }

    /// Move a TODO task to DOING; any other status is left alone
    pub fn promote_to_doing(&self, id: Uuid) -> Result<()> {
        match self.tasks.get(id) {
            Some(task) if task.status == TaskStatus::Todo => {
                self.tasks.update(id, TaskPatch::status(TaskStatus::Doing))
            }
            _ => Ok(()),
        }
    }

    /// Permanently delete a task together with every log referencing it
    ///
    /// Two-phase: logs go first, then a compensating check, then the task.
    /// If log removal fails or leaves stragglers the task record stays put,
    /// so analytics never dangles on a missing task.
    pub fn hard_delete(&self, id: Uuid) -> Result<()> {
        self.logs
            .remove_for_task(id)
            .map_err(|e| Error::CascadeIntegrity {
                task_id: id,
                reason: format!("log removal failed: {}", e),
            })?;

        let remaining = self.logs.logs_for_task(id).len();
        if remaining > 0 {
            return Err(Error::CascadeIntegrity {
                task_id: id,
                reason: format!("{} logs remain after removal", remaining),
            });
        }

        self.tasks.remove(id)
    }
}
