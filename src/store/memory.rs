use super::subscription::{ErrorFn, Publisher, SnapshotFn, Subscription};
use super::{Collections, LogStore, TaskStore};
use crate::domain::{NewTimeLog, Task, TaskDraft, TaskPatch, TimeLog};
use crate::error::Result;
use chrono::Local;
use std::sync::Mutex;
use uuid::Uuid;

/// Transport-free store keeping tasks and logs in memory
///
/// Backs both store contracts over one mutexed record set, so a cascade
/// delete sees tasks and logs change together. Every mutation broadcasts a
/// fresh full snapshot to subscribers.
pub struct MemoryStore {
    state: Mutex<Collections>,
    task_events: Publisher<Task>,
    log_events: Publisher<TimeLog>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(Collections::default()),
            task_events: Publisher::new(),
            log_events: Publisher::new(),
        }
    }

    fn publish_tasks(&self) {
        let snapshot = self.state.lock().unwrap().task_snapshot();
        // Lock released before callbacks run
        self.task_events.publish(&snapshot);
    }

    fn publish_logs(&self) {
        let snapshot = self.state.lock().unwrap().log_snapshot();
        self.log_events.publish(&snapshot);
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore for MemoryStore {
    fn subscribe(&self, on_snapshot: SnapshotFn<Task>, on_error: ErrorFn) -> Subscription {
        // New subscribers get the current snapshot immediately
        let snapshot = self.state.lock().unwrap().task_snapshot();
        on_snapshot(&snapshot);
        self.task_events.subscribe(on_snapshot, on_error)
    }

    fn create(&self, draft: TaskDraft) -> Result<Task> {
        let task = self.state.lock().unwrap().create_task(&draft, Local::now());
        self.publish_tasks();
        Ok(task)
    }

    fn update(&self, id: Uuid, patch: TaskPatch) -> Result<()> {
        self.state.lock().unwrap().update_task(id, &patch, Local::now())?;
        self.publish_tasks();
        Ok(())
    }

    fn remove(&self, id: Uuid) -> Result<()> {
        self.state.lock().unwrap().remove_task(id)?;
        self.publish_tasks();
        Ok(())
    }

    fn snapshot(&self) -> Vec<Task> {
        self.state.lock().unwrap().task_snapshot()
    }
}

impl LogStore for MemoryStore {
    fn subscribe(&self, on_snapshot: SnapshotFn<TimeLog>, on_error: ErrorFn) -> Subscription {
        let snapshot = self.state.lock().unwrap().log_snapshot();
        on_snapshot(&snapshot);
        self.log_events.subscribe(on_snapshot, on_error)
    }

    fn append(&self, log: NewTimeLog) -> Result<TimeLog> {
        let log = self.state.lock().unwrap().append_log(&log, Local::now());
        self.publish_logs();
        Ok(log)
    }

    fn remove_for_task(&self, task_id: Uuid) -> Result<usize> {
        let removed = self.state.lock().unwrap().remove_logs_for(task_id);
        if removed > 0 {
            self.publish_logs();
        }
        Ok(removed)
    }

    fn snapshot(&self) -> Vec<TimeLog> {
        self.state.lock().unwrap().log_snapshot()
    }
}
