use super::subscription::{ErrorFn, Publisher, SnapshotFn, Subscription};
use super::{Collections, LogStore, TaskStore};
use crate::domain::{NewTimeLog, Task, TaskDraft, TaskPatch, TaskStatus, TimeLog};
use crate::error::{Error, Result};
use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;
use uuid::Uuid;

/// Default store location: ~/.kadai/store.json
pub fn default_store_path() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| Error::persistence("could not determine home directory"))?;
    Ok(home.join(".kadai").join("store.json"))
}

/// On-disk shape of the whole store
///
/// Timestamps cross the wire as RFC 3339 strings and are normalized to
/// `DateTime<Local>` when loaded.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    tasks: Vec<TaskRecord>,
    #[serde(default)]
    logs: Vec<LogRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskRecord {
    id: Uuid,
    title: String,
    status: TaskStatus,
    estimated_minutes: u32,
    deadline: Option<NaiveDate>,
    // Legacy records predate the soft-delete flag and count as visible
    #[serde(default = "default_visible")]
    is_visible: bool,
    created_at: String,
    updated_at: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LogRecord {
    id: Uuid,
    task_id: Uuid,
    sub_task_name: String,
    start_time: String,
    end_time: String,
    duration_seconds: i64,
    created_at: String,
}

fn default_visible() -> bool {
    true
}

fn parse_timestamp(raw: &str, field: &str) -> Result<DateTime<Local>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Local))
        .map_err(|e| Error::persistence(format!("invalid {} timestamp '{}': {}", field, raw, e)))
}

impl TaskRecord {
    fn from_task(task: &Task) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            status: task.status,
            estimated_minutes: task.estimated_minutes,
            deadline: task.deadline,
            is_visible: task.is_visible,
            created_at: task.created_at.to_rfc3339(),
            updated_at: task.updated_at.to_rfc3339(),
        }
    }

    fn into_task(self) -> Result<Task> {
        Ok(Task {
            id: self.id,
            title: self.title,
            status: self.status,
            estimated_minutes: self.estimated_minutes,
            deadline: self.deadline,
            is_visible: self.is_visible,
            created_at: parse_timestamp(&self.created_at, "createdAt")?,
            updated_at: parse_timestamp(&self.updated_at, "updatedAt")?,
        })
    }
}

impl LogRecord {
    fn from_log(log: &TimeLog) -> Self {
        Self {
            id: log.id,
            task_id: log.task_id,
            sub_task_name: log.sub_task_name.clone(),
            start_time: log.start_time.to_rfc3339(),
            end_time: log.end_time.to_rfc3339(),
            duration_seconds: log.duration_seconds,
            created_at: log.created_at.to_rfc3339(),
        }
    }

    fn into_log(self) -> Result<TimeLog> {
        Ok(TimeLog {
            id: self.id,
            task_id: self.task_id,
            sub_task_name: self.sub_task_name,
            start_time: parse_timestamp(&self.start_time, "startTime")?,
            end_time: parse_timestamp(&self.end_time, "endTime")?,
            duration_seconds: self.duration_seconds,
            created_at: parse_timestamp(&self.created_at, "createdAt")?,
        })
    }
}

/// File-backed store persisting tasks and logs as one JSON document
///
/// Both collections live in a single document and each mutation rewrites it
/// atomically, so the file never shows a task without its logs or vice
/// versa. A failed write leaves the in-memory state untouched: last known
/// good wins until the next successful mutation.
pub struct JsonStore {
    path: PathBuf,
    state: Mutex<Collections>,
    task_events: Publisher<Task>,
    log_events: Publisher<TimeLog>,
}

impl JsonStore {
    /// Open a store at `path`, loading the document if it exists
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let state = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| {
                Error::persistence(format!("failed to read {}: {}", path.display(), e))
            })?;
            let document: Document = serde_json::from_str(&content).map_err(|e| {
                Error::persistence(format!("failed to parse {}: {}", path.display(), e))
            })?;
            let mut collections = Collections::default();
            for record in document.tasks {
                collections.tasks.push(record.into_task()?);
            }
            for record in document.logs {
                collections.logs.push(record.into_log()?);
            }
            collections
        } else {
            Collections::default()
        };

        Ok(Self {
            path,
            state: Mutex::new(state),
            task_events: Publisher::new(),
            log_events: Publisher::new(),
        })
    }

    fn persist(&self, state: &Collections) -> Result<()> {
        let document = Document {
            tasks: state.tasks.iter().map(TaskRecord::from_task).collect(),
            logs: state.logs.iter().map(LogRecord::from_log).collect(),
        };
        let json = serde_json::to_string_pretty(&document)
            .map_err(|e| Error::persistence(format!("failed to serialize store: {}", e)))?;
        atomic_write(&self.path, &json)
    }

    /// Run a mutation against a copy of the state; commit to memory and
    /// notify only if the file write succeeded.
    fn mutate<T>(&self, apply: impl FnOnce(&mut Collections) -> Result<T>) -> Result<T> {
        let (value, tasks, logs) = {
            let mut guard = self.state.lock().unwrap();
            let mut next = guard.clone();
            let value = apply(&mut next)?;
            self.persist(&next)?;
            *guard = next;
            (value, guard.task_snapshot(), guard.log_snapshot())
        };
        self.task_events.publish(&tasks);
        self.log_events.publish(&logs);
        Ok(value)
    }
}

impl TaskStore for JsonStore {
    fn subscribe(&self, on_snapshot: SnapshotFn<Task>, on_error: ErrorFn) -> Subscription {
        let snapshot = self.state.lock().unwrap().task_snapshot();
        on_snapshot(&snapshot);
        self.task_events.subscribe(on_snapshot, on_error)
    }

    fn create(&self, draft: TaskDraft) -> Result<Task> {
        self.mutate(|state| Ok(state.create_task(&draft, Local::now())))
    }

    fn update(&self, id: Uuid, patch: TaskPatch) -> Result<()> {
        self.mutate(|state| state.update_task(id, &patch, Local::now()))
    }

    fn remove(&self, id: Uuid) -> Result<()> {
        self.mutate(|state| state.remove_task(id))
    }

    fn snapshot(&self) -> Vec<Task> {
        self.state.lock().unwrap().task_snapshot()
    }
}

impl LogStore for JsonStore {
    fn subscribe(&self, on_snapshot: SnapshotFn<TimeLog>, on_error: ErrorFn) -> Subscription {
        let snapshot = self.state.lock().unwrap().log_snapshot();
        on_snapshot(&snapshot);
        self.log_events.subscribe(on_snapshot, on_error)
    }

    fn append(&self, log: NewTimeLog) -> Result<TimeLog> {
        self.mutate(|state| Ok(state.append_log(&log, Local::now())))
    }

    fn remove_for_task(&self, task_id: Uuid) -> Result<usize> {
        self.mutate(|state| Ok(state.remove_logs_for(task_id)))
    }

    fn snapshot(&self) -> Vec<TimeLog> {
        self.state.lock().unwrap().log_snapshot()
    }
}

/// Atomically write content to a file using temp file + rename
fn atomic_write(path: &Path, content: &str) -> Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| Error::persistence("store path has no parent directory"))?;

    std::fs::create_dir_all(dir)
        .map_err(|e| Error::persistence(format!("failed to create {}: {}", dir.display(), e)))?;

    let mut temp_file = NamedTempFile::new_in(dir)
        .map_err(|e| Error::persistence(format!("failed to create temporary file: {}", e)))?;

    temp_file
        .write_all(content.as_bytes())
        .map_err(|e| Error::persistence(format!("failed to write temporary file: {}", e)))?;

    temp_file
        .as_file()
        .sync_all()
        .map_err(|e| Error::persistence(format!("failed to sync temporary file: {}", e)))?;

    temp_file
        .persist(path)
        .map_err(|e| Error::persistence(format!("failed to persist {}: {}", path.display(), e)))?;

    Ok(())
}
