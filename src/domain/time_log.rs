use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One committed interval of work against a task
///
/// Logs are created only by the timer (live commit or retroactive entry) and
/// are immutable afterwards; they are removed only by a task's cascade
/// hard-delete. `duration_seconds` is the authoritative elapsed time: for
/// retroactive entries it is user-supplied and need not equal
/// `end_time - start_time`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeLog {
    /// Store-assigned identity
    pub id: Uuid,
    /// Owning task (many logs per task)
    pub task_id: Uuid,
    /// What was worked on during this session
    pub sub_task_name: String,
    pub start_time: DateTime<Local>,
    pub end_time: DateTime<Local>,
    /// Authoritative elapsed work time, non-negative
    pub duration_seconds: i64,
    /// When the log was appended (store-assigned)
    pub created_at: DateTime<Local>,
}

/// Fields for a log about to be appended; identity and `created_at` are
/// assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTimeLog {
    pub task_id: Uuid,
    pub sub_task_name: String,
    pub start_time: DateTime<Local>,
    pub end_time: DateTime<Local>,
    pub duration_seconds: i64,
}

impl NewTimeLog {
    /// Duration in whole minutes, rounded to nearest
    pub fn duration_minutes(&self) -> i64 {
        (self.duration_seconds as f64 / 60.0).round() as i64
    }
}

impl TimeLog {
    /// Duration in whole minutes, rounded to nearest
    pub fn duration_minutes(&self) -> i64 {
        (self.duration_seconds as f64 / 60.0).round() as i64
    }
}
