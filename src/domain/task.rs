use super::enums::TaskStatus;
use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A tracked task with an estimate and an optional deadline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Store-assigned identity
    pub id: Uuid,
    /// Task title (non-empty)
    pub title: String,
    /// Current workflow status
    pub status: TaskStatus,
    /// Estimated effort in minutes
    pub estimated_minutes: u32,
    /// Deadline date (timezone-naive), if any
    pub deadline: Option<NaiveDate>,
    /// Soft-delete flag: hidden tasks stay retrievable and log-addressable
    pub is_visible: bool,
    /// When the task was created (store-assigned)
    pub created_at: DateTime<Local>,
    /// When the task was last updated
    pub updated_at: DateTime<Local>,
}

impl Task {
    /// Whether the task has reached its final status
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Done
    }

    /// True iff a deadline exists, the task is not completed, and `now` has
    /// moved past the deadline date.
    pub fn is_overdue(&self, now: DateTime<Local>) -> bool {
        match self.deadline {
            Some(deadline) if !self.is_completed() => now.date_naive() > deadline,
            _ => false,
        }
    }
}

/// User-submitted fields for creating a task
///
/// Status, visibility, identity, and creation time are assigned by the store
/// on create, never by the caller.
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub title: String,
    pub estimated_minutes: u32,
    pub deadline: NaiveDate,
}

impl TaskDraft {
    /// Build a draft from raw form input. The estimate is coerced: anything
    /// that does not parse as a non-negative number becomes 0.
    pub fn from_input(title: &str, estimate_raw: &str, deadline: NaiveDate) -> Self {
        Self {
            title: title.trim().to_string(),
            estimated_minutes: coerce_minutes(estimate_raw),
            deadline,
        }
    }
}

/// Partial update for a task; `None` fields are left untouched
///
/// `deadline` is doubly optional so a patch can clear it.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub status: Option<TaskStatus>,
    pub estimated_minutes: Option<u32>,
    pub deadline: Option<Option<NaiveDate>>,
    pub is_visible: Option<bool>,
}

impl TaskPatch {
    /// Apply this patch to a task, bumping `updated_at`
    pub fn apply(&self, task: &mut Task, now: DateTime<Local>) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(estimate) = self.estimated_minutes {
            task.estimated_minutes = estimate;
        }
        if let Some(deadline) = self.deadline {
            task.deadline = deadline;
        }
        if let Some(visible) = self.is_visible {
            task.is_visible = visible;
        }
        task.updated_at = now;
    }

    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn visibility(visible: bool) -> Self {
        Self {
            is_visible: Some(visible),
            ..Self::default()
        }
    }
}

/// Coerce raw estimate input to whole minutes (unparsable or negative -> 0)
pub fn coerce_minutes(raw: &str) -> u32 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|m| m.is_finite() && *m >= 0.0)
        .map(|m| m.round() as u32)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn sample_task(deadline: Option<NaiveDate>, status: TaskStatus) -> Task {
        let now = Local::now();
        Task {
            id: Uuid::new_v4(),
            title: "レポート作成".to_string(),
            status,
            estimated_minutes: 30,
            deadline,
            is_visible: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_is_overdue_requires_deadline() {
        let task = sample_task(None, TaskStatus::Todo);
        assert!(!task.is_overdue(Local::now()));
    }

    #[test]
    fn test_is_overdue_past_deadline() {
        let deadline = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let task = sample_task(Some(deadline), TaskStatus::Doing);

        let after = Local.with_ymd_and_hms(2024, 3, 2, 0, 30, 0).unwrap();
        assert!(task.is_overdue(after));

        // The deadline day itself is not yet overdue
        let on_day = Local.with_ymd_and_hms(2024, 3, 1, 23, 0, 0).unwrap();
        assert!(!task.is_overdue(on_day));
    }

    #[test]
    fn test_is_overdue_false_when_completed() {
        let deadline = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let task = sample_task(Some(deadline), TaskStatus::Done);
        let after = Local.with_ymd_and_hms(2024, 4, 1, 12, 0, 0).unwrap();
        assert!(!task.is_overdue(after));
    }

    #[test]
    fn test_coerce_minutes() {
        assert_eq!(coerce_minutes("30"), 30);
        assert_eq!(coerce_minutes(" 45 "), 45);
        assert_eq!(coerce_minutes("12.6"), 13);
        assert_eq!(coerce_minutes("-5"), 0);
        assert_eq!(coerce_minutes("abc"), 0);
        assert_eq!(coerce_minutes(""), 0);
    }

    #[test]
    fn test_patch_apply() {
        let mut task = sample_task(None, TaskStatus::Todo);
        let before = task.updated_at;

        let patch = TaskPatch {
            title: Some("文献調査".to_string()),
            status: Some(TaskStatus::Doing),
            estimated_minutes: Some(90),
            deadline: Some(Some(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())),
            is_visible: Some(false),
        };
        patch.apply(&mut task, before + Duration::seconds(5));

        assert_eq!(task.title, "文献調査");
        assert_eq!(task.status, TaskStatus::Doing);
        assert_eq!(task.estimated_minutes, 90);
        assert_eq!(task.deadline, NaiveDate::from_ymd_opt(2024, 5, 1));
        assert!(!task.is_visible);
        assert!(task.updated_at > before);
    }

    #[test]
    fn test_patch_can_clear_deadline() {
        let deadline = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let mut task = sample_task(Some(deadline), TaskStatus::Todo);

        let patch = TaskPatch {
            deadline: Some(None),
            ..TaskPatch::default()
        };
        patch.apply(&mut task, Local::now());
        assert_eq!(task.deadline, None);
    }

    #[test]
    fn test_draft_from_input_trims_and_coerces() {
        let deadline = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let draft = TaskDraft::from_input("  数学の課題 ", "x", deadline);
        assert_eq!(draft.title, "数学の課題");
        assert_eq!(draft.estimated_minutes, 0);
        assert_eq!(draft.deadline, deadline);
    }
}
