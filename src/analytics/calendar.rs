use crate::domain::{Task, TaskStatus};
use chrono::NaiveDate;
use uuid::Uuid;

/// Event color per status
pub fn status_color(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Todo => "#3174AD",
        TaskStatus::Doing => "#F59E0B",
        TaskStatus::Done => "#10B981",
    }
}

/// An all-day calendar event anchored at a task's deadline
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    pub task_id: Uuid,
    pub title: String,
    pub date: NaiveDate,
    pub status: TaskStatus,
    pub color: &'static str,
}

/// Map tasks onto a deadline calendar; tasks without a deadline are skipped
pub fn deadline_events(tasks: &[Task]) -> Vec<CalendarEvent> {
    tasks
        .iter()
        .filter_map(|task| {
            let date = task.deadline?;
            Some(CalendarEvent {
                task_id: task.id,
                title: task.title.clone(),
                date,
                status: task.status,
                color: status_color(task.status),
            })
        })
        .collect()
}
