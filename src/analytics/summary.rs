use crate::domain::{Task, TimeLog};

/// Estimate-versus-actual comparison for one task
#[derive(Debug, Clone, PartialEq)]
pub struct TaskSummary {
    pub estimated_minutes: f64,
    pub actual_minutes: f64,
    /// Actual minus estimate; positive means the estimate was overrun
    pub debt_minutes: f64,
}

impl TaskSummary {
    /// True while more time has been logged than was estimated
    pub fn is_over_budget(&self) -> bool {
        self.debt_minutes > 0.0
    }

    /// Display label for the debt column
    pub fn debt_label(&self) -> &'static str {
        if self.is_over_budget() {
            "時間負債 (使いすぎ)"
        } else {
            "時間貯金 (余裕)"
        }
    }

    /// Signed debt for display, e.g. "+15分" or "-30分"
    pub fn debt_formatted(&self) -> String {
        let magnitude = format_minutes(self.debt_minutes.abs());
        if self.debt_minutes > 0.0 {
            format!("+{}", magnitude)
        } else if self.debt_minutes < 0.0 {
            format!("-{}", magnitude)
        } else {
            magnitude
        }
    }
}

/// Total logged minutes for a task
pub fn actual_minutes(task: &Task, logs: &[TimeLog]) -> f64 {
    let total_seconds: i64 = logs
        .iter()
        .filter(|log| log.task_id == task.id)
        .map(|log| log.duration_seconds)
        .sum();
    total_seconds as f64 / 60.0
}

/// Compare a task's estimate against its accumulated logs
pub fn summarize(task: &Task, logs: &[TimeLog]) -> TaskSummary {
    let estimated = f64::from(task.estimated_minutes);
    let actual = actual_minutes(task, logs);
    TaskSummary {
        estimated_minutes: estimated,
        actual_minutes: actual,
        debt_minutes: actual - estimated,
    }
}

/// Format a minute quantity for display
///
/// Anything over an hour is shown in hours with one decimal place,
/// everything else in whole minutes: 45 -> "45分", 90 -> "1.5時間".
pub fn format_minutes(minutes: f64) -> String {
    if minutes > 60.0 {
        format!("{:.1}時間", minutes / 60.0)
    } else {
        format!("{}分", minutes.round() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskStatus;
    use chrono::{Duration, Local};
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    fn task_with_estimate(estimated_minutes: u32) -> Task {
        let now = Local::now();
        Task {
            id: Uuid::new_v4(),
            title: "数学の課題".to_string(),
            status: TaskStatus::Doing,
            estimated_minutes,
            deadline: None,
            is_visible: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn log_for(task: &Task, duration_seconds: i64) -> TimeLog {
        let now = Local::now();
        TimeLog {
            id: Uuid::new_v4(),
            task_id: task.id,
            sub_task_name: "作業".to_string(),
            start_time: now - Duration::seconds(duration_seconds),
            end_time: now,
            duration_seconds,
            created_at: now,
        }
    }

    #[test]
    fn test_summary_zero_debt_is_surplus() {
        let task = task_with_estimate(30);
        let logs = vec![log_for(&task, 1800)];

        let summary = summarize(&task, &logs);
        assert_eq!(summary.actual_minutes, 30.0);
        assert_eq!(summary.debt_minutes, 0.0);
        assert!(!summary.is_over_budget());
        assert_eq!(summary.debt_label(), "時間貯金 (余裕)");
        assert_eq!(summary.debt_formatted(), "0分");
    }

    #[test]
    fn test_summary_overrun_is_debt() {
        let task = task_with_estimate(30);
        let logs = vec![log_for(&task, 1800), log_for(&task, 900)];

        let summary = summarize(&task, &logs);
        assert_eq!(summary.actual_minutes, 45.0);
        assert_eq!(summary.debt_minutes, 15.0);
        assert!(summary.is_over_budget());
        assert_eq!(summary.debt_label(), "時間負債 (使いすぎ)");
        assert_eq!(summary.debt_formatted(), "+15分");
    }

    #[test]
    fn test_summary_ignores_other_tasks_logs() {
        let task = task_with_estimate(10);
        let other = task_with_estimate(10);
        let logs = vec![log_for(&task, 600), log_for(&other, 6000)];

        let summary = summarize(&task, &logs);
        assert_eq!(summary.actual_minutes, 10.0);
    }

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(45.0), "45分");
        assert_eq!(format_minutes(90.0), "1.5時間");
        assert_eq!(format_minutes(60.0), "60分");
        assert_eq!(format_minutes(0.0), "0分");
        assert_eq!(format_minutes(140.0), "2.3時間");
    }
}
