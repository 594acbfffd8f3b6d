use serde::{Deserialize, Serialize};

/// Workflow status of a task
///
/// Moves forward Todo -> Doing -> Done under normal flow (the timer promotes
/// Todo to Doing on the first committed log, `complete` sets Done). Direct
/// edits may set any value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskStatus {
    Todo,
    Doing,
    Done,
}

impl TaskStatus {
    /// Parse status from a tag like "DOING"
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_uppercase().as_str() {
            "TODO" => Some(Self::Todo),
            "DOING" => Some(Self::Doing),
            "DONE" => Some(Self::Done),
            _ => None,
        }
    }

    /// Convert status to its tag form
    pub fn to_tag(&self) -> &'static str {
        match self {
            Self::Todo => "TODO",
            Self::Doing => "DOING",
            Self::Done => "DONE",
        }
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::Todo
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_status_from_tag() {
        assert_eq!(TaskStatus::from_tag("TODO"), Some(TaskStatus::Todo));
        assert_eq!(TaskStatus::from_tag("DOING"), Some(TaskStatus::Doing));
        assert_eq!(TaskStatus::from_tag("done"), Some(TaskStatus::Done));
        assert_eq!(TaskStatus::from_tag("INVALID"), None);
    }

    #[test]
    fn test_task_status_to_tag() {
        assert_eq!(TaskStatus::Todo.to_tag(), "TODO");
        assert_eq!(TaskStatus::Doing.to_tag(), "DOING");
        assert_eq!(TaskStatus::Done.to_tag(), "DONE");
    }

    #[test]
    fn test_task_status_default() {
        assert_eq!(TaskStatus::default(), TaskStatus::Todo);
    }
}
