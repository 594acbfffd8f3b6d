use uuid::Uuid;

/// Errors surfaced by timer, lifecycle, and store operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required input was missing or invalid. The operation was aborted
    /// with no partial state change.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A store operation was rejected. Local read models are left as-is;
    /// the next snapshot from the store is the source of truth.
    #[error("persistence failed: {0}")]
    Persistence(String),

    /// A cascade hard-delete failed partway. The task record is guaranteed
    /// to still exist so analytics never reads logs for a missing task.
    #[error("cascade delete aborted for task {task_id}: {reason}")]
    CascadeIntegrity { task_id: Uuid, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    pub fn persistence(msg: impl Into<String>) -> Self {
        Error::Persistence(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::validation("title is empty");
        assert_eq!(err.to_string(), "validation failed: title is empty");

        let id = Uuid::new_v4();
        let err = Error::CascadeIntegrity {
            task_id: id,
            reason: "log removal failed".to_string(),
        };
        assert!(err.to_string().contains(&id.to_string()));
    }
}
