pub mod enums;
pub mod task;
pub mod time_log;

pub use enums::TaskStatus;
pub use task::{coerce_minutes, Task, TaskDraft, TaskPatch};
pub use time_log::{NewTimeLog, TimeLog};
