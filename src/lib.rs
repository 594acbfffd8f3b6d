//! Personal task and time tracking core.
//!
//! Tasks carry an estimate and a deadline; a stopwatch-style [`timer::Timer`]
//! turns work sessions into immutable [`domain::TimeLog`] records; the
//! [`analytics`] module derives time debt and a stacked timeline from the
//! accumulated logs. Persistence goes through the [`store`] contracts
//! (in-memory or JSON file backed), and [`app::App`] wires everything
//! together for a presentation layer.

pub mod analytics;
pub mod app;
pub mod domain;
pub mod error;
pub mod lifecycle;
pub mod store;
pub mod ticker;
pub mod timer;

pub use analytics::{CalendarEvent, Segment, TaskSummary, Timeline};
pub use app::{App, Notice, NoticeLevel, TimerCommit};
pub use domain::{NewTimeLog, Task, TaskDraft, TaskPatch, TaskStatus, TimeLog};
pub use error::{Error, Result};
pub use lifecycle::TaskLifecycle;
pub use store::{JsonStore, LogStore, MemoryStore, Subscription, TaskStore};
pub use timer::{CommitOutcome, Timer, TimerState};
