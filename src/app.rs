use crate::analytics::{self, CalendarEvent, TaskSummary, Timeline};
use crate::domain::{NewTimeLog, Task, TaskDraft, TaskPatch, TimeLog};
use crate::error::Result;
use crate::lifecycle::TaskLifecycle;
use crate::store::{JsonStore, LogStore, MemoryStore, Subscription, TaskStore};
use crate::timer::{CommitOutcome, Timer};
use chrono::Local;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Severity of a user-facing notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A message queued for the presentation layer to show the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Result of committing the running timer
#[derive(Debug, Clone)]
pub enum TimerCommit {
    /// The log was appended to the store
    Saved(TimeLog),
    /// The work description was empty; supply one via
    /// [`App::resolve_commit`] or back out with [`App::abandon_commit`].
    NeedsLabel,
}

/// Application coordinator: stores, timer, and the derived read models
///
/// The task and log views are refreshed wholesale from store snapshots;
/// nothing is patched incrementally and no mutation is applied
/// optimistically, so a failed write needs no rollback. Subscriptions are
/// torn down when the `App` is dropped.
pub struct App {
    lifecycle: TaskLifecycle,
    log_store: Arc<dyn LogStore>,
    timer: Timer,
    tasks: Arc<Mutex<Vec<Task>>>,
    logs: Arc<Mutex<Vec<TimeLog>>>,
    notices: Arc<Mutex<Vec<Notice>>>,
    show_hidden: bool,
    _subscriptions: Vec<Subscription>,
}

impl App {
    pub fn new(task_store: Arc<dyn TaskStore>, log_store: Arc<dyn LogStore>) -> Self {
        let tasks = Arc::new(Mutex::new(Vec::new()));
        let logs = Arc::new(Mutex::new(Vec::new()));
        let notices = Arc::new(Mutex::new(Vec::new()));

        let task_view = Arc::clone(&tasks);
        let task_notices = Arc::clone(&notices);
        let task_sub = task_store.subscribe(
            Box::new(move |snapshot: &[Task]| {
                // Whole-view replacement: last snapshot wins
                *task_view.lock().unwrap() = snapshot.to_vec();
            }),
            Box::new(move |err| {
                task_notices.lock().unwrap().push(Notice {
                    level: NoticeLevel::Error,
                    message: format!("タスクの監視に失敗しました: {}", err),
                });
            }),
        );

        let log_view = Arc::clone(&logs);
        let log_notices = Arc::clone(&notices);
        let log_sub = log_store.subscribe(
            Box::new(move |snapshot: &[TimeLog]| {
                *log_view.lock().unwrap() = snapshot.to_vec();
            }),
            Box::new(move |err| {
                log_notices.lock().unwrap().push(Notice {
                    level: NoticeLevel::Error,
                    message: format!("ログの監視に失敗しました: {}", err),
                });
            }),
        );

        Self {
            lifecycle: TaskLifecycle::new(task_store, Arc::clone(&log_store)),
            log_store,
            timer: Timer::new(),
            tasks,
            logs,
            notices,
            show_hidden: false,
            _subscriptions: vec![task_sub, log_sub],
        }
    }

    /// App over a fresh in-memory store
    pub fn with_memory_store() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::new(
            Arc::clone(&store) as Arc<dyn TaskStore>,
            store as Arc<dyn LogStore>,
        )
    }

    /// App over a JSON file store at `path`
    pub fn open_json_store(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Arc::new(JsonStore::open(path)?);
        Ok(Self::new(
            Arc::clone(&store) as Arc<dyn TaskStore>,
            store as Arc<dyn LogStore>,
        ))
    }

    // --- read models ---

    /// All tasks in the current snapshot, creation time ascending
    pub fn tasks(&self) -> Vec<Task> {
        self.tasks.lock().unwrap().clone()
    }

    /// Tasks for the default listing, honoring the show-hidden toggle
    pub fn listed_tasks(&self) -> Vec<Task> {
        self.tasks()
            .into_iter()
            .filter(|task| self.show_hidden || task.is_visible)
            .collect()
    }

    /// Tasks offered by the timer's task picker (visible only)
    pub fn selectable_tasks(&self) -> Vec<Task> {
        self.tasks()
            .into_iter()
            .filter(|task| task.is_visible)
            .collect()
    }

    pub fn show_hidden(&self) -> bool {
        self.show_hidden
    }

    pub fn toggle_show_hidden(&mut self) {
        self.show_hidden = !self.show_hidden;
    }

    /// All logs in the current snapshot, newest first
    pub fn logs(&self) -> Vec<TimeLog> {
        self.logs.lock().unwrap().clone()
    }

    /// Logs belonging to one task
    pub fn logs_for(&self, task_id: Uuid) -> Vec<TimeLog> {
        self.logs()
            .into_iter()
            .filter(|log| log.task_id == task_id)
            .collect()
    }

    /// Drain queued user-facing notices
    pub fn take_notices(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock().unwrap())
    }

    // --- task lifecycle ---

    pub fn create_task(&self, draft: TaskDraft) -> Result<Task> {
        self.lifecycle.create(draft)
    }

    pub fn update_task(&self, id: Uuid, patch: TaskPatch) -> Result<()> {
        self.lifecycle.update(id, patch)
    }

    pub fn soft_delete_task(&self, id: Uuid) -> Result<()> {
        self.lifecycle.soft_delete(id)
    }

    pub fn restore_task(&self, id: Uuid) -> Result<()> {
        self.lifecycle.restore(id)
    }

    pub fn complete_task(&self, id: Uuid) -> Result<()> {
        self.lifecycle.complete(id)
    }

    pub fn hard_delete_task(&self, id: Uuid) -> Result<()> {
        self.lifecycle.hard_delete(id)
    }

    // --- timer ---

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    pub fn select_timer_task(&mut self, task_id: Uuid) -> Result<()> {
        self.timer.select_task(task_id)
    }

    pub fn set_timer_label(&mut self, label: impl Into<String>) {
        self.timer.set_label(label);
    }

    pub fn start_timer(&mut self) -> Result<()> {
        self.timer.start(Local::now())
    }

    pub fn pause_timer(&mut self) -> Result<()> {
        self.timer.pause(Local::now())
    }

    pub fn resume_timer(&mut self) -> Result<()> {
        self.timer.resume(Local::now())
    }

    pub fn reset_timer(&mut self) -> Result<()> {
        self.timer.reset()
    }

    /// Elapsed display for the periodic redraw
    ///
    /// Call this on every tick of [`crate::ticker::tick_duration`]; a missed
    /// or late tick only stales the display, never the recorded time.
    pub fn timer_display(&self) -> String {
        self.timer.display(Local::now())
    }

    /// Commit the paused session, persisting the log on success
    ///
    /// When the append fails the session is reinstated as paused with its
    /// banked time, selection, and label intact, so the commit can simply be
    /// retried.
    pub fn commit_timer(&mut self) -> Result<TimerCommit> {
        match self.timer.commit(Local::now())? {
            CommitOutcome::Logged(log) => match self.save_log(log.clone()) {
                Ok(saved) => Ok(TimerCommit::Saved(saved)),
                Err(err) => {
                    self.timer.restore_session(&log);
                    Err(err)
                }
            },
            CommitOutcome::NeedsLabel => Ok(TimerCommit::NeedsLabel),
        }
    }

    /// Supply the missing label for a pending commit and persist the log
    ///
    /// A failed append reinstates the paused session just like
    /// [`App::commit_timer`]; the supplied label is kept on the timer.
    pub fn resolve_commit(&mut self, label: &str) -> Result<TimeLog> {
        let log = self.timer.resolve_commit(label)?;
        match self.save_log(log.clone()) {
            Ok(saved) => Ok(saved),
            Err(err) => {
                self.timer.restore_session(&log);
                Err(err)
            }
        }
    }

    /// Back out of a pending commit; the session stays paused
    pub fn abandon_commit(&mut self) -> Result<()> {
        self.timer.abandon_commit()
    }

    /// Record work after the fact without touching the running session
    pub fn log_manual(&self, task_id: Uuid, label: &str, minutes: u32) -> Result<TimeLog> {
        let log = self.timer.manual_entry(task_id, label, minutes, Local::now())?;
        self.save_log(log)
    }

    /// Append a committed log, then nudge the task out of TODO
    ///
    /// The status transition is fire-and-forget: its failure is queued as a
    /// notice and never undoes the already-appended log.
    fn save_log(&self, log: NewTimeLog) -> Result<TimeLog> {
        let saved = self.log_store.append(log)?;
        if let Err(err) = self.lifecycle.promote_to_doing(saved.task_id) {
            self.notices.lock().unwrap().push(Notice {
                level: NoticeLevel::Error,
                message: format!("ステータスの更新に失敗しました: {}", err),
            });
        }
        Ok(saved)
    }

    // --- analytics ---

    /// Estimate-versus-actual summary for one task
    pub fn summary_for(&self, task: &Task) -> TaskSummary {
        analytics::summarize(task, &self.logs())
    }

    /// Stacked timeline of one task's logs
    pub fn timeline_for(&self, task_id: Uuid, container_width: Option<f64>) -> Timeline {
        analytics::stacked_timeline(&self.logs_for(task_id), container_width)
    }

    /// Deadline calendar over the current task snapshot
    pub fn calendar_events(&self) -> Vec<CalendarEvent> {
        analytics::deadline_events(&self.tasks())
    }
}
