use crate::domain::NewTimeLog;
use crate::error::{Error, Result};
use chrono::{DateTime, Duration, Local};
use uuid::Uuid;

/// Label recorded for retroactive entries submitted without a description
pub const RETRO_ENTRY_LABEL: &str = "事後報告";

/// Session state of the timer
///
/// Modeled as a tagged union so illegal combinations (running with no
/// session start, a pending commit with no captured log) cannot be
/// represented.
#[derive(Debug, Clone, PartialEq)]
pub enum TimerState {
    /// No session in progress, zero elapsed time
    Idle,
    /// Clock advancing since `session_start`
    Running {
        accumulated: Duration,
        session_start: DateTime<Local>,
    },
    /// Clock frozen with `accumulated` retained
    Paused { accumulated: Duration },
    /// Commit captured but blocked on a non-empty work description
    PendingCommit {
        accumulated: Duration,
        pending: NewTimeLog,
    },
}

/// Result of a commit attempt
#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome {
    /// The session was finalized into a log
    Logged(NewTimeLog),
    /// The work description was empty; the timer is holding the session in
    /// a pending-commit state until `resolve_commit` or `abandon_commit`.
    NeedsLabel,
}

/// Stopwatch-style timer that turns work sessions into time logs
///
/// All transitions take `now` explicitly; elapsed time is always derived
/// from wall-clock deltas, never from counting ticks, so delayed or
/// throttled redraws cannot drift the recorded duration.
#[derive(Debug)]
pub struct Timer {
    state: TimerState,
    selected_task: Option<Uuid>,
    label: String,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            state: TimerState::Idle,
            selected_task: None,
            label: String::new(),
        }
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, TimerState::Running { .. })
    }

    pub fn is_paused(&self) -> bool {
        matches!(self.state, TimerState::Paused { .. })
    }

    pub fn has_pending_commit(&self) -> bool {
        matches!(self.state, TimerState::PendingCommit { .. })
    }

    pub fn selected_task(&self) -> Option<Uuid> {
        self.selected_task
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Set the work-description label for the current session
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    /// Work time banked so far, excluding the session currently running
    pub fn accumulated_seconds(&self) -> i64 {
        match &self.state {
            TimerState::Idle => 0,
            TimerState::Running { accumulated, .. }
            | TimerState::Paused { accumulated }
            | TimerState::PendingCommit { accumulated, .. } => accumulated.num_seconds(),
        }
    }

    /// Task selection is immutable while work is banked or the clock runs
    pub fn selection_locked(&self) -> bool {
        self.is_running() || self.has_pending_commit() || self.accumulated_seconds() > 0
    }

    /// Choose the task the next session will be logged against
    pub fn select_task(&mut self, task_id: Uuid) -> Result<()> {
        if self.selection_locked() {
            return Err(Error::validation(
                "task selection is locked while a session is in progress",
            ));
        }
        self.selected_task = Some(task_id);
        Ok(())
    }

    /// Start a session for the selected task
    pub fn start(&mut self, now: DateTime<Local>) -> Result<()> {
        if !matches!(self.state, TimerState::Idle) {
            return Err(Error::validation("timer is already in a session"));
        }
        if self.selected_task.is_none() {
            return Err(Error::validation("no task selected"));
        }
        self.state = TimerState::Running {
            accumulated: Duration::zero(),
            session_start: now,
        };
        Ok(())
    }

    /// Freeze the clock, banking the session interval
    pub fn pause(&mut self, now: DateTime<Local>) -> Result<()> {
        match self.state {
            TimerState::Running {
                accumulated,
                session_start,
            } => {
                let session = now.signed_duration_since(session_start);
                let session = std::cmp::max(Duration::zero(), session);
                self.state = TimerState::Paused {
                    accumulated: accumulated + session,
                };
                Ok(())
            }
            _ => Err(Error::validation("timer is not running")),
        }
    }

    /// Continue a paused session; banked time and selection are preserved
    pub fn resume(&mut self, now: DateTime<Local>) -> Result<()> {
        match self.state {
            TimerState::Paused { accumulated } => {
                self.state = TimerState::Running {
                    accumulated,
                    session_start: now,
                };
                Ok(())
            }
            _ => Err(Error::validation("timer is not paused")),
        }
    }

    /// Finalize the paused session into a log
    ///
    /// With an empty label the timer holds the captured log in a
    /// pending-commit state instead; the end time captured here is kept even
    /// if the label arrives later via [`resolve_commit`](Self::resolve_commit).
    pub fn commit(&mut self, now: DateTime<Local>) -> Result<CommitOutcome> {
        let accumulated = match self.state {
            TimerState::Paused { accumulated } => accumulated,
            _ => return Err(Error::validation("timer is not paused")),
        };
        let task_id = self
            .selected_task
            .ok_or_else(|| Error::validation("no task selected"))?;

        let log = NewTimeLog {
            task_id,
            sub_task_name: self.label.trim().to_string(),
            start_time: now - accumulated,
            end_time: now,
            duration_seconds: accumulated.num_seconds(),
        };

        if log.sub_task_name.is_empty() {
            self.state = TimerState::PendingCommit {
                accumulated,
                pending: log,
            };
            return Ok(CommitOutcome::NeedsLabel);
        }

        self.finish_session();
        Ok(CommitOutcome::Logged(log))
    }

    /// Supply the missing work description and release the pending commit
    pub fn resolve_commit(&mut self, label: &str) -> Result<NewTimeLog> {
        let label = label.trim();
        match &self.state {
            TimerState::PendingCommit { pending, .. } => {
                if label.is_empty() {
                    return Err(Error::validation("work description is required"));
                }
                let mut log = pending.clone();
                log.sub_task_name = label.to_string();
                self.finish_session();
                Ok(log)
            }
            _ => Err(Error::validation("no commit is pending")),
        }
    }

    /// Abandon a pending commit, returning to Paused with time intact
    pub fn abandon_commit(&mut self) -> Result<()> {
        match self.state {
            TimerState::PendingCommit { accumulated, .. } => {
                self.state = TimerState::Paused { accumulated };
                Ok(())
            }
            _ => Err(Error::validation("no commit is pending")),
        }
    }

    /// Synthesize a log after the fact, without touching the session state
    ///
    /// A blank label silently falls back to [`RETRO_ENTRY_LABEL`]. This
    /// deliberately bypasses the non-empty-label gate enforced on live
    /// commits.
    pub fn manual_entry(
        &self,
        task_id: Uuid,
        label: &str,
        duration_minutes: u32,
        now: DateTime<Local>,
    ) -> Result<NewTimeLog> {
        if duration_minutes == 0 {
            return Err(Error::validation("duration must be greater than zero"));
        }
        let duration = Duration::seconds(i64::from(duration_minutes) * 60);
        let label = label.trim();
        Ok(NewTimeLog {
            task_id,
            sub_task_name: if label.is_empty() {
                RETRO_ENTRY_LABEL.to_string()
            } else {
                label.to_string()
            },
            start_time: now - duration,
            end_time: now,
            duration_seconds: duration.num_seconds(),
        })
    }

    /// Reinstate a finalized session whose log could not be persisted
    ///
    /// The banked time, task selection, and label are recovered from the
    /// unsaved log and the timer returns to Paused, so the commit can be
    /// retried once the store is healthy again.
    pub(crate) fn restore_session(&mut self, log: &NewTimeLog) {
        self.selected_task = Some(log.task_id);
        self.label = log.sub_task_name.clone();
        self.state = TimerState::Paused {
            accumulated: Duration::seconds(log.duration_seconds),
        };
    }

    /// Unlock the task selection; only legal with nothing banked
    pub fn reset(&mut self) -> Result<()> {
        if self.selection_locked() {
            return Err(Error::validation(
                "cannot reset while a session has accumulated time",
            ));
        }
        self.finish_session();
        Ok(())
    }

    /// Elapsed work time to display, derived from wall-clock deltas
    pub fn elapsed_seconds(&self, now: DateTime<Local>) -> i64 {
        match &self.state {
            TimerState::Idle => 0,
            TimerState::Running {
                accumulated,
                session_start,
            } => {
                let session = now.signed_duration_since(*session_start);
                let session = std::cmp::max(Duration::zero(), session);
                (*accumulated + session).num_seconds()
            }
            TimerState::Paused { accumulated }
            | TimerState::PendingCommit { accumulated, .. } => accumulated.num_seconds(),
        }
    }

    /// Elapsed time formatted as "HH:MM:SS"
    pub fn display(&self, now: DateTime<Local>) -> String {
        let total = self.elapsed_seconds(now);
        format!(
            "{:02}:{:02}:{:02}",
            total / 3600,
            (total % 3600) / 60,
            total % 60
        )
    }

    fn finish_session(&mut self) {
        self.state = TimerState::Idle;
        self.selected_task = None;
        self.label.clear();
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
