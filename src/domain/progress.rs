//! Action item progress derivation.
//!
//! Everything that decides whether an item is overdue goes through
//! [`schedule_state`], on the write path (creation, updates) and on the read
//! path ([`is_overdue`]) alike.

use crate::domain::models::Progress;
use chrono::NaiveDate;

/// Progress implied by the due date alone.
pub fn schedule_state(due_date: NaiveDate, today: NaiveDate) -> Progress {
    if due_date < today {
        Progress::Overdue
    } else {
        Progress::InProgress
    }
}

/// Progress of a freshly created item.
pub fn initial_progress(due_date: NaiveDate, done: bool, created_on: NaiveDate) -> Progress {
    if done {
        Progress::Done
    } else {
        schedule_state(due_date, created_on)
    }
}

/// Display-time overdue check. May disagree with a stored `Overdue` that has
/// not been recomputed yet; this one wins for highlighting.
pub fn is_overdue(due_date: NaiveDate, progress: Progress, today: NaiveDate) -> bool {
    progress != Progress::Done && schedule_state(due_date, today) == Progress::Overdue
}

/// Fields of an update call that influence progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressChange {
    pub done: Option<bool>,
    pub progress: Option<Progress>,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub progress: Progress,
    pub done: bool,
}

/// Two-step transition for an update call.
///
/// Step one derives a progress from the `done` argument. Step two settles
/// precedence: `done = true` always yields `Done`. `done = false` sent with
/// `progress = Done` re-derives from the due date. Otherwise an explicit
/// `progress` beats the derived value, and a bare due date change
/// re-derives an open item. `done` is true exactly when the result is `Done`.
pub fn transition(
    previous: Progress,
    stored_due: NaiveDate,
    change: ProgressChange,
    today: NaiveDate,
) -> Transition {
    let due_date = change.due_date.unwrap_or(stored_due);

    let derived = match change.done {
        Some(true) => Some(Progress::Done),
        Some(false) if previous == Progress::Done => Some(schedule_state(due_date, today)),
        _ => None,
    };

    let progress = if change.done == Some(true) {
        Progress::Done
    } else if change.done == Some(false) && change.progress == Some(Progress::Done) {
        schedule_state(due_date, today)
    } else if let Some(explicit) = change.progress {
        explicit
    } else if let Some(derived) = derived {
        derived
    } else if change.due_date.is_some()
        && matches!(previous, Progress::InProgress | Progress::Overdue)
    {
        schedule_state(due_date, today)
    } else {
        previous
    };

    Transition {
        progress,
        done: progress == Progress::Done,
    }
}
