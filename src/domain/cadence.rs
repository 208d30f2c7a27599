use crate::domain::models::Meeting;
use chrono::NaiveDate;
use serde::Serialize;

/// Maximum gap between 1:1s before an employee is flagged.
pub const MEETING_CADENCE_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct MeetingCadence {
    pub overdue: bool,
    pub days_since_last_meeting: Option<i64>,
    pub last_date: Option<NaiveDate>,
}

/// Latest meeting by date. Equal dates resolve to the later record.
pub fn last_meeting<'a, I>(meetings: I) -> Option<&'a Meeting>
where
    I: IntoIterator<Item = &'a Meeting>,
{
    meetings
        .into_iter()
        .fold(None, |best: Option<&Meeting>, meeting| match best {
            Some(current) if current.date > meeting.date => Some(current),
            _ => Some(meeting),
        })
}

pub fn cadence_for(last_date: Option<NaiveDate>, today: NaiveDate) -> MeetingCadence {
    let days_since = last_date.map(|last| (today - last).num_days());
    let overdue = days_since
        .map(|days| days > MEETING_CADENCE_DAYS)
        .unwrap_or(true);

    MeetingCadence {
        overdue,
        days_since_last_meeting: days_since,
        last_date,
    }
}
