//! Response shapes: joins ids to display names and applies list filters and
//! ordering. Nothing here decides visibility.

use crate::domain::cadence::{self, MeetingCadence};
use crate::domain::models::{ActionItem, Employee, Meeting, MeetingStatus, Progress, Workload};
use crate::domain::progress;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use uuid::Uuid;

pub const NO_MANAGER: &str = "No Manager";
pub const UNKNOWN: &str = "Unknown";
pub const UNASSIGNED: &str = "Unassigned";

/// Id -> display name lookup over the full roster, archived included.
pub struct Names<'a>(HashMap<Uuid, &'a str>);

impl<'a> Names<'a> {
    pub fn new(employees: &'a [Employee]) -> Self {
        Self(employees.iter().map(|emp| (emp.id, emp.name.as_str())).collect())
    }

    pub fn name_or(&self, id: Option<Uuid>, fallback: &str) -> String {
        id.and_then(|id| self.0.get(&id))
            .map(|name| name.to_string())
            .unwrap_or_else(|| fallback.to_string())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LastMeetingView {
    #[serde(flatten)]
    pub meeting: Meeting,
    pub person_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmployeeView {
    #[serde(flatten)]
    pub employee: Employee,
    pub manager_name: String,
    pub last_meeting: Option<LastMeetingView>,
    #[serde(flatten)]
    pub cadence: MeetingCadence,
}

pub fn employee_view(
    employee: &Employee,
    names: &Names<'_>,
    meetings: &[Meeting],
    today: NaiveDate,
) -> EmployeeView {
    let last = cadence::last_meeting(meetings.iter().filter(|m| m.employee_id == employee.id));
    EmployeeView {
        employee: employee.clone(),
        manager_name: names.name_or(employee.manager_id, NO_MANAGER),
        cadence: cadence::cadence_for(last.map(|m| m.date), today),
        last_meeting: last.map(|meeting| LastMeetingView {
            meeting: meeting.clone(),
            person_name: names.name_or(Some(meeting.person_id), UNKNOWN),
        }),
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardFilter {
    pub status: Option<MeetingStatus>,
    pub workload: Option<Workload>,
    pub search: Option<String>,
}

impl DashboardFilter {
    pub fn matches(&self, view: &EmployeeView) -> bool {
        let last = view.last_meeting.as_ref().map(|last| &last.meeting);
        if let Some(status) = self.status {
            if last.map(|m| m.status) != Some(status) {
                return false;
            }
        }
        if let Some(workload) = self.workload {
            if last.map(|m| m.workload) != Some(workload) {
                return false;
            }
        }
        match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => view
                .employee
                .name
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            _ => true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct DashboardStats {
    pub total: usize,
    pub overdue: usize,
    pub red: usize,
}

pub fn dashboard_stats(views: &[EmployeeView]) -> DashboardStats {
    DashboardStats {
        total: views.len(),
        overdue: views.iter().filter(|v| v.cadence.overdue).count(),
        red: views
            .iter()
            .filter(|v| {
                v.last_meeting
                    .as_ref()
                    .is_some_and(|last| last.meeting.status == MeetingStatus::Red)
            })
            .count(),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MeetingView {
    #[serde(flatten)]
    pub meeting: Meeting,
    pub person_name: String,
    pub action_items: Vec<ActionItem>,
}

/// Newest first; same-day meetings keep the later record on top.
pub fn meeting_history(
    meetings: Vec<Meeting>,
    names: &Names<'_>,
    mut items_by_meeting: HashMap<Uuid, Vec<ActionItem>>,
) -> Vec<MeetingView> {
    let mut ordered = meetings;
    ordered.reverse();
    ordered.sort_by(|a, b| b.date.cmp(&a.date));
    ordered
        .into_iter()
        .map(|meeting| MeetingView {
            person_name: names.name_or(Some(meeting.person_id), UNKNOWN),
            action_items: items_by_meeting.remove(&meeting.id).unwrap_or_default(),
            meeting,
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct ActionItemView {
    #[serde(flatten)]
    pub item: ActionItem,
    pub employee_id: Option<Uuid>,
    pub employee_name: String,
    pub responsible_name: String,
    pub created_by_name: String,
    pub meeting_date: Option<NaiveDate>,
    pub is_overdue: bool,
}

pub fn action_item_view(
    item: ActionItem,
    meetings: &HashMap<Uuid, &Meeting>,
    names: &Names<'_>,
    today: NaiveDate,
) -> ActionItemView {
    let meeting = meetings.get(&item.one_on_one_id);
    let employee_id = meeting.map(|m| m.employee_id);
    ActionItemView {
        employee_id,
        employee_name: names.name_or(employee_id, UNKNOWN),
        responsible_name: names.name_or(item.responsible_id, UNASSIGNED),
        created_by_name: names.name_or(Some(item.created_by), UNKNOWN),
        meeting_date: meeting.map(|m| m.date),
        is_overdue: progress::is_overdue(item.due_date, item.progress, today),
        item,
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    DueDate,
    Progress,
    EmployeeName,
    #[default]
    CreatedAt,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActionItemQuery {
    pub progress: Option<Progress>,
    #[serde(default)]
    pub sort: SortKey,
    #[serde(default)]
    pub order: SortOrder,
}

impl ActionItemQuery {
    /// Archived items only show up when asked for by name.
    pub fn includes(&self, progress: Progress) -> bool {
        match self.progress {
            Some(wanted) => progress == wanted,
            None => progress != Progress::Archived,
        }
    }
}

fn compare(key: SortKey, a: &ActionItemView, b: &ActionItemView) -> Ordering {
    match key {
        SortKey::DueDate => a.item.due_date.cmp(&b.item.due_date),
        SortKey::Progress => a.item.progress.as_str().cmp(b.item.progress.as_str()),
        SortKey::EmployeeName => a.employee_name.cmp(&b.employee_name),
        SortKey::CreatedAt => a.item.created_at.cmp(&b.item.created_at),
    }
}

/// Stable: equal keys keep their incoming order in both directions.
pub fn sort_action_items(views: &mut [ActionItemView], key: SortKey, order: SortOrder) {
    views.sort_by(|a, b| match order {
        SortOrder::Asc => compare(key, a, b),
        SortOrder::Desc => compare(key, b, a),
    });
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct ProgressCounts {
    pub total: usize,
    pub done: usize,
    pub in_progress: usize,
    pub overdue: usize,
}

pub fn progress_counts<'a>(items: impl IntoIterator<Item = &'a ActionItem>) -> ProgressCounts {
    items
        .into_iter()
        .fold(ProgressCounts::default(), |mut counts, item| {
            counts.total += 1;
            match item.progress {
                Progress::Done => counts.done += 1,
                Progress::InProgress => counts.in_progress += 1,
                Progress::Overdue => counts.overdue += 1,
                Progress::Archived => {}
            }
            counts
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::UserType;
    use chrono::{Duration, TimeZone, Utc};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn employee(name: &str, manager_id: Option<Uuid>) -> Employee {
        Employee {
            id: Uuid::new_v4(),
            name: name.to_string(),
            role: "Engineer".to_string(),
            email: format!("{}@co.com", name.to_lowercase()),
            user_type: UserType::Employee,
            manager_id,
            archived: false,
            is_admin: false,
            created_at: Utc::now(),
        }
    }

    fn meeting(employee_id: Uuid, person_id: Uuid, date: NaiveDate, status: MeetingStatus) -> Meeting {
        Meeting {
            id: Uuid::new_v4(),
            employee_id,
            person_id,
            date,
            topics: format!("topics {date}"),
            status,
            workload: Workload::Balanced,
            created_at: Utc::now(),
        }
    }

    fn view(text: &str, due: NaiveDate, progress: Progress, employee_name: &str, minute: u32) -> ActionItemView {
        ActionItemView {
            item: ActionItem {
                id: Uuid::new_v4(),
                one_on_one_id: Uuid::new_v4(),
                text: text.to_string(),
                due_date: due,
                done: progress == Progress::Done,
                responsible_id: None,
                created_by: Uuid::new_v4(),
                created_at: Utc.with_ymd_and_hms(2024, 6, 1, 9, minute, 0).unwrap(),
                progress,
            },
            employee_id: None,
            employee_name: employee_name.to_string(),
            responsible_name: UNASSIGNED.to_string(),
            created_by_name: UNKNOWN.to_string(),
            meeting_date: None,
            is_overdue: false,
        }
    }

    fn texts(views: &[ActionItemView]) -> Vec<&str> {
        views.iter().map(|v| v.item.text.as_str()).collect()
    }

    #[test]
    fn test_employee_view_with_fallbacks() {
        let orphan = employee("Orphan", Some(Uuid::new_v4()));
        let roster = vec![orphan.clone()];
        let names = Names::new(&roster);
        let today = day(20);
        let meetings = vec![meeting(orphan.id, Uuid::new_v4(), today - Duration::days(3), MeetingStatus::Red)];

        let v = employee_view(&orphan, &names, &meetings, today);
        assert_eq!(v.manager_name, NO_MANAGER);
        assert_eq!(v.last_meeting.as_ref().unwrap().person_name, UNKNOWN);
        assert!(!v.cadence.overdue);
        assert_eq!(v.cadence.days_since_last_meeting, Some(3));

        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["name"], "Orphan");
        assert_eq!(json["overdue"], false);
        assert_eq!(json["last_meeting"]["status"], "Red");
    }

    #[test]
    fn test_dashboard_filter_and_stats() {
        let lead = employee("Lead", None);
        let jamie = employee("Jamie", Some(lead.id));
        let casey = employee("Casey", Some(lead.id));
        let riley = employee("Riley", Some(lead.id));
        let roster = vec![lead.clone(), jamie.clone(), casey.clone(), riley.clone()];
        let names = Names::new(&roster);
        let today = day(30);
        let meetings = vec![
            meeting(jamie.id, lead.id, today - Duration::days(40), MeetingStatus::Red),
            meeting(riley.id, lead.id, today - Duration::days(5), MeetingStatus::Green),
        ];
        let views: Vec<EmployeeView> = [&jamie, &casey, &riley]
            .into_iter()
            .map(|e| employee_view(e, &names, &meetings, today))
            .collect();

        assert_eq!(dashboard_stats(&views), DashboardStats { total: 3, overdue: 2, red: 1 });
        assert_eq!(views[0].last_meeting.as_ref().unwrap().person_name, "Lead");

        let red = DashboardFilter { status: Some(MeetingStatus::Red), ..Default::default() };
        assert_eq!(views.iter().filter(|v| red.matches(v)).count(), 1);
        let search = DashboardFilter { search: Some(" ri".to_string()), ..Default::default() };
        let found: Vec<&str> = views
            .iter()
            .filter(|v| search.matches(v))
            .map(|v| v.employee.name.as_str())
            .collect();
        assert_eq!(found, vec!["Riley"]);
    }

    #[test]
    fn test_meeting_history_newest_first() {
        let emp = employee("E", None);
        let roster = vec![emp.clone()];
        let names = Names::new(&roster);
        let first = meeting(emp.id, emp.id, day(1), MeetingStatus::Green);
        let same_day_later = meeting(emp.id, emp.id, day(1), MeetingStatus::Yellow);
        let newest = meeting(emp.id, emp.id, day(5), MeetingStatus::Red);
        let items = HashMap::new();

        let history = meeting_history(vec![first.clone(), same_day_later.clone(), newest.clone()], &names, items);
        let ids: Vec<Uuid> = history.iter().map(|m| m.meeting.id).collect();
        assert_eq!(ids, vec![newest.id, same_day_later.id, first.id]);
        assert_eq!(history[0].person_name, "E");
    }

    #[test]
    fn test_action_item_view_joins_names() {
        let emp = employee("Ann", None);
        let roster = vec![emp.clone()];
        let names = Names::new(&roster);
        let m = meeting(emp.id, Uuid::new_v4(), day(1), MeetingStatus::Green);
        let meetings: HashMap<Uuid, &Meeting> = [(m.id, &m)].into_iter().collect();
        let mut item = view("x", day(5), Progress::InProgress, "", 0).item;
        item.one_on_one_id = m.id;
        item.responsible_id = Some(emp.id);

        let v = action_item_view(item, &meetings, &names, day(10));
        assert_eq!(v.employee_name, "Ann");
        assert_eq!(v.responsible_name, "Ann");
        assert_eq!(v.created_by_name, UNKNOWN);
        assert_eq!(v.meeting_date, Some(day(1)));
        assert!(v.is_overdue);

        let orphan = view("y", day(5), Progress::Done, "", 0).item;
        let v = action_item_view(orphan, &meetings, &names, day(10));
        assert_eq!(v.employee_name, UNKNOWN);
        assert_eq!(v.responsible_name, UNASSIGNED);
        assert!(!v.is_overdue);
    }

    #[test]
    fn test_sort_is_stable_both_ways() {
        let mut views = vec![
            view("a", day(5), Progress::Overdue, "Zed", 0),
            view("b", day(3), Progress::Done, "Amy", 1),
            view("c", day(5), Progress::InProgress, "Amy", 2),
        ];

        sort_action_items(&mut views, SortKey::DueDate, SortOrder::Asc);
        assert_eq!(texts(&views), vec!["b", "a", "c"]);
        sort_action_items(&mut views, SortKey::DueDate, SortOrder::Desc);
        assert_eq!(texts(&views), vec!["a", "c", "b"]);
        sort_action_items(&mut views, SortKey::EmployeeName, SortOrder::Asc);
        assert_eq!(texts(&views), vec!["c", "b", "a"]);
        sort_action_items(&mut views, SortKey::Progress, SortOrder::Asc);
        assert_eq!(texts(&views), vec!["b", "c", "a"]);
        sort_action_items(&mut views, SortKey::CreatedAt, SortOrder::Desc);
        assert_eq!(texts(&views), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_archived_only_when_asked() {
        let default = ActionItemQuery::default();
        assert!(default.includes(Progress::Overdue));
        assert!(!default.includes(Progress::Archived));

        let archived = ActionItemQuery { progress: Some(Progress::Archived), ..Default::default() };
        assert!(archived.includes(Progress::Archived));
        assert!(!archived.includes(Progress::Done));
    }

    #[test]
    fn test_progress_counts() {
        let items: Vec<ActionItem> = [Progress::Done, Progress::Overdue, Progress::Overdue, Progress::InProgress]
            .into_iter()
            .map(|p| view("x", day(1), p, "", 0).item)
            .collect();
        assert_eq!(
            progress_counts(&items),
            ProgressCounts { total: 4, done: 1, in_progress: 1, overdue: 2 }
        );
    }
}
