use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "user_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Employee,
    Lead,
    Hr,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Employee => "employee",
            UserType::Lead => "lead",
            UserType::Hr => "hr",
        }
    }

    /// Leads and HR run 1:1s and manage their outcomes.
    pub fn conducts_meetings(&self) -> bool {
        matches!(self, UserType::Lead | UserType::Hr)
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "meeting_status")]
pub enum MeetingStatus {
    Green,
    Yellow,
    Red,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "workload")]
pub enum Workload {
    Low,
    Balanced,
    Overloaded,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "progress", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Progress {
    InProgress,
    Done,
    Overdue,
    Archived,
}

impl Progress {
    pub fn as_str(&self) -> &'static str {
        match self {
            Progress::InProgress => "in_progress",
            Progress::Done => "done",
            Progress::Overdue => "overdue",
            Progress::Archived => "archived",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct Employee {
    pub id: Uuid,
    pub name: String,
    pub role: String,
    pub email: String,
    pub user_type: UserType,
    pub manager_id: Option<Uuid>,
    pub archived: bool,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// A 1:1 meeting record. `person_id` is whoever conducted it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct Meeting {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub person_id: Uuid,
    pub date: NaiveDate,
    pub topics: String,
    pub status: MeetingStatus,
    pub workload: Workload,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct ActionItem {
    pub id: Uuid,
    pub one_on_one_id: Uuid,
    pub text: String,
    pub due_date: NaiveDate,
    pub done: bool,
    pub responsible_id: Option<Uuid>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub progress: Progress,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewEmployee {
    pub name: String,
    pub email: String,
    pub role: String,
    pub user_type: UserType,
    pub manager_id: Option<Uuid>,
    #[serde(default)]
    pub is_admin: bool,
}

/// Partial employee update. `manager_id: Some(None)` clears the manager.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeeUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub user_type: Option<UserType>,
    #[serde(default, deserialize_with = "double_option")]
    pub manager_id: Option<Option<Uuid>>,
    pub is_admin: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewMeeting {
    pub employee_id: Uuid,
    pub person_id: Uuid,
    pub date: NaiveDate,
    pub topics: String,
    pub status: MeetingStatus,
    pub workload: Workload,
    #[serde(default)]
    pub action_items: Vec<NewMeetingActionItem>,
}

/// Action item captured on the meeting form itself.
#[derive(Debug, Clone, Deserialize)]
pub struct NewMeetingActionItem {
    pub text: String,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub done: bool,
    pub responsible_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MeetingUpdate {
    pub date: NaiveDate,
    pub person_id: Uuid,
    pub topics: String,
    pub status: MeetingStatus,
    pub workload: Workload,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewActionItem {
    pub one_on_one_id: Uuid,
    pub text: String,
    pub due_date: NaiveDate,
    pub responsible_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActionItemUpdate {
    pub text: Option<String>,
    pub done: Option<bool>,
    pub due_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "double_option")]
    pub responsible_id: Option<Option<Uuid>>,
    pub progress: Option<Progress>,
}

// Distinguishes an absent field (None) from an explicit null (Some(None)).
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(serde_json::to_string(&UserType::Hr).unwrap(), "\"hr\"");
        assert_eq!(
            serde_json::to_string(&Progress::InProgress).unwrap(),
            "\"in_progress\""
        );
        assert_eq!(serde_json::to_string(&MeetingStatus::Red).unwrap(), "\"Red\"");
        assert_eq!(
            serde_json::from_str::<Workload>("\"Overloaded\"").unwrap(),
            Workload::Overloaded
        );
    }

    #[test]
    fn test_update_distinguishes_null_from_absent() {
        let absent: EmployeeUpdate = serde_json::from_str(r#"{"name":"A"}"#).unwrap();
        assert_eq!(absent.manager_id, None);

        let cleared: EmployeeUpdate = serde_json::from_str(r#"{"manager_id":null}"#).unwrap();
        assert_eq!(cleared.manager_id, Some(None));

        let id = Uuid::new_v4();
        let set: ActionItemUpdate =
            serde_json::from_str(&format!(r#"{{"responsible_id":"{id}"}}"#)).unwrap();
        assert_eq!(set.responsible_id, Some(Some(id)));
    }

    #[test]
    fn test_malformed_date_is_rejected() {
        let raw = r#"{"one_on_one_id":"7c0f5a52-6f0b-4a39-9a0e-4b0a7c0b6f11","text":"x","due_date":"next week"}"#;
        assert!(serde_json::from_str::<NewActionItem>(raw).is_err());
    }
}
