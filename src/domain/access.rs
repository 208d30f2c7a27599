//! Role-based visibility rules.
//!
//! Every function here is pure: it receives the resolved caller and the
//! candidate records and answers what the caller may see or change.

use crate::domain::models::{ActionItem, Employee, UserType};
use serde::Serialize;

/// Exact, case-sensitive email match against the roster.
pub fn resolve_caller<'a>(employees: &'a [Employee], email: &str) -> Option<&'a Employee> {
    employees.iter().find(|emp| emp.email == email)
}

/// Employees listed on the caller's dashboard.
pub fn visible_employees<'a>(caller: &Employee, employees: &'a [Employee]) -> Vec<&'a Employee> {
    let active = employees.iter().filter(|emp| !emp.archived);
    match caller.user_type {
        UserType::Hr => active.collect(),
        UserType::Lead => active.filter(|emp| emp.manager_id == Some(caller.id)).collect(),
        UserType::Employee => Vec::new(),
    }
}

/// Whether the caller may read the 1:1 history of `target`.
/// A missing target is only readable by leads and HR (who then see nothing).
pub fn can_view_meetings(caller: &Employee, target: Option<&Employee>) -> bool {
    caller.user_type.conducts_meetings()
        || target.is_some_and(|emp| emp.manager_id == Some(caller.id))
}

pub fn can_view_employee(caller: &Employee, target: &Employee) -> bool {
    caller.id == target.id || can_view_meetings(caller, Some(target))
}

pub fn can_view_action_item(caller: &Employee, item: &ActionItem) -> bool {
    match caller.user_type {
        UserType::Hr => true,
        UserType::Lead => item.created_by == caller.id || item.responsible_id == Some(caller.id),
        UserType::Employee => item.responsible_id == Some(caller.id),
    }
}

/// Create, edit and delete employees, reset seed data.
pub fn can_manage_employees(caller: &Employee) -> bool {
    caller.is_admin
}

/// Full roster including archived employees.
pub fn can_list_all_employees(caller: &Employee) -> bool {
    caller.user_type == UserType::Hr || caller.is_admin
}

pub fn can_write_meetings(caller: &Employee) -> bool {
    caller.user_type.conducts_meetings()
}

pub fn can_create_action_items(caller: &Employee) -> bool {
    caller.user_type.conducts_meetings()
}

pub fn can_update_action_item(caller: &Employee, item: &ActionItem) -> bool {
    caller.user_type == UserType::Hr
        || caller.is_admin
        || item.created_by == caller.id
        || item.responsible_id == Some(caller.id)
}

pub fn can_delete_action_item(caller: &Employee, item: &ActionItem) -> bool {
    caller.user_type == UserType::Hr || caller.is_admin || item.created_by == caller.id
}

/// Active leads and HR, offered as conductors and responsible parties.
pub fn leads_and_hr<'a>(caller: &Employee, employees: &'a [Employee]) -> Vec<&'a Employee> {
    if !caller.user_type.conducts_meetings() {
        return Vec::new();
    }
    employees
        .iter()
        .filter(|emp| !emp.archived && emp.user_type.conducts_meetings())
        .collect()
}

/// Sorted, de-duplicated job titles among the caller's visible employees.
pub fn distinct_roles(caller: &Employee, employees: &[Employee]) -> Vec<String> {
    let mut roles: Vec<String> = visible_employees(caller, employees)
        .into_iter()
        .map(|emp| emp.role.trim())
        .filter(|role| !role.is_empty())
        .map(str::to_string)
        .collect();
    roles.sort();
    roles.dedup();
    roles
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Capabilities {
    pub view_dashboard: bool,
    pub write_meetings: bool,
    pub manage_employees: bool,
    pub list_all_employees: bool,
}

pub fn capabilities(caller: &Employee) -> Capabilities {
    Capabilities {
        view_dashboard: caller.user_type.conducts_meetings(),
        write_meetings: can_write_meetings(caller),
        manage_employees: can_manage_employees(caller),
        list_all_employees: can_list_all_employees(caller),
    }
}
