use super::views::{self, DashboardFilter, DashboardStats, EmployeeView, Names};
use super::{caller_and_roster, Clock};
use crate::db::{seed, Store};
use crate::domain::access::{self, Capabilities};
use crate::domain::hierarchy;
use crate::domain::models::{Employee, EmployeeUpdate, NewEmployee};
use crate::domain::validation;
use crate::error::{CoreError, CoreResult};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct Me {
    #[serde(flatten)]
    pub employee: Employee,
    pub capabilities: Capabilities,
}

#[derive(Debug, Serialize)]
pub struct EmployeeDashboard {
    pub stats: DashboardStats,
    pub employees: Vec<EmployeeView>,
}

pub async fn me(store: &dyn Store, email: &str) -> CoreResult<Me> {
    let caller = super::resolve_caller(store, email).await?;
    Ok(Me {
        capabilities: access::capabilities(&caller),
        employee: caller,
    })
}

pub async fn list_visible(store: &dyn Store, email: &str) -> CoreResult<Vec<Employee>> {
    let (caller, employees) = caller_and_roster(store, email).await?;
    Ok(access::visible_employees(&caller, &employees)
        .into_iter()
        .cloned()
        .collect())
}

/// Visible employees with manager name, last 1:1 and cadence. Stats cover
/// every visible employee; the filter narrows only the listed rows.
pub async fn dashboard(
    store: &dyn Store,
    email: &str,
    filter: &DashboardFilter,
    clock: Clock,
) -> CoreResult<EmployeeDashboard> {
    let (caller, employees) = caller_and_roster(store, email).await?;
    let visible = access::visible_employees(&caller, &employees);
    if visible.is_empty() {
        return Ok(EmployeeDashboard {
            stats: DashboardStats::default(),
            employees: Vec::new(),
        });
    }

    let meetings = store.list_meetings().await?;
    let names = Names::new(&employees);
    let all: Vec<EmployeeView> = visible
        .into_iter()
        .map(|emp| views::employee_view(emp, &names, &meetings, clock.today))
        .collect();

    let stats = views::dashboard_stats(&all);
    let employees = all.into_iter().filter(|v| filter.matches(v)).collect();
    Ok(EmployeeDashboard { stats, employees })
}

pub async fn get_employee(
    store: &dyn Store,
    email: &str,
    id: Uuid,
    clock: Clock,
) -> CoreResult<EmployeeView> {
    let (caller, employees) = caller_and_roster(store, email).await?;
    let target = employees
        .iter()
        .find(|emp| emp.id == id)
        .filter(|emp| access::can_view_employee(&caller, emp))
        .ok_or(CoreError::NotFound("employee"))?;

    let meetings = store.list_meetings_for_employee(id).await?;
    let names = Names::new(&employees);
    Ok(views::employee_view(target, &names, &meetings, clock.today))
}

pub async fn leads_and_hr(store: &dyn Store, email: &str) -> CoreResult<Vec<Employee>> {
    let (caller, employees) = caller_and_roster(store, email).await?;
    Ok(access::leads_and_hr(&caller, &employees)
        .into_iter()
        .cloned()
        .collect())
}

pub async fn distinct_roles(store: &dyn Store, email: &str) -> CoreResult<Vec<String>> {
    let (caller, employees) = caller_and_roster(store, email).await?;
    Ok(access::distinct_roles(&caller, &employees))
}

/// Full roster, archived included. Empty for callers without the right.
pub async fn list_all(store: &dyn Store, email: &str) -> CoreResult<Vec<Employee>> {
    let (caller, employees) = caller_and_roster(store, email).await?;
    if !access::can_list_all_employees(&caller) {
        return Ok(Vec::new());
    }
    Ok(employees)
}

async fn require_admin(store: &dyn Store, email: &str) -> CoreResult<(Employee, Vec<Employee>)> {
    let (caller, employees) = caller_and_roster(store, email).await?;
    if !access::can_manage_employees(&caller) {
        tracing::warn!("Admin action denied for {}", caller.id);
        return Err(CoreError::Forbidden);
    }
    Ok((caller, employees))
}

pub async fn add_employee(
    store: &dyn Store,
    email: &str,
    input: NewEmployee,
    clock: Clock,
) -> CoreResult<Employee> {
    let (caller, employees) = require_admin(store, email).await?;
    let input = validation::new_employee(input)?;

    let id = Uuid::new_v4();
    if let Some(manager_id) = input.manager_id {
        hierarchy::check_manager_assignment(&employees, id, manager_id)?;
    }

    let employee = Employee {
        id,
        name: input.name,
        role: input.role,
        email: input.email,
        user_type: input.user_type,
        manager_id: input.manager_id,
        archived: false,
        is_admin: input.is_admin,
        created_at: clock.now,
    };
    store.insert_employee(&employee).await?;
    tracing::info!(
        "Employee {} added by {} as {}",
        employee.id,
        caller.id,
        employee.user_type.as_str()
    );
    Ok(employee)
}

pub async fn update_employee(
    store: &dyn Store,
    email: &str,
    id: Uuid,
    update: EmployeeUpdate,
) -> CoreResult<Employee> {
    let (caller, employees) = require_admin(store, email).await?;
    let update = validation::employee_update(update)?;
    let mut employee = employees
        .iter()
        .find(|emp| emp.id == id)
        .cloned()
        .ok_or(CoreError::NotFound("employee"))?;

    if let Some(Some(manager_id)) = update.manager_id {
        hierarchy::check_manager_assignment(&employees, id, manager_id)?;
    }

    if let Some(name) = update.name {
        employee.name = name;
    }
    if let Some(email) = update.email {
        employee.email = email;
    }
    if let Some(role) = update.role {
        employee.role = role;
    }
    if let Some(user_type) = update.user_type {
        employee.user_type = user_type;
    }
    if let Some(manager_id) = update.manager_id {
        employee.manager_id = manager_id;
    }
    if let Some(is_admin) = update.is_admin {
        employee.is_admin = is_admin;
    }

    if !store.update_employee(&employee).await? {
        return Err(CoreError::NotFound("employee"));
    }
    tracing::info!("Employee {} updated by {}", id, caller.id);
    Ok(employee)
}

/// Idempotent: re-archiving or re-activating leaves the flag as is.
pub async fn set_archived(
    store: &dyn Store,
    email: &str,
    id: Uuid,
    archived: bool,
) -> CoreResult<Employee> {
    let (caller, employees) = require_admin(store, email).await?;
    let mut employee = employees
        .into_iter()
        .find(|emp| emp.id == id)
        .ok_or(CoreError::NotFound("employee"))?;

    if employee.archived != archived {
        employee.archived = archived;
        if !store.update_employee(&employee).await? {
            return Err(CoreError::NotFound("employee"));
        }
        tracing::info!("Employee {} archived={} by {}", id, archived, caller.id);
    }
    Ok(employee)
}

pub async fn delete_employee(store: &dyn Store, email: &str, id: Uuid) -> CoreResult<()> {
    let (caller, _) = require_admin(store, email).await?;
    if !store.delete_employee(id).await? {
        return Err(CoreError::NotFound("employee"));
    }
    tracing::info!("Employee {} deleted by {}", id, caller.id);
    Ok(())
}

/// Re-derives user types from the reporting tree. Returns how many changed.
pub async fn fix_user_types(store: &dyn Store, email: &str) -> CoreResult<usize> {
    let (_, employees) = require_admin(store, email).await?;
    let corrections = hierarchy::user_type_corrections(&employees);

    let mut updated = 0;
    for (id, user_type) in &corrections {
        if let Some(employee) = employees.iter().find(|emp| emp.id == *id) {
            let mut employee = employee.clone();
            tracing::info!(
                "Updating {} from {} to {}",
                employee.id,
                employee.user_type.as_str(),
                user_type.as_str()
            );
            employee.user_type = *user_type;
            if store.update_employee(&employee).await? {
                updated += 1;
            } else {
                tracing::warn!("Employee {} vanished before its type was fixed", employee.id);
            }
        }
    }
    tracing::info!("Updated {} employees", updated);
    Ok(updated)
}

pub async fn reset_seed(store: &dyn Store, email: &str) -> CoreResult<usize> {
    let (caller, _) = require_admin(store, email).await?;
    tracing::warn!("Seed reset requested by {}", caller.id);
    Ok(seed::reset(store).await?)
}
