//! Request orchestration: resolve the caller, filter with the access rules,
//! annotate with derived state, shape the response.

pub mod action_items;
pub mod directory;
pub mod meetings;
pub mod views;

use crate::db::Store;
use crate::domain::access;
use crate::domain::models::Employee;
use crate::error::{CoreError, CoreResult};
use crate::time_utils::{self, AppTimezone};
use chrono::{DateTime, NaiveDate, Utc};

/// Point in time a request is evaluated at.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    pub now: DateTime<Utc>,
    pub today: NaiveDate,
}

impl Clock {
    pub fn at(now: DateTime<Utc>, tz: AppTimezone) -> Self {
        Self {
            now,
            today: time_utils::local_date(tz, now),
        }
    }
}

/// Loads the roster once and resolves the caller in it.
pub(crate) async fn caller_and_roster(
    store: &dyn Store,
    email: &str,
) -> CoreResult<(Employee, Vec<Employee>)> {
    let employees = store.list_employees().await?;
    let caller = access::resolve_caller(&employees, email)
        .cloned()
        .ok_or(CoreError::Unauthenticated)?;
    Ok((caller, employees))
}

pub async fn resolve_caller(store: &dyn Store, email: &str) -> CoreResult<Employee> {
    caller_and_roster(store, email).await.map(|(caller, _)| caller)
}
