use super::{Store, StoreError, StoreResult};
use crate::domain::models::{ActionItem, Employee, Meeting};
use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    employees: Vec<Employee>,
    meetings: Vec<Meeting>,
    action_items: Vec<ActionItem>,
}

/// In-process store used for local runs without `DATABASE_URL` and in tests.
/// Every operation holds the single lock for its whole duration.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn replace<T: Clone>(rows: &mut [T], record: &T, same: impl Fn(&T) -> bool) -> bool {
    match rows.iter_mut().find(|row| same(row)) {
        Some(row) => {
            *row = record.clone();
            true
        }
        None => false,
    }
}

fn remove<T>(rows: &mut Vec<T>, matches: impl Fn(&T) -> bool) -> bool {
    let before = rows.len();
    rows.retain(|row| !matches(row));
    rows.len() != before
}

fn email_taken(employees: &[Employee], email: &str, except: Uuid) -> bool {
    employees.iter().any(|emp| emp.email == email && emp.id != except)
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_employees(&self) -> StoreResult<Vec<Employee>> {
        Ok(self.tables.read().await.employees.clone())
    }

    async fn get_employee(&self, id: Uuid) -> StoreResult<Option<Employee>> {
        let tables = self.tables.read().await;
        Ok(tables.employees.iter().find(|emp| emp.id == id).cloned())
    }

    async fn insert_employee(&self, employee: &Employee) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if email_taken(&tables.employees, &employee.email, employee.id) {
            return Err(StoreError::DuplicateEmail(employee.email.clone()));
        }
        tables.employees.push(employee.clone());
        Ok(())
    }

    async fn update_employee(&self, employee: &Employee) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        if email_taken(&tables.employees, &employee.email, employee.id) {
            return Err(StoreError::DuplicateEmail(employee.email.clone()));
        }
        Ok(replace(&mut tables.employees, employee, |row| row.id == employee.id))
    }

    async fn delete_employee(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        Ok(remove(&mut tables.employees, |row| row.id == id))
    }

    async fn list_meetings(&self) -> StoreResult<Vec<Meeting>> {
        Ok(self.tables.read().await.meetings.clone())
    }

    async fn list_meetings_for_employee(&self, employee_id: Uuid) -> StoreResult<Vec<Meeting>> {
        let tables = self.tables.read().await;
        Ok(tables
            .meetings
            .iter()
            .filter(|m| m.employee_id == employee_id)
            .cloned()
            .collect())
    }

    async fn get_meeting(&self, id: Uuid) -> StoreResult<Option<Meeting>> {
        let tables = self.tables.read().await;
        Ok(tables.meetings.iter().find(|m| m.id == id).cloned())
    }

    async fn insert_meeting(&self, meeting: &Meeting, items: &[ActionItem]) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        tables.meetings.push(meeting.clone());
        tables.action_items.extend_from_slice(items);
        Ok(())
    }

    async fn update_meeting(&self, meeting: &Meeting) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        Ok(replace(&mut tables.meetings, meeting, |row| row.id == meeting.id))
    }

    async fn delete_meeting_cascade(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        remove(&mut tables.action_items, |item| item.one_on_one_id == id);
        Ok(remove(&mut tables.meetings, |row| row.id == id))
    }

    async fn list_action_items(&self) -> StoreResult<Vec<ActionItem>> {
        Ok(self.tables.read().await.action_items.clone())
    }

    async fn list_action_items_for_meeting(&self, meeting_id: Uuid) -> StoreResult<Vec<ActionItem>> {
        let tables = self.tables.read().await;
        Ok(tables
            .action_items
            .iter()
            .filter(|item| item.one_on_one_id == meeting_id)
            .cloned()
            .collect())
    }

    async fn get_action_item(&self, id: Uuid) -> StoreResult<Option<ActionItem>> {
        let tables = self.tables.read().await;
        Ok(tables.action_items.iter().find(|item| item.id == id).cloned())
    }

    async fn insert_action_item(&self, item: &ActionItem) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.meetings.iter().any(|m| m.id == item.one_on_one_id) {
            return Err(StoreError::MissingMeeting(item.one_on_one_id));
        }
        tables.action_items.push(item.clone());
        Ok(())
    }

    async fn update_action_item(&self, item: &ActionItem) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        Ok(replace(&mut tables.action_items, item, |row| row.id == item.id))
    }

    async fn delete_action_item(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        Ok(remove(&mut tables.action_items, |row| row.id == id))
    }

    async fn replace_all(&self, employees: &[Employee]) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        *tables = Tables {
            employees: employees.to_vec(),
            ..Tables::default()
        };
        Ok(())
    }
}
