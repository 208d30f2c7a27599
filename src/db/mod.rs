pub mod memory;
pub mod postgres;
pub mod seed;

use crate::domain::models::{ActionItem, Employee, Meeting};
use async_trait::async_trait;
use uuid::Uuid;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("email {0} is already registered")]
    DuplicateEmail(String),
    #[error("meeting {0} does not exist")]
    MissingMeeting(Uuid),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Document-style persistence for the three record kinds.
///
/// `list_*` methods return records in insertion order. Updates replace the
/// whole record and report whether it existed.
#[async_trait]
pub trait Store: Send + Sync {
    async fn list_employees(&self) -> StoreResult<Vec<Employee>>;
    async fn get_employee(&self, id: Uuid) -> StoreResult<Option<Employee>>;
    async fn insert_employee(&self, employee: &Employee) -> StoreResult<()>;
    async fn update_employee(&self, employee: &Employee) -> StoreResult<bool>;
    async fn delete_employee(&self, id: Uuid) -> StoreResult<bool>;

    async fn list_meetings(&self) -> StoreResult<Vec<Meeting>>;
    async fn list_meetings_for_employee(&self, employee_id: Uuid) -> StoreResult<Vec<Meeting>>;
    async fn get_meeting(&self, id: Uuid) -> StoreResult<Option<Meeting>>;
    /// Inserts the meeting and its initial action items as one unit.
    async fn insert_meeting(&self, meeting: &Meeting, items: &[ActionItem]) -> StoreResult<()>;
    async fn update_meeting(&self, meeting: &Meeting) -> StoreResult<bool>;
    /// Deletes the meeting's action items, then the meeting, atomically.
    async fn delete_meeting_cascade(&self, id: Uuid) -> StoreResult<bool>;

    async fn list_action_items(&self) -> StoreResult<Vec<ActionItem>>;
    async fn list_action_items_for_meeting(&self, meeting_id: Uuid) -> StoreResult<Vec<ActionItem>>;
    async fn get_action_item(&self, id: Uuid) -> StoreResult<Option<ActionItem>>;
    /// Fails with `MissingMeeting` when the parent meeting is gone.
    async fn insert_action_item(&self, item: &ActionItem) -> StoreResult<()>;
    async fn update_action_item(&self, item: &ActionItem) -> StoreResult<bool>;
    async fn delete_action_item(&self, id: Uuid) -> StoreResult<bool>;

    /// Wipes every table and inserts `employees`, atomically.
    async fn replace_all(&self, employees: &[Employee]) -> StoreResult<()>;
}
