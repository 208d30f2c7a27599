use super::{Store, StoreError, StoreResult};
use crate::domain::models::{ActionItem, Employee, Meeting};
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

const EMPLOYEE_COLUMNS: &str =
    "id, name, role, email, user_type, manager_id, archived, is_admin, created_at";
const MEETING_COLUMNS: &str =
    "id, employee_id, person_id, date, topics, status, workload, created_at";
const ACTION_ITEM_COLUMNS: &str =
    "id, one_on_one_id, text, due_date, done, responsible_id, created_by, created_at, progress";

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn map_employee_write(err: sqlx::Error, email: &str) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::DuplicateEmail(email.to_string())
        }
        _ => StoreError::Database(err),
    }
}

fn map_action_item_write(err: sqlx::Error, meeting_id: Uuid) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            StoreError::MissingMeeting(meeting_id)
        }
        _ => StoreError::Database(err),
    }
}

async fn insert_employee_tx(
    tx: &mut Transaction<'_, Postgres>,
    employee: &Employee,
) -> StoreResult<()> {
    sqlx::query(
        r#"
        INSERT INTO employees (id, name, role, email, user_type, manager_id, archived, is_admin, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(employee.id)
    .bind(&employee.name)
    .bind(&employee.role)
    .bind(&employee.email)
    .bind(employee.user_type)
    .bind(employee.manager_id)
    .bind(employee.archived)
    .bind(employee.is_admin)
    .bind(employee.created_at)
    .execute(&mut **tx)
    .await
    .map_err(|e| map_employee_write(e, &employee.email))?;
    Ok(())
}

async fn insert_action_item_tx(
    tx: &mut Transaction<'_, Postgres>,
    item: &ActionItem,
) -> StoreResult<()> {
    sqlx::query(
        r#"
        INSERT INTO action_items (id, one_on_one_id, text, due_date, done, responsible_id, created_by, created_at, progress)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(item.id)
    .bind(item.one_on_one_id)
    .bind(&item.text)
    .bind(item.due_date)
    .bind(item.done)
    .bind(item.responsible_id)
    .bind(item.created_by)
    .bind(item.created_at)
    .bind(item.progress)
    .execute(&mut **tx)
    .await
    .map_err(|e| map_action_item_write(e, item.one_on_one_id))?;
    Ok(())
}

#[async_trait]
impl Store for PgStore {
    async fn list_employees(&self) -> StoreResult<Vec<Employee>> {
        let rows = sqlx::query_as::<_, Employee>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees ORDER BY seq"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_employee(&self, id: Uuid) -> StoreResult<Option<Employee>> {
        let row = sqlx::query_as::<_, Employee>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert_employee(&self, employee: &Employee) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        insert_employee_tx(&mut tx, employee).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn update_employee(&self, employee: &Employee) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE employees
            SET name = $2, role = $3, email = $4, user_type = $5,
                manager_id = $6, archived = $7, is_admin = $8
            WHERE id = $1
            "#,
        )
        .bind(employee.id)
        .bind(&employee.name)
        .bind(&employee.role)
        .bind(&employee.email)
        .bind(employee.user_type)
        .bind(employee.manager_id)
        .bind(employee.archived)
        .bind(employee.is_admin)
        .execute(&self.pool)
        .await
        .map_err(|e| map_employee_write(e, &employee.email))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_employee(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_meetings(&self) -> StoreResult<Vec<Meeting>> {
        let rows = sqlx::query_as::<_, Meeting>(&format!(
            "SELECT {MEETING_COLUMNS} FROM one_on_ones ORDER BY seq"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_meetings_for_employee(&self, employee_id: Uuid) -> StoreResult<Vec<Meeting>> {
        let rows = sqlx::query_as::<_, Meeting>(&format!(
            "SELECT {MEETING_COLUMNS} FROM one_on_ones WHERE employee_id = $1 ORDER BY seq"
        ))
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_meeting(&self, id: Uuid) -> StoreResult<Option<Meeting>> {
        let row = sqlx::query_as::<_, Meeting>(&format!(
            "SELECT {MEETING_COLUMNS} FROM one_on_ones WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert_meeting(&self, meeting: &Meeting, items: &[ActionItem]) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            r#"
            INSERT INTO one_on_ones (id, employee_id, person_id, date, topics, status, workload, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(meeting.id)
        .bind(meeting.employee_id)
        .bind(meeting.person_id)
        .bind(meeting.date)
        .bind(&meeting.topics)
        .bind(meeting.status)
        .bind(meeting.workload)
        .bind(meeting.created_at)
        .execute(&mut *tx)
        .await?;

        for item in items {
            insert_action_item_tx(&mut tx, item).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn update_meeting(&self, meeting: &Meeting) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE one_on_ones
            SET person_id = $2, date = $3, topics = $4, status = $5, workload = $6
            WHERE id = $1
            "#,
        )
        .bind(meeting.id)
        .bind(meeting.person_id)
        .bind(meeting.date)
        .bind(&meeting.topics)
        .bind(meeting.status)
        .bind(meeting.workload)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_meeting_cascade(&self, id: Uuid) -> StoreResult<bool> {
        let mut tx = self.pool.begin().await?;
        let items = sqlx::query("DELETE FROM action_items WHERE one_on_one_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let meeting = sqlx::query("DELETE FROM one_on_ones WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        tracing::debug!(
            "Deleted meeting {} with {} action items",
            id,
            items.rows_affected()
        );
        Ok(meeting.rows_affected() > 0)
    }

    async fn list_action_items(&self) -> StoreResult<Vec<ActionItem>> {
        let rows = sqlx::query_as::<_, ActionItem>(&format!(
            "SELECT {ACTION_ITEM_COLUMNS} FROM action_items ORDER BY seq"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_action_items_for_meeting(&self, meeting_id: Uuid) -> StoreResult<Vec<ActionItem>> {
        let rows = sqlx::query_as::<_, ActionItem>(&format!(
            "SELECT {ACTION_ITEM_COLUMNS} FROM action_items WHERE one_on_one_id = $1 ORDER BY seq"
        ))
        .bind(meeting_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_action_item(&self, id: Uuid) -> StoreResult<Option<ActionItem>> {
        let row = sqlx::query_as::<_, ActionItem>(&format!(
            "SELECT {ACTION_ITEM_COLUMNS} FROM action_items WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert_action_item(&self, item: &ActionItem) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        insert_action_item_tx(&mut tx, item).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn update_action_item(&self, item: &ActionItem) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE action_items
            SET text = $2, due_date = $3, done = $4, responsible_id = $5, progress = $6
            WHERE id = $1
            "#,
        )
        .bind(item.id)
        .bind(&item.text)
        .bind(item.due_date)
        .bind(item.done)
        .bind(item.responsible_id)
        .bind(item.progress)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_action_item(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM action_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn replace_all(&self, employees: &[Employee]) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM action_items").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM one_on_ones").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM employees").execute(&mut *tx).await?;
        for employee in employees {
            insert_employee_tx(&mut tx, employee).await?;
        }
        tx.commit().await?;
        Ok(())
    }
}
