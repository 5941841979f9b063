//! Task repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over `tasks` storage.
//! - Enforce the write-boundary rules that need persisted state:
//!   past-deadline rejection (with the unchanged-deadline exemption),
//!   child-vs-parent deadline ordering, and reference existence.
//!
//! # Invariants
//! - Write paths call `Task::validate()` before SQL mutations.
//! - A task never persists a deadline later than its parent's.
//! - Deleting a parent detaches its children (parent set to NULL),
//!   it never cascades.

use crate::model::employee::EmployeeId;
use crate::model::task::{Task, TaskId, TaskStatus};
use crate::model::ValidationError;
use crate::repo::{RepoError, RepoResult};
use chrono::{Local, NaiveDate};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use uuid::Uuid;

pub(crate) const TASK_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    parent_uuid,
    assignee_uuid,
    status,
    deadline
FROM tasks";

/// Query options for listing tasks.
#[derive(Debug, Clone, Default)]
pub struct TaskListQuery {
    pub status: Option<TaskStatus>,
    pub assignee: Option<EmployeeId>,
    pub parent: Option<TaskId>,
}

/// Repository interface for task CRUD operations.
pub trait TaskRepository {
    fn create_task(&self, task: &Task) -> RepoResult<TaskId>;
    fn update_task(&self, task: &Task) -> RepoResult<()>;
    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>>;
    fn list_tasks(&self, query: &TaskListQuery) -> RepoResult<Vec<Task>>;
    fn delete_task(&self, id: TaskId) -> RepoResult<()>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Rejects deadlines that moved into the past.
    ///
    /// `persisted_deadline` is the row's current value on update paths;
    /// an edit that leaves the deadline untouched stays valid even when
    /// that value has already expired.
    fn check_deadline(
        &self,
        deadline: NaiveDate,
        persisted_deadline: Option<NaiveDate>,
    ) -> RepoResult<()> {
        if persisted_deadline == Some(deadline) {
            return Ok(());
        }
        if deadline < today() {
            return Err(ValidationError::DeadlineInPast { deadline }.into());
        }
        Ok(())
    }

    fn check_parent(&self, task: &Task) -> RepoResult<()> {
        let Some(parent_uuid) = task.parent_uuid else {
            return Ok(());
        };

        let parent = self
            .load_task(parent_uuid)?
            .ok_or(RepoError::ParentNotFound(parent_uuid))?;
        if task.deadline > parent.deadline {
            return Err(ValidationError::ChildDeadlineAfterParent {
                deadline: task.deadline,
                parent_deadline: parent.deadline,
            }
            .into());
        }
        Ok(())
    }

    fn check_assignee(&self, task: &Task) -> RepoResult<()> {
        let Some(assignee_uuid) = task.assignee_uuid else {
            return Ok(());
        };

        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM employees WHERE uuid = ?1);",
            [assignee_uuid.to_string()],
            |row| row.get(0),
        )?;
        if exists == 0 {
            return Err(RepoError::AssigneeNotFound(assignee_uuid));
        }
        Ok(())
    }

    fn load_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }

        Ok(None)
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, task: &Task) -> RepoResult<TaskId> {
        task.validate()?;
        self.check_deadline(task.deadline, None)?;
        self.check_parent(task)?;
        self.check_assignee(task)?;

        self.conn.execute(
            "INSERT INTO tasks (uuid, name, parent_uuid, assignee_uuid, status, deadline)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                task.uuid.to_string(),
                task.name.as_str(),
                task.parent_uuid.map(|id| id.to_string()),
                task.assignee_uuid.map(|id| id.to_string()),
                task_status_to_db(task.status),
                task.deadline.to_string(),
            ],
        )?;

        Ok(task.uuid)
    }

    fn update_task(&self, task: &Task) -> RepoResult<()> {
        task.validate()?;

        let current = self
            .load_task(task.uuid)?
            .ok_or(RepoError::NotFound(task.uuid))?;
        self.check_deadline(task.deadline, Some(current.deadline))?;
        self.check_parent(task)?;
        self.check_assignee(task)?;

        self.conn.execute(
            "UPDATE tasks
             SET
                name = ?1,
                parent_uuid = ?2,
                assignee_uuid = ?3,
                status = ?4,
                deadline = ?5,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?6;",
            params![
                task.name.as_str(),
                task.parent_uuid.map(|id| id.to_string()),
                task.assignee_uuid.map(|id| id.to_string()),
                task_status_to_db(task.status),
                task.deadline.to_string(),
                task.uuid.to_string(),
            ],
        )?;

        Ok(())
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        self.load_task(id)
    }

    fn list_tasks(&self, query: &TaskListQuery) -> RepoResult<Vec<Task>> {
        let mut sql = format!("{TASK_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(status) = query.status {
            sql.push_str(" AND status = ?");
            bind_values.push(Value::Text(task_status_to_db(status).to_string()));
        }

        if let Some(assignee) = query.assignee {
            sql.push_str(" AND assignee_uuid = ?");
            bind_values.push(Value::Text(assignee.to_string()));
        }

        if let Some(parent) = query.parent {
            sql.push_str(" AND parent_uuid = ?");
            bind_values.push(Value::Text(parent.to_string()));
        }

        sql.push_str(" ORDER BY uuid ASC;");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut tasks = Vec::new();

        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        Ok(tasks)
    }

    fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub(crate) fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in tasks.uuid"))
    })?;

    let parent_uuid = parse_optional_uuid(row, "parent_uuid")?;
    let assignee_uuid = parse_optional_uuid(row, "assignee_uuid")?;

    let status_text: String = row.get("status")?;
    let status = parse_task_status(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid task status `{status_text}` in tasks.status"))
    })?;

    let deadline_text: String = row.get("deadline")?;
    let deadline = NaiveDate::parse_from_str(&deadline_text, "%Y-%m-%d").map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid deadline value `{deadline_text}` in tasks.deadline"
        ))
    })?;

    Ok(Task {
        uuid,
        name: row.get("name")?,
        parent_uuid,
        assignee_uuid,
        status,
        deadline,
    })
}

fn parse_optional_uuid(row: &Row<'_>, column: &'static str) -> RepoResult<Option<Uuid>> {
    match row.get::<_, Option<String>>(column)? {
        Some(text) => {
            let uuid = Uuid::parse_str(&text).map_err(|_| {
                RepoError::InvalidData(format!("invalid uuid value `{text}` in tasks.{column}"))
            })?;
            Ok(Some(uuid))
        }
        None => Ok(None),
    }
}

pub(crate) fn task_status_to_db(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Todo => "todo",
        TaskStatus::InProgress => "in_progress",
        TaskStatus::Done => "done",
        TaskStatus::Canceled => "canceled",
    }
}

fn parse_task_status(value: &str) -> Option<TaskStatus> {
    match value {
        "todo" => Some(TaskStatus::Todo),
        "in_progress" => Some(TaskStatus::InProgress),
        "done" => Some(TaskStatus::Done),
        "canceled" => Some(TaskStatus::Canceled),
        _ => None,
    }
}
