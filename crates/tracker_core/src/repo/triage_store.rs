//! Aggregate query primitives backing the triage views.
//!
//! # Responsibility
//! - Compute per-employee active-task counts in one aggregated statement.
//! - Detect blocking TODO tasks and their in-progress child assignees.
//! - Provide a single-snapshot wrapper for multi-query computations.
//!
//! # Invariants
//! - Workload counting never issues one query per employee.
//! - `employee_workloads` returns rows ordered by count ascending, uuid
//!   ascending, so the first row is the deterministic least-busy employee.
//! - All operations are read-only.

use crate::model::employee::EmployeeId;
use crate::model::task::{Task, TaskId, TaskStatus};
use crate::repo::task_repo::{parse_task_row, task_status_to_db, TASK_SELECT_SQL};
use crate::repo::{RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};
use uuid::Uuid;

/// One employee together with their active-task count.
///
/// "Active" means status `InProgress`; done, canceled and todo tasks
/// never contribute to the count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeWorkload {
    pub uuid: EmployeeId,
    pub full_name: String,
    pub position: String,
    pub active_task_count: u32,
}

/// Read-only store contract consumed by the triage service.
pub trait TriageStore {
    /// Returns all employees (or the given id subset) with their active-task
    /// counts, ordered by count ascending then uuid ascending.
    ///
    /// Employees without tasks are included with count 0.
    fn employee_workloads(
        &self,
        filter: Option<&[EmployeeId]>,
    ) -> RepoResult<Vec<EmployeeWorkload>>;

    /// Returns every task (any status) assigned to one of `ids`, ordered by
    /// task uuid ascending. One statement for the whole id set.
    fn tasks_by_assignees(&self, ids: &[EmployeeId]) -> RepoResult<Vec<Task>>;

    /// Returns the distinct TODO tasks with at least one in-progress direct
    /// child, ordered by task uuid ascending.
    ///
    /// Grandchildren do not qualify; a task with several in-progress
    /// children appears once.
    fn blocking_todo_tasks(&self) -> RepoResult<Vec<Task>>;

    /// Returns the distinct assignee ids of the in-progress direct children
    /// of `parent`. Unassigned children are skipped.
    fn child_assignee_ids(&self, parent: TaskId) -> RepoResult<Vec<EmployeeId>>;

    /// Runs `f` over one consistent read snapshot of the store.
    ///
    /// The default implementation is a plain passthrough for stores that
    /// are immutable per call (e.g. in-memory fakes).
    fn read_snapshot<T, E, F>(&self, f: F) -> Result<T, E>
    where
        E: From<RepoError>,
        F: FnOnce(&Self) -> Result<T, E>,
        Self: Sized,
    {
        f(self)
    }
}

/// SQLite-backed triage store.
pub struct SqliteTriageStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTriageStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TriageStore for SqliteTriageStore<'_> {
    fn employee_workloads(
        &self,
        filter: Option<&[EmployeeId]>,
    ) -> RepoResult<Vec<EmployeeWorkload>> {
        let mut sql = String::from(
            "SELECT
                e.uuid,
                e.full_name,
                e.position,
                COUNT(t.uuid) FILTER (WHERE t.status = ?1) AS active_task_count
             FROM employees e
             LEFT JOIN tasks t ON t.assignee_uuid = e.uuid",
        );
        let mut bind_values: Vec<Value> = vec![Value::Text(
            task_status_to_db(TaskStatus::InProgress).to_string(),
        )];

        if let Some(ids) = filter {
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            sql.push_str(&format!(
                " WHERE e.uuid IN ({})",
                placeholders(bind_values.len(), ids.len())
            ));
            bind_values.extend(ids.iter().map(|id| Value::Text(id.to_string())));
        }

        sql.push_str(
            " GROUP BY e.uuid
              ORDER BY active_task_count ASC, e.uuid ASC;",
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut workloads = Vec::new();

        while let Some(row) = rows.next()? {
            let uuid_text: String = row.get("uuid")?;
            let uuid = Uuid::parse_str(&uuid_text).map_err(|_| {
                RepoError::InvalidData(format!(
                    "invalid uuid value `{uuid_text}` in employees.uuid"
                ))
            })?;

            workloads.push(EmployeeWorkload {
                uuid,
                full_name: row.get("full_name")?,
                position: row.get("position")?,
                active_task_count: row.get("active_task_count")?,
            });
        }

        Ok(workloads)
    }

    fn tasks_by_assignees(&self, ids: &[EmployeeId]) -> RepoResult<Vec<Task>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "{TASK_SELECT_SQL}
             WHERE assignee_uuid IN ({})
             ORDER BY uuid ASC;",
            placeholders(0, ids.len())
        );
        let bind_values: Vec<Value> = ids.iter().map(|id| Value::Text(id.to_string())).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut tasks = Vec::new();

        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        Ok(tasks)
    }

    fn blocking_todo_tasks(&self) -> RepoResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT
                p.uuid,
                p.name,
                p.parent_uuid,
                p.assignee_uuid,
                p.status,
                p.deadline
             FROM tasks p
             JOIN tasks c ON c.parent_uuid = p.uuid
             WHERE p.status = ?1 AND c.status = ?2
             ORDER BY p.uuid ASC;",
        )?;

        let mut rows = stmt.query(params![
            task_status_to_db(TaskStatus::Todo),
            task_status_to_db(TaskStatus::InProgress),
        ])?;
        let mut tasks = Vec::new();

        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        Ok(tasks)
    }

    fn child_assignee_ids(&self, parent: TaskId) -> RepoResult<Vec<EmployeeId>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT assignee_uuid
             FROM tasks
             WHERE parent_uuid = ?1
               AND status = ?2
               AND assignee_uuid IS NOT NULL
             ORDER BY assignee_uuid ASC;",
        )?;

        let mut rows = stmt.query(params![
            parent.to_string(),
            task_status_to_db(TaskStatus::InProgress),
        ])?;
        let mut ids = Vec::new();

        while let Some(row) = rows.next()? {
            let uuid_text: String = row.get(0)?;
            let uuid = Uuid::parse_str(&uuid_text).map_err(|_| {
                RepoError::InvalidData(format!(
                    "invalid uuid value `{uuid_text}` in tasks.assignee_uuid"
                ))
            })?;
            ids.push(uuid);
        }

        Ok(ids)
    }

    fn read_snapshot<T, E, F>(&self, f: F) -> Result<T, E>
    where
        E: From<RepoError>,
        F: FnOnce(&Self) -> Result<T, E>,
    {
        // One deferred transaction makes all queries of a computation see
        // the same database state even when another connection writes
        // concurrently. Nothing is written, so commit vs rollback is moot.
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(|err| E::from(RepoError::from(err)))?;
        let value = f(self)?;
        tx.finish().map_err(|err| E::from(RepoError::from(err)))?;
        Ok(value)
    }
}

fn placeholders(offset: usize, count: usize) -> String {
    (1..=count)
        .map(|index| format!("?{}", offset + index))
        .collect::<Vec<_>>()
        .join(", ")
}
