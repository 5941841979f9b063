//! Task domain model.
//!
//! # Responsibility
//! - Define the hierarchical task record and its lifecycle status.
//! - Provide self-contained validation for write-boundary invariants.
//!
//! # Invariants
//! - `uuid` is stable and never reused for another task.
//! - `status` is always one of the four enumerated values.
//! - A task with `status == Done` carries a non-null assignee.

use crate::model::employee::EmployeeId;
use crate::model::ValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a task.
pub type TaskId = Uuid;

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Created but not started.
    Todo,
    /// Work is in progress.
    InProgress,
    /// Completed successfully.
    Done,
    /// No longer actionable.
    Canceled,
}

/// Tracked task, optionally nested under a parent and assigned to an
/// employee.
///
/// Both references are detachable: deleting the parent or the assignee
/// nulls the reference instead of deleting the task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Stable global ID used for hierarchy links and auditing.
    pub uuid: TaskId,
    pub name: String,
    /// Direct parent in the task hierarchy, when nested.
    pub parent_uuid: Option<TaskId>,
    /// Employee responsible for the task, when assigned.
    pub assignee_uuid: Option<EmployeeId>,
    pub status: TaskStatus,
    pub deadline: NaiveDate,
}

impl Task {
    /// Creates a new unassigned root task with default status `Todo`.
    pub fn new(name: impl Into<String>, deadline: NaiveDate) -> Self {
        Self::with_id(Uuid::new_v4(), name, deadline)
    }

    /// Creates a task with a caller-provided stable ID.
    ///
    /// Used by import paths and tests where identity already exists.
    pub fn with_id(uuid: TaskId, name: impl Into<String>, deadline: NaiveDate) -> Self {
        Self {
            uuid,
            name: name.into(),
            parent_uuid: None,
            assignee_uuid: None,
            status: TaskStatus::Todo,
            deadline,
        }
    }

    /// Returns whether this task counts toward its assignee's workload.
    pub fn is_active(&self) -> bool {
        self.status == TaskStatus::InProgress
    }

    /// Checks self-contained record invariants.
    ///
    /// The record being written is authoritative for the done/assignee
    /// rule: its `assignee_uuid` already holds the incoming value when
    /// provided, else the current one.
    ///
    /// # Errors
    /// - `BlankName` when `name` is empty after trim.
    /// - `MissingAssigneeForDone` when `status == Done` without assignee.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::BlankName);
        }
        if self.status == TaskStatus::Done && self.assignee_uuid.is_none() {
            return Err(ValidationError::MissingAssigneeForDone);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Task, TaskStatus};
    use crate::model::ValidationError;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn sample_deadline() -> NaiveDate {
        NaiveDate::from_ymd_opt(2099, 1, 15).unwrap()
    }

    #[test]
    fn new_task_defaults_to_todo_and_unassigned() {
        let task = Task::new("write report", sample_deadline());
        assert_eq!(task.status, TaskStatus::Todo);
        assert!(task.parent_uuid.is_none());
        assert!(task.assignee_uuid.is_none());
        assert!(!task.is_active());
    }

    #[test]
    fn only_in_progress_counts_as_active() {
        let mut task = Task::new("spike", sample_deadline());
        for (status, active) in [
            (TaskStatus::Todo, false),
            (TaskStatus::InProgress, true),
            (TaskStatus::Canceled, false),
        ] {
            task.status = status;
            assert_eq!(task.is_active(), active);
        }
    }

    #[test]
    fn done_without_assignee_is_rejected() {
        let mut task = Task::new("ship it", sample_deadline());
        task.status = TaskStatus::Done;
        assert_eq!(
            task.validate(),
            Err(ValidationError::MissingAssigneeForDone)
        );

        task.assignee_uuid = Some(Uuid::new_v4());
        assert_eq!(task.validate(), Ok(()));
    }

    #[test]
    fn blank_name_is_rejected() {
        let task = Task::new("   ", sample_deadline());
        assert_eq!(task.validate(), Err(ValidationError::BlankName));
    }
}
