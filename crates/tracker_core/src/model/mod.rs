//! Domain model for employees and hierarchical tasks.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Provide self-contained validation for write-boundary invariants.
//!
//! # Invariants
//! - Every domain object is identified by a stable uuid.
//! - Validation rules that need persisted state (past-deadline exemption,
//!   parent deadline comparison) live in the repository layer, not here.

use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod employee;
pub mod task;

/// Write-boundary validation failures for employee and task records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Employee full name is blank after trim.
    BlankFullName,
    /// Employee position is blank after trim.
    BlankPosition,
    /// Task name is blank after trim.
    BlankName,
    /// A new deadline value lies in the past.
    DeadlineInPast { deadline: NaiveDate },
    /// Child deadline is later than the parent task's deadline.
    ChildDeadlineAfterParent {
        deadline: NaiveDate,
        parent_deadline: NaiveDate,
    },
    /// A task cannot be marked done without an assignee.
    MissingAssigneeForDone,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankFullName => write!(f, "employee full name must not be blank"),
            Self::BlankPosition => write!(f, "employee position must not be blank"),
            Self::BlankName => write!(f, "task name must not be blank"),
            Self::DeadlineInPast { deadline } => {
                write!(f, "deadline {deadline} must not be in the past")
            }
            Self::ChildDeadlineAfterParent {
                deadline,
                parent_deadline,
            } => write!(
                f,
                "child deadline {deadline} must not be later than parent deadline {parent_deadline}"
            ),
            Self::MissingAssigneeForDone => {
                write!(f, "a task without an assignee cannot be marked done")
            }
        }
    }
}

impl Error for ValidationError {}
