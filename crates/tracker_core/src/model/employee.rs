//! Employee domain model.
//!
//! # Responsibility
//! - Define the employee record owned by the `assignee` relation.
//!
//! # Invariants
//! - `uuid` is stable and never reused for another employee.
//! - `full_name` and `position` are non-blank.

use crate::model::ValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for an employee.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type EmployeeId = Uuid;

/// Company employee who can be assigned zero or more tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Stable global ID used for assignment and auditing.
    pub uuid: EmployeeId,
    pub full_name: String,
    pub position: String,
}

impl Employee {
    /// Creates a new employee with a generated stable ID.
    pub fn new(full_name: impl Into<String>, position: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), full_name, position)
    }

    /// Creates an employee with a caller-provided stable ID.
    ///
    /// Used by import paths and tests where identity already exists.
    pub fn with_id(
        uuid: EmployeeId,
        full_name: impl Into<String>,
        position: impl Into<String>,
    ) -> Self {
        Self {
            uuid,
            full_name: full_name.into(),
            position: position.into(),
        }
    }

    /// Checks self-contained record invariants.
    ///
    /// # Errors
    /// - `BlankFullName` when `full_name` is empty after trim.
    /// - `BlankPosition` when `position` is empty after trim.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.full_name.trim().is_empty() {
            return Err(ValidationError::BlankFullName);
        }
        if self.position.trim().is_empty() {
            return Err(ValidationError::BlankPosition);
        }
        Ok(())
    }
}
