//! Core domain logic for the employee/task tracker.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::employee::{Employee, EmployeeId};
pub use model::task::{Task, TaskId, TaskStatus};
pub use model::ValidationError;
pub use repo::employee_repo::{EmployeeRepository, SqliteEmployeeRepository};
pub use repo::task_repo::{SqliteTaskRepository, TaskListQuery, TaskRepository};
pub use repo::triage_store::{EmployeeWorkload, SqliteTriageStore, TriageStore};
pub use repo::{RepoError, RepoResult};
pub use service::triage_service::{BusyEmployee, ImportantTask, TriageError, TriageService};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
