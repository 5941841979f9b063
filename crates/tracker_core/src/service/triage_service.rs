//! Workload-aware task triage service.
//!
//! # Responsibility
//! - Rank employees by active workload with their full task lists.
//! - Detect important tasks and compute their suitable assignees.
//!
//! # Invariants
//! - Both views are read-only and computed over one store snapshot.
//! - The least-busy employee's name appears in every suitable set.
//! - Busy ranking is sorted by count descending with uuid-ascending
//!   tie-break; it always covers every employee in the system.

use crate::model::employee::EmployeeId;
use crate::model::task::Task;
use crate::repo::triage_store::TriageStore;
use crate::repo::RepoError;
use chrono::NaiveDate;
use log::info;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One ranked entry of the busy-employees view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BusyEmployee {
    pub uuid: EmployeeId,
    pub full_name: String,
    pub position: String,
    pub active_task_count: u32,
    /// Complete task list, all statuses, not just active ones.
    pub tasks: Vec<Task>,
}

/// One entry of the important-tasks view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportantTask {
    pub task_name: String,
    pub deadline: NaiveDate,
    /// Deduplicated by name, sorted name order.
    pub suitable_employees: Vec<String>,
}

/// Errors from triage view computations.
#[derive(Debug)]
pub enum TriageError {
    /// The system has no employees, so suitability cannot be computed.
    NoEmployeesAvailable,
    /// Store-level failure.
    Repo(RepoError),
}

impl Display for TriageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoEmployeesAvailable => {
                write!(f, "no employees available to take on tasks")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TriageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NoEmployeesAvailable => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for TriageError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// How much busier than the least-busy employee a child-task assignee may
/// be while still counting as suitable.
const SUITABLE_LOAD_MARGIN: u32 = 2;

/// Triage view facade over a [`TriageStore`].
pub struct TriageService<S: TriageStore> {
    store: S,
}

impl<S: TriageStore> TriageService<S> {
    /// Creates a service using the provided store implementation.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns all employees ordered by active-task count descending,
    /// each with their complete task list.
    ///
    /// # Contract
    /// - Output length equals the total employee count; zero-active
    ///   employees rank last, they are never dropped.
    /// - Ties are broken by employee uuid ascending.
    /// - Exactly two store queries: the workload aggregate plus one batch
    ///   task fetch for the whole employee set.
    pub fn rank_busy_employees(&self) -> Result<Vec<BusyEmployee>, TriageError> {
        let ranking = self.store.read_snapshot(|store| {
            let mut workloads = store.employee_workloads(None)?;
            let ids: Vec<EmployeeId> = workloads.iter().map(|load| load.uuid).collect();

            let mut tasks_by_assignee: HashMap<EmployeeId, Vec<Task>> = HashMap::new();
            for task in store.tasks_by_assignees(&ids)? {
                if let Some(assignee) = task.assignee_uuid {
                    tasks_by_assignee.entry(assignee).or_default().push(task);
                }
            }

            // Workloads arrive count-ascending, uuid-ascending; a stable
            // descending sort on the count keeps the uuid tie-break intact.
            workloads.sort_by(|a, b| b.active_task_count.cmp(&a.active_task_count));

            Ok::<_, TriageError>(
                workloads
                    .into_iter()
                    .map(|load| BusyEmployee {
                        tasks: tasks_by_assignee.remove(&load.uuid).unwrap_or_default(),
                        uuid: load.uuid,
                        full_name: load.full_name,
                        position: load.position,
                        active_task_count: load.active_task_count,
                    })
                    .collect::<Vec<_>>(),
            )
        })?;

        info!(
            "event=rank_busy_employees module=service status=ok employees={}",
            ranking.len()
        );
        Ok(ranking)
    }

    /// Returns the important tasks (TODO tasks blocking an in-progress
    /// child) with their suitable-employee name sets.
    ///
    /// # Contract
    /// - The least-busy employee (minimum active count, lowest uuid on
    ///   ties) is suitable for every important task.
    /// - An assignee of an in-progress child qualifies when their full
    ///   active count is at most `min_count + 2`.
    /// - Suitable names are deduplicated and sorted; an empty
    ///   important-task set is an empty `Ok` list.
    ///
    /// # Errors
    /// - `NoEmployeesAvailable` when the system has zero employees.
    pub fn find_important_tasks(&self) -> Result<Vec<ImportantTask>, TriageError> {
        let important = self.store.read_snapshot(|store| {
            let workloads = store.employee_workloads(None)?;
            let least_busy = workloads
                .first()
                .ok_or(TriageError::NoEmployeesAvailable)?;
            let min_count = least_busy.active_task_count;

            let mut important = Vec::new();
            for task in store.blocking_todo_tasks()? {
                let mut suitable: BTreeSet<String> = BTreeSet::new();
                suitable.insert(least_busy.full_name.clone());

                let child_assignees = store.child_assignee_ids(task.uuid)?;
                if !child_assignees.is_empty() {
                    // Their full workload, not just the children of this
                    // task, decides whether they can take on more.
                    for load in store.employee_workloads(Some(&child_assignees))? {
                        if load.active_task_count <= min_count + SUITABLE_LOAD_MARGIN {
                            suitable.insert(load.full_name);
                        }
                    }
                }

                important.push(ImportantTask {
                    task_name: task.name,
                    deadline: task.deadline,
                    suitable_employees: suitable.into_iter().collect(),
                });
            }

            Ok::<_, TriageError>(important)
        })?;

        info!(
            "event=find_important_tasks module=service status=ok tasks={}",
            important.len()
        );
        Ok(important)
    }
}
