use tracker_core::db::open_db_in_memory;
use tracker_core::{
    Employee, EmployeeRepository, RepoError, SqliteEmployeeRepository, SqliteTaskRepository, Task,
    TaskRepository, ValidationError,
};
use uuid::Uuid;

mod util;
use util::days_from_now;

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::new(&conn);

    let employee = Employee::new("Ivanov", "Developer");
    let id = repo.create_employee(&employee).unwrap();

    let loaded = repo.get_employee(id).unwrap().unwrap();
    assert_eq!(loaded.uuid, employee.uuid);
    assert_eq!(loaded.full_name, "Ivanov");
    assert_eq!(loaded.position, "Developer");
}

#[test]
fn update_existing_employee() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::new(&conn);

    let mut employee = Employee::new("Ivanov", "Developer");
    repo.create_employee(&employee).unwrap();

    employee.full_name = "Ivanov I.".to_string();
    employee.position = "Senior Developer".to_string();
    repo.update_employee(&employee).unwrap();

    let loaded = repo.get_employee(employee.uuid).unwrap().unwrap();
    assert_eq!(loaded.full_name, "Ivanov I.");
    assert_eq!(loaded.position, "Senior Developer");
}

#[test]
fn update_not_found_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::new(&conn);

    let employee = Employee::new("Ghost", "Nobody");
    let err = repo.update_employee(&employee).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == employee.uuid));
}

#[test]
fn list_returns_all_employees_in_uuid_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::new(&conn);

    let first = Employee::with_id(
        Uuid::parse_str("00000000-0000-4000-8000-000000000001").unwrap(),
        "Petrov",
        "Tester",
    );
    let second = Employee::with_id(
        Uuid::parse_str("00000000-0000-4000-8000-000000000002").unwrap(),
        "Sidorov",
        "Analyst",
    );
    repo.create_employee(&second).unwrap();
    repo.create_employee(&first).unwrap();

    let listed = repo.list_employees().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].uuid, first.uuid);
    assert_eq!(listed[1].uuid, second.uuid);
}

#[test]
fn blank_fields_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::new(&conn);

    let blank_name = Employee::new("   ", "Developer");
    let err = repo.create_employee(&blank_name).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::BlankFullName)
    ));

    let blank_position = Employee::new("Ivanov", "");
    let err = repo.create_employee(&blank_position).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::BlankPosition)
    ));
}

#[test]
fn delete_not_found_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::new(&conn);

    let id = Uuid::new_v4();
    let err = repo.delete_employee(id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(found) if found == id));
}

#[test]
fn deleting_employee_detaches_their_tasks() {
    let conn = open_db_in_memory().unwrap();
    let employees = SqliteEmployeeRepository::new(&conn);
    let tasks = SqliteTaskRepository::new(&conn);

    let employee = Employee::new("Ivanov", "Developer");
    employees.create_employee(&employee).unwrap();

    let mut task = Task::new("assigned task", days_from_now(7));
    task.assignee_uuid = Some(employee.uuid);
    tasks.create_task(&task).unwrap();

    employees.delete_employee(employee.uuid).unwrap();

    let detached = tasks.get_task(task.uuid).unwrap().unwrap();
    assert!(detached.assignee_uuid.is_none());
}
