use std::fs;
use std::sync::Arc;

use chrono::NaiveDate;
use officeflow::workflows::{
    DirectoryImportError, DirectoryImporter, EmployeeId, LeaveSubmission, LeaveWorkflow,
    MemoryAttendanceLog, MemoryProjectDirectory, MemoryStore, StatsAggregator,
};
use tempfile::TempDir;

fn write_seed(dir: &TempDir, with_projects: bool) {
    fs::write(
        dir.path().join("employees.csv"),
        "id,name,department,email,leave_balance\n\
         EMP001,Ada Lovelace,Engineering,ada@example.com,12\n\
         EMP002,Grace Hopper,Operations,,\n",
    )
    .expect("write employees");
    fs::write(
        dir.path().join("rooms.csv"),
        "id,name,capacity,location\nR1,Harbour,6,Level 2\n",
    )
    .expect("write rooms");
    if with_projects {
        fs::write(
            dir.path().join("projects.csv"),
            "employee_id,project_id,name,status,role,end_date\n\
             EMP001,P1,Atlas,active,Lead,2026-01-31\n\
             EMP001,P2,Beacon,on hold,,\n",
        )
        .expect("write projects");
    }
}

#[test]
fn seeded_directory_feeds_workflows_and_stats() {
    let dir = TempDir::new().expect("temp dir");
    write_seed(&dir, true);

    let store = Arc::new(MemoryStore::new());
    let projects = Arc::new(MemoryProjectDirectory::new());
    let summary = DirectoryImporter::new(18)
        .from_dir(dir.path())
        .expect("parse seed")
        .load_into(store.as_ref(), &projects)
        .expect("load seed");
    assert_eq!((summary.employees, summary.rooms, summary.assignments), (2, 1, 2));

    let leave = LeaveWorkflow::new(store.clone());
    let request = leave
        .submit(LeaveSubmission::new(
            EmployeeId::new("EMP002"),
            NaiveDate::from_ymd_opt(2025, 11, 3).expect("valid date"),
            NaiveDate::from_ymd_opt(2025, 11, 4).expect("valid date"),
            "conference",
        ))
        .expect("submit");
    leave
        .decide(
            request.id,
            officeflow::workflows::DecisionRequest::approve(EmployeeId::new("EMP001")),
        )
        .expect("approve");

    let stats = StatsAggregator::with_sources(
        store,
        projects,
        Arc::new(MemoryAttendanceLog::new()),
    );
    let grace = stats.stats_for(&EmployeeId::new("EMP002")).expect("stats");
    assert_eq!(grace.leave_balance, 16, "blank balance defaults to 18");
    assert_eq!(grace.leave_days_taken, 2);

    let ada = stats.stats_for(&EmployeeId::new("EMP001")).expect("stats");
    assert_eq!(ada.leave_balance, 12);
    assert_eq!(ada.active_projects, 1);
}

#[test]
fn projects_file_is_optional() {
    let dir = TempDir::new().expect("temp dir");
    write_seed(&dir, false);

    let seed = DirectoryImporter::default()
        .from_dir(dir.path())
        .expect("parse seed");
    assert_eq!(seed.employees.len(), 2);
    assert_eq!(seed.employees[1].leave_balance, 20);
    assert!(seed.assignments.is_empty());
}

#[test]
fn missing_rooms_file_is_an_io_error() {
    let dir = TempDir::new().expect("temp dir");
    write_seed(&dir, false);
    fs::remove_file(dir.path().join("rooms.csv")).expect("remove rooms");

    match DirectoryImporter::default().from_dir(dir.path()) {
        Err(DirectoryImportError::Io { path, .. }) => assert!(path.ends_with("rooms.csv")),
        other => panic!("expected io error, got {other:?}"),
    }
}
