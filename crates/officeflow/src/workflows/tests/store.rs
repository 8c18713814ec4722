use super::common::*;
use crate::workflows::domain::{DateRange, Employee, EntityKind, LeaveRequestId};
use crate::workflows::leave::{LeaveKind, NewLeaveRequest};
use crate::workflows::store::{
    EmployeeFilter, EntityStore, LeaveFilter, MemoryStore, StoreError,
};

fn draft(employee: &str, start: u32, end: u32) -> NewLeaveRequest {
    NewLeaveRequest {
        employee_id: emp(employee),
        kind: LeaveKind::Annual,
        period: DateRange::new(day(start), day(end)).expect("range"),
        reason: "trip".to_string(),
        submitted_at: at(1, 9, 0),
    }
}

#[test]
fn leave_ids_increase_monotonically() {
    let store = seeded_store();
    let ids = store
        .write(|tx| -> Result<Vec<LeaveRequestId>, StoreError> {
            let first = tx.insert_leave_request(draft("E001", 3, 4))?;
            let second = tx.insert_leave_request(draft("E002", 3, 4))?;
            Ok(vec![first.id, second.id])
        })
        .expect("inserts succeed");

    assert_eq!(ids, vec![LeaveRequestId(1), LeaveRequestId(2)]);
}

#[test]
fn duplicate_employee_id_is_rejected() {
    let store = seeded_store();
    let err = store
        .write(|tx| tx.insert_employee(Employee::new("E001", "Imposter", "Sales", 5)))
        .expect_err("duplicate rejected");

    assert_eq!(
        err,
        StoreError::DuplicateId {
            kind: EntityKind::Employee,
            id: "E001".to_string(),
        }
    );
    assert_eq!(balance_of(&store, "E001"), 10);
}

#[test]
fn failed_unit_of_work_rolls_back_every_change() {
    let store = seeded_store();
    let result = store.write(|tx| -> Result<(), StoreError> {
        let mut employee = tx.employee(&emp("E001")).expect("present");
        employee.leave_balance = 0;
        tx.update_employee(employee)?;
        tx.insert_leave_request(draft("E001", 3, 5))?;
        tx.insert_employee(Employee::new("E002", "Duplicate", "Ops", 1))?;
        Ok(())
    });

    assert!(matches!(result, Err(StoreError::DuplicateId { .. })));
    assert_eq!(balance_of(&store, "E001"), 10);
    let requests = store
        .read(|view| view.leave_requests(&LeaveFilter::all()))
        .expect("read");
    assert!(requests.is_empty(), "insert should have been undone");
}

#[test]
fn ids_are_not_reused_after_rollback() {
    let store = seeded_store();
    let _ = store.write(|tx| -> Result<(), StoreError> {
        tx.insert_leave_request(draft("E001", 3, 5))?;
        Err(StoreError::Unavailable("abort".to_string()))
    });

    let next = store
        .write(|tx| tx.insert_leave_request(draft("E001", 3, 5)))
        .expect("insert succeeds");
    assert_eq!(next.id, LeaveRequestId(2));
}

#[test]
fn update_of_missing_record_reports_not_found() {
    let store = MemoryStore::new();
    let err = store
        .write(|tx| tx.update_employee(Employee::new("E404", "Ghost", "None", 0)))
        .expect_err("missing employee");

    assert!(matches!(
        err,
        StoreError::NotFound {
            kind: EntityKind::Employee,
            ..
        }
    ));
}

#[test]
fn employee_filter_hides_archived_records_by_default() {
    let store = seeded_store();
    store
        .write(|tx| -> Result<(), StoreError> {
            let mut employee = tx.employee(&emp("E002")).expect("present");
            employee.archived_at = Some(at(1, 12, 0));
            tx.update_employee(employee)
        })
        .expect("archive");

    let (active, everyone, engineering) = store
        .read(|view| {
            (
                view.employees(&EmployeeFilter::active()).len(),
                view.employees(&EmployeeFilter::everyone()).len(),
                view.employees(&EmployeeFilter {
                    department: Some("engineering".to_string()),
                    include_archived: false,
                })
                .len(),
            )
        })
        .expect("read");

    assert_eq!((active, everyone, engineering), (2, 3, 2));
}
