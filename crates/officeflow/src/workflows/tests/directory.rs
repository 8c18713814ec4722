use super::common::*;
use crate::workflows::domain::{Employee, EmployeeUpdate, EntityKind, MeetingRoom};
use crate::workflows::error::{ValidationError, WorkflowError};
use crate::workflows::store::StoreError;

#[test]
fn registered_employee_can_submit_leave() {
    let fx = fixture();
    let mut hire = Employee::new("E010", "Katherine Johnson", "Research", 15);
    hire.email = Some("kj@example.com".to_string());
    hire.archived_at = Some(at(1, 0, 0));

    let stored = fx.directory.register_employee(hire).expect("register");
    assert!(stored.is_active(), "registration clears archival");
    assert_eq!(fx.directory.employee(&emp("E010")).expect("get"), stored);

    fx.leave
        .submit(leave("E010", 3, 4))
        .expect("new hire can request leave");
}

#[test]
fn duplicate_registration_is_a_store_error() {
    let fx = fixture();
    let err = fx
        .directory
        .register_employee(Employee::new("E001", "Ada Again", "Engineering", 1))
        .expect_err("duplicate");

    assert!(matches!(
        err,
        WorkflowError::Store(StoreError::DuplicateId {
            kind: EntityKind::Employee,
            ..
        })
    ));
    assert_eq!(balance_of(&fx.store, "E001"), 10);
}

#[test]
fn archiving_is_idempotent_and_hides_the_employee() {
    let fx = fixture();
    let first = fx
        .directory
        .archive_employee(&emp("E002"))
        .expect("archive");
    let again = fx
        .directory
        .archive_employee(&emp("E002"))
        .expect("archive again");

    assert_eq!(first.archived_at, again.archived_at);
    let active: Vec<_> = fx
        .directory
        .employees()
        .expect("list")
        .into_iter()
        .map(|employee| employee.id)
        .collect();
    assert_eq!(active, vec![emp("E001"), emp("E003")]);
    assert!(matches!(
        fx.directory.archive_employee(&emp("E404")),
        Err(WorkflowError::NotFound { .. })
    ));
}

#[test]
fn archived_employee_history_stays_readable() {
    let fx = fixture();
    let request = fx.leave.submit(leave("E002", 3, 4)).expect("submit");
    fx.directory.archive_employee(&emp("E002")).expect("archive");

    assert_eq!(fx.leave.get(request.id).expect("get").id, request.id);
    assert_eq!(
        fx.leave.list_for_employee(&emp("E002")).expect("list").len(),
        1
    );
}

#[test]
fn rooms_require_positive_capacity() {
    let fx = fixture();
    assert!(matches!(
        fx.directory.register_room(MeetingRoom::new("R3", "Closet", 0)),
        Err(WorkflowError::Validation(ValidationError::ZeroCapacity))
    ));

    let mut lab = MeetingRoom::new("R3", "Lab", 4);
    lab.location = Some("Level 3".to_string());
    fx.directory.register_room(lab).expect("register");

    fx.booking
        .submit(booking("R3", "E001", (9, 0), (10, 0)))
        .expect("new room is bookable");
}

#[test]
fn archived_rooms_stay_in_the_full_listing() {
    let fx = fixture();
    let archived = fx.directory.archive_room(&room("R1")).expect("archive");
    assert!(!archived.is_active());

    let all = fx.directory.all_rooms().expect("rooms");
    assert_eq!(all.len(), 2);
    assert_eq!(fx.booking.rooms().expect("rooms").len(), 1);
}

#[test]
fn profile_update_keeps_balance_and_archival() {
    let fx = fixture();
    fx.leave
        .decide(fx.leave.submit(leave("E001", 3, 4)).expect("submit").id, admin())
        .expect("approve");
    fx.directory.archive_employee(&emp("E001")).expect("archive");

    let updated = fx
        .directory
        .update_employee(
            &emp("E001"),
            EmployeeUpdate {
                name: Some("  Ada King ".to_string()),
                department: None,
                email: Some("ada.king@example.com".to_string()),
            },
        )
        .expect("update");

    assert_eq!(updated.name, "Ada King");
    assert_eq!(updated.department, "Engineering");
    assert_eq!(updated.email.as_deref(), Some("ada.king@example.com"));
    assert_eq!(updated.leave_balance, 8);
    assert!(!updated.is_active(), "archival survives a profile edit");
    assert_eq!(fx.directory.employee(&emp("E001")).expect("get"), updated);
}

#[test]
fn profile_update_rejects_blank_name_and_unknown_employee() {
    let fx = fixture();
    let blank = EmployeeUpdate {
        name: Some("   ".to_string()),
        ..EmployeeUpdate::default()
    };
    assert!(matches!(
        fx.directory.update_employee(&emp("E002"), blank),
        Err(WorkflowError::Validation(ValidationError::BlankField("name")))
    ));
    assert!(matches!(
        fx.directory
            .update_employee(&emp("E404"), EmployeeUpdate::default()),
        Err(WorkflowError::NotFound { .. })
    ));
    assert!(matches!(
        fx.directory
            .register_employee(Employee::new(" ", "Nobody", "Ops", 1)),
        Err(WorkflowError::Validation(ValidationError::BlankField("employee id")))
    ));
}
