use super::common::*;
use crate::workflows::domain::{BookingId, EntityKind, RequestStatus};
use crate::workflows::error::{ValidationError, WorkflowError};

#[test]
fn back_to_back_bookings_do_not_conflict() {
    let fx = fixture();
    let a = fx
        .booking
        .submit(booking("R1", "E001", (9, 0), (10, 0)))
        .expect("submit a");
    fx.booking.decide(a.id, admin()).expect("approve a");

    let b = fx
        .booking
        .submit(booking("R1", "E002", (10, 0), (11, 0)))
        .expect("submit b at the boundary");
    let b = fx.booking.decide(b.id, admin()).expect("approve b");
    assert_eq!(b.status, RequestStatus::Approved);

    match fx.booking.submit(booking("R1", "E003", (9, 30), (10, 30))) {
        Err(WorkflowError::Validation(ValidationError::OverlapsApprovedBooking(id))) => {
            assert_eq!(id, a.id);
        }
        other => panic!("expected overlap rejection, got {other:?}"),
    }
}

#[test]
fn other_rooms_are_independent() {
    let fx = fixture();
    let a = fx
        .booking
        .submit(booking("R1", "E001", (9, 0), (10, 0)))
        .expect("submit");
    fx.booking.decide(a.id, admin()).expect("approve");

    fx.booking
        .submit(booking("R2", "E002", (9, 0), (10, 0)))
        .expect("same window in another room");
}

#[test]
fn submit_validates_window_and_references() {
    let fx = fixture();
    assert!(matches!(
        fx.booking.submit(booking("R1", "E001", (10, 0), (10, 0))),
        Err(WorkflowError::Validation(ValidationError::InvalidTimeWindow { .. }))
    ));
    assert!(matches!(
        fx.booking.submit(booking("R9", "E001", (9, 0), (10, 0))),
        Err(WorkflowError::Validation(ValidationError::UnknownRoom(_)))
    ));
    assert!(matches!(
        fx.booking.submit(booking("R1", "E404", (9, 0), (10, 0))),
        Err(WorkflowError::Validation(ValidationError::UnknownEmployee(_)))
    ));
    assert!(fx.booking.list_all(None).expect("list").is_empty());
}

#[test]
fn attendees_must_fit_the_room() {
    let fx = fixture();
    match fx
        .booking
        .submit(booking("R1", "E001", (9, 0), (10, 0)).with_attendees(7))
    {
        Err(WorkflowError::Validation(ValidationError::ExceedsCapacity {
            attendees,
            capacity,
        })) => assert_eq!((attendees, capacity), (7, 6)),
        other => panic!("expected capacity rejection, got {other:?}"),
    }

    let fits = fx
        .booking
        .submit(
            booking("R1", "E001", (9, 0), (10, 0))
                .with_attendees(6)
                .with_purpose("Sprint review"),
        )
        .expect("full room is fine");
    assert_eq!(fits.attendees, Some(6));
    assert_eq!(fits.purpose.as_deref(), Some("Sprint review"));
}

#[test]
fn archived_room_refuses_bookings_and_leaves_listing() {
    let fx = fixture();
    fx.directory.archive_room(&room("R2")).expect("archive");

    assert!(matches!(
        fx.booking.submit(booking("R2", "E001", (9, 0), (10, 0))),
        Err(WorkflowError::Validation(ValidationError::ArchivedRoom(_)))
    ));
    let rooms: Vec<_> = fx
        .booking
        .rooms()
        .expect("rooms")
        .into_iter()
        .map(|room| room.id)
        .collect();
    assert_eq!(rooms, vec![room("R1")]);
}

#[test]
fn competing_pending_bookings_resolve_at_decision_time() {
    let fx = fixture();
    let first = fx
        .booking
        .submit(booking("R1", "E001", (9, 0), (10, 0)))
        .expect("first");
    let second = fx
        .booking
        .submit(booking("R1", "E002", (9, 30), (10, 30)))
        .expect("second may be pending alongside");

    fx.booking.decide(second.id, admin()).expect("approve second");
    match fx.booking.decide(first.id, admin()) {
        Err(WorkflowError::Conflict {
            kind: EntityKind::Booking,
            conflicting_id,
            ..
        }) => assert_eq!(conflicting_id, second.id.to_string()),
        other => panic!("expected conflict, got {other:?}"),
    }
    assert_eq!(
        fx.booking.get(first.id).expect("get").status,
        RequestStatus::Pending
    );

    let rejected = fx.booking.decide(first.id, admin_rejects()).expect("reject");
    assert_eq!(rejected.status, RequestStatus::Rejected);
}

#[test]
fn rejected_bookings_do_not_block_the_room() {
    let fx = fixture();
    let first = fx
        .booking
        .submit(booking("R1", "E001", (9, 0), (10, 0)))
        .expect("first");
    fx.booking.decide(first.id, admin_rejects()).expect("reject");

    fx.booking
        .submit(booking("R1", "E002", (9, 0), (10, 0)))
        .expect("window is free again");
}

#[test]
fn second_decision_is_invalid_state() {
    let fx = fixture();
    let request = fx
        .booking
        .submit(booking("R1", "E001", (9, 0), (10, 0)))
        .expect("submit");
    fx.booking.decide(request.id, admin_rejects()).expect("reject");

    assert!(matches!(
        fx.booking.decide(request.id, admin()),
        Err(WorkflowError::InvalidState {
            status: RequestStatus::Rejected,
            ..
        })
    ));
    assert!(matches!(
        fx.booking.decide(BookingId(42), admin()),
        Err(WorkflowError::NotFound {
            kind: EntityKind::Booking,
            ..
        })
    ));
}

#[test]
fn employee_listing_is_ordered_by_submission() {
    let fx = fixture();
    let a = fx
        .booking
        .submit(booking("R2", "E001", (14, 0), (15, 0)))
        .expect("a");
    fx.booking
        .submit(booking("R2", "E002", (9, 0), (10, 0)))
        .expect("other employee");
    let c = fx
        .booking
        .submit(booking("R1", "E001", (9, 0), (10, 0)))
        .expect("c");

    let mine: Vec<_> = fx
        .booking
        .list_for_employee(&emp("E001"))
        .expect("list")
        .into_iter()
        .map(|booking| booking.id)
        .collect();
    assert_eq!(mine, vec![a.id, c.id]);
    assert!(matches!(
        fx.booking.list_for_employee(&emp("E404")),
        Err(WorkflowError::NotFound { .. })
    ));
}
