use std::sync::{Arc, Barrier};
use std::thread;

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use officeflow::workflows::{
    DecisionRequest, Employee, EmployeeId, LeaveSubmission, LeaveWorkflow, MeetingRoom,
    MemoryStore, RequestStatus, SteppingClock, ValidationError, WorkflowError,
};

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 11, day).expect("valid date")
}

fn setup() -> (Arc<MemoryStore>, LeaveWorkflow<MemoryStore>) {
    let store = Arc::new(
        MemoryStore::with_directory(
            vec![Employee::new("E001", "Ada Lovelace", "Engineering", 10)],
            Vec::<MeetingRoom>::new(),
        )
        .expect("seed store"),
    );
    let start = Utc
        .with_ymd_and_hms(2025, 10, 31, 9, 0, 0)
        .single()
        .expect("valid timestamp");
    let clock = Arc::new(SteppingClock::new(start, Duration::seconds(30)));
    let workflow = LeaveWorkflow::with_clock(store.clone(), clock);
    (store, workflow)
}

fn approver() -> DecisionRequest {
    DecisionRequest::approve(EmployeeId::new("MGR01"))
}

fn e001(start: u32, end: u32) -> LeaveSubmission {
    LeaveSubmission::new(EmployeeId::new("E001"), date(start), date(end), "family visit")
}

fn balance(store: &MemoryStore) -> u32 {
    use officeflow::workflows::EntityStore;

    store
        .read(|view| view.employee(&EmployeeId::new("E001")))
        .expect("read")
        .expect("employee present")
        .leave_balance
}

#[test]
fn approval_deducts_three_days_and_blocks_later_overlaps() {
    let (store, workflow) = setup();

    let request = workflow.submit(e001(3, 5)).expect("submit");
    assert_eq!(request.status, RequestStatus::Pending);

    let approved = workflow.decide(request.id, approver()).expect("approve");
    assert_eq!(approved.status, RequestStatus::Approved);
    assert_eq!(balance(&store), 7);

    let err = workflow
        .submit(e001(4, 6))
        .expect_err("overlapping submission rejected");
    assert!(matches!(
        err,
        WorkflowError::Validation(ValidationError::OverlapsApprovedLeave(id)) if id == request.id
    ));
}

#[test]
fn overlap_submitted_before_approval_conflicts_at_decision() {
    let (store, workflow) = setup();

    let first = workflow.submit(e001(3, 5)).expect("first");
    let second = workflow.submit(e001(4, 6)).expect("second");
    workflow.decide(first.id, approver()).expect("approve first");

    let err = workflow
        .decide(second.id, approver())
        .expect_err("second approval conflicts");
    assert!(matches!(err, WorkflowError::Conflict { .. }));
    assert_eq!(
        workflow.get(second.id).expect("get").status,
        RequestStatus::Pending
    );
    assert_eq!(balance(&store), 7);
}

#[test]
fn balance_never_goes_negative() {
    let (store, workflow) = setup();

    let mut approved_days = 0;
    for (start, end) in [(1, 4), (6, 9), (11, 14), (16, 16), (18, 19)] {
        let request = workflow.submit(e001(start, end)).expect("submit");
        match workflow.decide(request.id, approver()) {
            Ok(decided) => approved_days += decided.days(),
            Err(WorkflowError::InsufficientBalance { available, requested, .. }) => {
                assert!(requested > available);
            }
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    assert_eq!(approved_days, 9);
    assert_eq!(balance(&store), 10 - approved_days);
}

#[test]
fn concurrent_decisions_deduct_once() {
    let (store, workflow) = setup();
    let workflow = Arc::new(workflow);
    let request = workflow.submit(e001(3, 5)).expect("submit");

    let contenders = 4;
    let barrier = Arc::new(Barrier::new(contenders));
    let handles: Vec<_> = (0..contenders)
        .map(|_| {
            let workflow = Arc::clone(&workflow);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                workflow.decide(request.id, approver())
            })
        })
        .collect();

    let outcomes: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().expect("thread completes"))
        .collect();

    let winners = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
    let invalid = outcomes
        .iter()
        .filter(|outcome| matches!(outcome, Err(WorkflowError::InvalidState { .. })))
        .count();
    assert_eq!(winners, 1);
    assert_eq!(invalid, contenders - 1);
    assert_eq!(balance(&store), 7);
}

#[test]
fn approved_leave_never_overlaps() {
    let (_store, workflow) = setup();

    let ranges = [(1, 2), (2, 3), (3, 3), (5, 6), (6, 8), (9, 9)];
    let mut pending = Vec::new();
    for (start, end) in ranges {
        if let Ok(request) = workflow.submit(e001(start, end)) {
            pending.push(request.id);
        }
    }
    for id in pending {
        let _ = workflow.decide(id, approver());
    }

    let approved: Vec<_> = workflow
        .list_all(Some(RequestStatus::Approved))
        .expect("list")
        .into_iter()
        .map(|request| request.period)
        .collect();
    assert!(!approved.is_empty());
    for (index, left) in approved.iter().enumerate() {
        for right in &approved[index + 1..] {
            assert!(!left.overlaps(right), "{left:?} overlaps {right:?}");
        }
    }
}
