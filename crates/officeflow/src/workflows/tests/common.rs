use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

use crate::workflows::approvals::ApprovalQueue;
use crate::workflows::booking::{BookingSubmission, BookingWorkflow};
use crate::workflows::clock::{Clock, SteppingClock};
use crate::workflows::directory::DirectoryService;
use crate::workflows::domain::{DecisionRequest, Employee, EmployeeId, MeetingRoom, RoomId};
use crate::workflows::leave::{LeaveSubmission, LeaveWorkflow};
use crate::workflows::stats::{
    MemoryAttendanceLog, MemoryProjectDirectory, StatsAggregator,
};
use crate::workflows::store::{EntityStore, MemoryStore, StoreError, StoreTx, StoreView};

pub(super) fn day(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 11, day).expect("valid date")
}

/// Timestamp on 2025-11-`day` at `hour:minute` UTC.
pub(super) fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 11, day, hour, minute, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn emp(id: &str) -> EmployeeId {
    EmployeeId::new(id)
}

pub(super) fn room(id: &str) -> RoomId {
    RoomId::new(id)
}

pub(super) fn admin() -> DecisionRequest {
    DecisionRequest::approve(emp("ADMIN"))
}

pub(super) fn admin_rejects() -> DecisionRequest {
    DecisionRequest::reject(emp("ADMIN"))
}

pub(super) fn directory() -> (Vec<Employee>, Vec<MeetingRoom>) {
    let employees = vec![
        Employee::new("E001", "Ada Lovelace", "Engineering", 10),
        Employee::new("E002", "Grace Hopper", "Operations", 20),
        Employee::new("E003", "Alan Turing", "Engineering", 2),
    ];
    let rooms = vec![
        MeetingRoom::new("R1", "Harbour", 6),
        MeetingRoom::new("R2", "Summit", 12),
    ];
    (employees, rooms)
}

pub(super) fn seeded_store() -> Arc<MemoryStore> {
    let (employees, rooms) = directory();
    Arc::new(MemoryStore::with_directory(employees, rooms).expect("seed store"))
}

/// One-minute steps from 2025-11-01 08:00 so every submission gets a distinct timestamp.
pub(super) fn stepping_clock() -> Arc<dyn Clock> {
    Arc::new(SteppingClock::new(at(1, 8, 0), Duration::minutes(1)))
}

pub(super) struct Fixture {
    pub(super) store: Arc<MemoryStore>,
    pub(super) leave: LeaveWorkflow<MemoryStore>,
    pub(super) booking: BookingWorkflow<MemoryStore>,
    pub(super) directory: DirectoryService<MemoryStore>,
    pub(super) approvals: ApprovalQueue<MemoryStore>,
    pub(super) stats: StatsAggregator<MemoryStore>,
    pub(super) projects: Arc<MemoryProjectDirectory>,
    pub(super) attendance: Arc<MemoryAttendanceLog>,
}

pub(super) fn fixture() -> Fixture {
    let store = seeded_store();
    let clock = stepping_clock();
    let projects = Arc::new(MemoryProjectDirectory::new());
    let attendance = Arc::new(MemoryAttendanceLog::new());

    Fixture {
        leave: LeaveWorkflow::with_clock(store.clone(), clock.clone()),
        booking: BookingWorkflow::with_clock(store.clone(), clock.clone()),
        directory: DirectoryService::with_clock(store.clone(), clock),
        approvals: ApprovalQueue::new(store.clone()),
        stats: StatsAggregator::with_sources(store.clone(), projects.clone(), attendance.clone()),
        store,
        projects,
        attendance,
    }
}

pub(super) fn leave(employee: &str, start: u32, end: u32) -> LeaveSubmission {
    LeaveSubmission::new(emp(employee), day(start), day(end), "time off")
}

/// Booking of `room_id` on 2025-11-03 between the given `(hour, minute)` pairs.
pub(super) fn booking(
    room_id: &str,
    employee: &str,
    start: (u32, u32),
    end: (u32, u32),
) -> BookingSubmission {
    BookingSubmission::new(
        room(room_id),
        emp(employee),
        at(3, start.0, start.1),
        at(3, end.0, end.1),
    )
}

pub(super) fn balance_of(store: &MemoryStore, id: &str) -> u32 {
    store
        .read(|view| view.employee(&emp(id)).map(|employee| employee.leave_balance))
        .expect("read store")
        .expect("employee present")
}

/// Store whose backend is offline.
pub(super) struct UnavailableStore;

impl EntityStore for UnavailableStore {
    fn read<R>(&self, _op: impl FnOnce(&dyn StoreView) -> R) -> Result<R, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn write<R, E>(&self, _op: impl FnOnce(&mut dyn StoreTx) -> Result<R, E>) -> Result<R, E>
    where
        E: From<StoreError>,
    {
        Err(StoreError::Unavailable("database offline".to_string()).into())
    }
}
