//! Entity store seam.
//!
//! Workflows never touch storage directly; they hand closures to [`EntityStore::read`] for a
//! consistent snapshot or to [`EntityStore::write`] for a serialized unit of work. A write
//! closure that returns `Err` leaves no trace in the store, which is what lets the leave
//! workflow flip a request to approved and deduct the balance as one step.

mod filter;
mod memory;

pub use filter::{BookingFilter, EmployeeFilter, LeaveFilter, RoomFilter};
pub use memory::MemoryStore;

use super::booking::domain::{Booking, NewBooking};
use super::domain::{
    BookingId, Employee, EmployeeId, EntityKind, LeaveRequestId, MeetingRoom, RoomId,
};
use super::leave::domain::{LeaveRequest, NewLeaveRequest};

/// Read capabilities shared by snapshots and transactions.
pub trait StoreView {
    fn employee(&self, id: &EmployeeId) -> Option<Employee>;
    fn employees(&self, filter: &EmployeeFilter) -> Vec<Employee>;
    fn room(&self, id: &RoomId) -> Option<MeetingRoom>;
    fn rooms(&self, filter: &RoomFilter) -> Vec<MeetingRoom>;
    fn leave_request(&self, id: LeaveRequestId) -> Option<LeaveRequest>;
    fn leave_requests(&self, filter: &LeaveFilter) -> Vec<LeaveRequest>;
    fn booking(&self, id: BookingId) -> Option<Booking>;
    fn bookings(&self, filter: &BookingFilter) -> Vec<Booking>;
}

/// Write capabilities available inside [`EntityStore::write`].
///
/// Employees and rooms carry caller-supplied ids and are rejected on duplicates. Leave
/// requests and bookings get the next id from a per-kind sequence.
pub trait StoreTx: StoreView {
    fn insert_employee(&mut self, employee: Employee) -> Result<Employee, StoreError>;
    fn update_employee(&mut self, employee: Employee) -> Result<(), StoreError>;
    fn insert_room(&mut self, room: MeetingRoom) -> Result<MeetingRoom, StoreError>;
    fn update_room(&mut self, room: MeetingRoom) -> Result<(), StoreError>;
    fn insert_leave_request(
        &mut self,
        draft: NewLeaveRequest,
    ) -> Result<LeaveRequest, StoreError>;
    fn update_leave_request(&mut self, request: LeaveRequest) -> Result<(), StoreError>;
    fn insert_booking(&mut self, draft: NewBooking) -> Result<Booking, StoreError>;
    fn update_booking(&mut self, booking: Booking) -> Result<(), StoreError>;
}

/// Storage abstraction so the workflow services can be exercised in isolation.
pub trait EntityStore: Send + Sync {
    /// Run `op` against a consistent snapshot.
    fn read<R>(&self, op: impl FnOnce(&dyn StoreView) -> R) -> Result<R, StoreError>;

    /// Run `op` with exclusive write access. Changes are kept only if `op` returns `Ok`.
    fn write<R, E>(&self, op: impl FnOnce(&mut dyn StoreTx) -> Result<R, E>) -> Result<R, E>
    where
        E: From<StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("{kind} {id} already exists")]
    DuplicateId { kind: EntityKind, id: String },
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: String },
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub(crate) fn duplicate(kind: EntityKind, id: impl ToString) -> Self {
        Self::DuplicateId {
            kind,
            id: id.to_string(),
        }
    }

    pub(crate) fn missing(kind: EntityKind, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}
