use chrono::{DateTime, NaiveDate, Utc};

use super::domain::{BookingId, EmployeeId, EntityKind, LeaveRequestId, RequestStatus, RoomId};
use super::stats::SourceError;
use super::store::StoreError;

/// Input rejected at submission time. Nothing is written when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("unknown employee {0}")]
    UnknownEmployee(EmployeeId),
    #[error("employee {0} is archived")]
    ArchivedEmployee(EmployeeId),
    #[error("unknown meeting room {0}")]
    UnknownRoom(RoomId),
    #[error("meeting room {0} is no longer bookable")]
    ArchivedRoom(RoomId),
    #[error("end date {end} is before start date {start}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
    #[error("booking must end after it starts ({start} .. {end})")]
    InvalidTimeWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    #[error("{attendees} attendees exceed room capacity of {capacity}")]
    ExceedsCapacity { attendees: u32, capacity: u32 },
    #[error("room capacity must be at least 1")]
    ZeroCapacity,
    #[error("{0} must not be blank")]
    BlankField(&'static str),
    #[error("dates overlap approved leave request {0}")]
    OverlapsApprovedLeave(LeaveRequestId),
    #[error("time window overlaps approved booking {0}")]
    OverlapsApprovedBooking(BookingId),
}

/// Error raised by the leave, booking, directory, and stats services.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: String },
    #[error("{kind} {id} is already {status}")]
    InvalidState {
        kind: EntityKind,
        id: String,
        status: RequestStatus,
    },
    #[error("{kind} {id} conflicts with approved {kind} {conflicting_id}")]
    Conflict {
        kind: EntityKind,
        id: String,
        conflicting_id: String,
    },
    #[error("employee {employee_id} has {available} leave days left, {requested} requested")]
    InsufficientBalance {
        employee_id: EmployeeId,
        requested: u32,
        available: u32,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Source(#[from] SourceError),
}

impl WorkflowError {
    pub(crate) fn not_found(kind: EntityKind, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub(crate) fn invalid_state(kind: EntityKind, id: impl ToString, status: RequestStatus) -> Self {
        Self::InvalidState {
            kind,
            id: id.to_string(),
            status,
        }
    }

    pub(crate) fn conflict(
        kind: EntityKind,
        id: impl ToString,
        conflicting_id: impl ToString,
    ) -> Self {
        Self::Conflict {
            kind,
            id: id.to_string(),
            conflicting_id: conflicting_id.to_string(),
        }
    }
}
