//! Admin approval queue: every pending leave request and booking in one ordered list.

use std::cmp::Ordering;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::workflows::domain::{BookingId, EmployeeId, LeaveRequestId, RequestStatus, RoomId};
use crate::workflows::error::WorkflowError;
use crate::workflows::store::{BookingFilter, EntityStore, LeaveFilter};

/// What a queue entry points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ApprovalSubject {
    Leave {
        request_id: LeaveRequestId,
        days: u32,
    },
    Booking {
        booking_id: BookingId,
        room_id: RoomId,
    },
}

impl ApprovalSubject {
    // Leave sorts ahead of bookings submitted at the same instant.
    fn rank(&self) -> (u8, u64) {
        match self {
            Self::Leave { request_id, .. } => (0, request_id.0),
            Self::Booking { booking_id, .. } => (1, booking_id.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApprovalQueueItem {
    #[serde(flatten)]
    pub subject: ApprovalSubject,
    pub employee_id: EmployeeId,
    pub employee_name: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

impl ApprovalQueueItem {
    fn queue_order(&self, other: &Self) -> Ordering {
        self.submitted_at
            .cmp(&other.submitted_at)
            .then_with(|| self.subject.rank().cmp(&other.subject.rank()))
    }
}

pub struct ApprovalQueue<S> {
    store: Arc<S>,
}

impl<S> ApprovalQueue<S>
where
    S: EntityStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Pending items of both kinds, oldest submission first. Ties go to leave requests,
    /// then to the lower id.
    pub fn pending_approvals(&self) -> Result<Vec<ApprovalQueueItem>, WorkflowError> {
        let mut queue = self.store.read(|view| {
            let name_of = |id: &EmployeeId| view.employee(id).map(|employee| employee.name);

            let leaves = view
                .leave_requests(&LeaveFilter::all().with_status(RequestStatus::Pending))
                .into_iter()
                .map(|request| ApprovalQueueItem {
                    subject: ApprovalSubject::Leave {
                        request_id: request.id,
                        days: request.days(),
                    },
                    employee_name: name_of(&request.employee_id),
                    employee_id: request.employee_id,
                    submitted_at: request.submitted_at,
                });

            let bookings = view
                .bookings(&BookingFilter::all().with_status(RequestStatus::Pending))
                .into_iter()
                .map(|booking| ApprovalQueueItem {
                    subject: ApprovalSubject::Booking {
                        booking_id: booking.id,
                        room_id: booking.room_id,
                    },
                    employee_name: name_of(&booking.employee_id),
                    employee_id: booking.employee_id,
                    submitted_at: booking.submitted_at,
                });

            leaves.chain(bookings).collect::<Vec<_>>()
        })?;

        queue.sort_by(ApprovalQueueItem::queue_order);
        Ok(queue)
    }
}
