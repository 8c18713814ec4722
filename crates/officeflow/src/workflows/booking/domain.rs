use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::domain::{
    BookingId, DecisionRecord, EmployeeId, RequestStatus, RoomId, TimeWindow,
};

/// Caller input for a new room booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingSubmission {
    pub room_id: RoomId,
    pub employee_id: EmployeeId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub purpose: Option<String>,
    #[serde(default)]
    pub attendees: Option<u32>,
}

impl BookingSubmission {
    pub fn new(
        room_id: RoomId,
        employee_id: EmployeeId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        Self {
            room_id,
            employee_id,
            start,
            end,
            purpose: None,
            attendees: None,
        }
    }

    pub fn with_purpose(mut self, purpose: impl Into<String>) -> Self {
        self.purpose = Some(purpose.into());
        self
    }

    pub fn with_attendees(mut self, attendees: u32) -> Self {
        self.attendees = Some(attendees);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Booking {
    pub id: BookingId,
    pub room_id: RoomId,
    pub employee_id: EmployeeId,
    #[serde(flatten)]
    pub window: TimeWindow,
    pub status: RequestStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendees: Option<u32>,
    pub submitted_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision: Option<DecisionRecord>,
}

impl Booking {
    pub fn is_approved(&self) -> bool {
        self.status == RequestStatus::Approved
    }
}

/// Validated booking awaiting an id from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub room_id: RoomId,
    pub employee_id: EmployeeId,
    pub window: TimeWindow,
    pub purpose: Option<String>,
    pub attendees: Option<u32>,
    pub submitted_at: DateTime<Utc>,
}

impl NewBooking {
    pub fn into_record(self, id: BookingId) -> Booking {
        Booking {
            id,
            room_id: self.room_id,
            employee_id: self.employee_id,
            window: self.window,
            status: RequestStatus::Pending,
            purpose: self.purpose,
            attendees: self.attendees,
            submitted_at: self.submitted_at,
            decision: None,
        }
    }
}
