use crate::workflows::booking::domain::Booking;
use crate::workflows::domain::{Employee, EmployeeId, MeetingRoom, RequestStatus, RoomId};
use crate::workflows::leave::domain::LeaveRequest;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeFilter {
    pub department: Option<String>,
    pub include_archived: bool,
}

impl EmployeeFilter {
    pub fn active() -> Self {
        Self::default()
    }

    pub fn everyone() -> Self {
        Self {
            department: None,
            include_archived: true,
        }
    }

    pub fn matches(&self, employee: &Employee) -> bool {
        (self.include_archived || employee.is_active())
            && self
                .department
                .as_deref()
                .map_or(true, |department| {
                    employee.department.eq_ignore_ascii_case(department)
                })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomFilter {
    pub include_archived: bool,
}

impl RoomFilter {
    pub fn active() -> Self {
        Self::default()
    }

    pub fn matches(&self, room: &MeetingRoom) -> bool {
        self.include_archived || room.is_active()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeaveFilter {
    pub employee_id: Option<EmployeeId>,
    pub status: Option<RequestStatus>,
}

impl LeaveFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_employee(employee_id: &EmployeeId) -> Self {
        Self {
            employee_id: Some(employee_id.clone()),
            status: None,
        }
    }

    pub fn with_status(mut self, status: RequestStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn matches(&self, request: &LeaveRequest) -> bool {
        self.employee_id
            .as_ref()
            .map_or(true, |id| &request.employee_id == id)
            && self.status.map_or(true, |status| request.status == status)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingFilter {
    pub room_id: Option<RoomId>,
    pub employee_id: Option<EmployeeId>,
    pub status: Option<RequestStatus>,
}

impl BookingFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_room(room_id: &RoomId) -> Self {
        Self {
            room_id: Some(room_id.clone()),
            ..Self::default()
        }
    }

    pub fn for_employee(employee_id: &EmployeeId) -> Self {
        Self {
            employee_id: Some(employee_id.clone()),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: RequestStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn matches(&self, booking: &Booking) -> bool {
        self.room_id
            .as_ref()
            .map_or(true, |id| &booking.room_id == id)
            && self
                .employee_id
                .as_ref()
                .map_or(true, |id| &booking.employee_id == id)
            && self.status.map_or(true, |status| booking.status == status)
    }
}
