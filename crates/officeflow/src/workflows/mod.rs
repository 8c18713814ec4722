pub mod approvals;
pub mod booking;
pub mod clock;
pub mod directory;
pub mod domain;
pub mod error;
pub mod leave;
pub mod stats;
pub mod store;

#[cfg(test)]
mod tests;

pub use approvals::{ApprovalQueue, ApprovalQueueItem, ApprovalSubject};
pub use booking::{Booking, BookingSubmission, BookingWorkflow};
pub use clock::{Clock, SteppingClock, SystemClock};
pub use directory::{DirectoryImportError, DirectoryImporter, DirectorySeed, DirectoryService};
pub use domain::{
    BookingId, DateRange, Decision, DecisionRecord, DecisionRequest, Employee, EmployeeId,
    EmployeeUpdate, EntityKind, LeaveRequestId, MeetingRoom, RequestStatus, RoomId, TimeWindow,
};
pub use error::{ValidationError, WorkflowError};
pub use leave::{LeaveKind, LeaveRequest, LeaveSubmission, LeaveWorkflow};
pub use stats::{
    AttendanceLog, AttendanceSummary, EmployeeStats, MemoryAttendanceLog,
    MemoryProjectDirectory, NoAttendanceLog, ProjectAssignment, ProjectDirectory,
    ProjectStatus, StatsAggregator, YearMonth,
};
pub use store::{EntityStore, MemoryStore, StoreError};
