pub mod domain;
mod service;
mod sources;

pub use domain::{
    AttendanceSummary, EmployeeStats, ProjectAssignment, ProjectStatus, YearMonth,
    YearMonthParseError,
};
pub use service::StatsAggregator;
pub use sources::{
    AttendanceLog, MemoryAttendanceLog, MemoryProjectDirectory, NoAttendanceLog,
    ProjectDirectory, SourceError,
};
