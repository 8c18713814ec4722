//! Leave requests: submission, approval with balance deduction, and listings.

pub mod domain;
mod service;

pub use domain::{LeaveKind, LeaveRequest, LeaveSubmission, NewLeaveRequest};
pub use service::LeaveWorkflow;
