use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::domain::{
    DateRange, DecisionRecord, EmployeeId, LeaveRequestId, RequestStatus,
};

/// Descriptive leave category. Every kind draws on the same balance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveKind {
    #[default]
    Annual,
    Sick,
    Personal,
    Unpaid,
    Other,
}

/// Caller input for a new leave request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveSubmission {
    pub employee_id: EmployeeId,
    #[serde(default)]
    pub kind: LeaveKind,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub reason: String,
}

impl LeaveSubmission {
    pub fn new(
        employee_id: EmployeeId,
        start_date: NaiveDate,
        end_date: NaiveDate,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            employee_id,
            kind: LeaveKind::default(),
            start_date,
            end_date,
            reason: reason.into(),
        }
    }

    pub fn with_kind(mut self, kind: LeaveKind) -> Self {
        self.kind = kind;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaveRequest {
    pub id: LeaveRequestId,
    pub employee_id: EmployeeId,
    pub kind: LeaveKind,
    #[serde(flatten)]
    pub period: DateRange,
    pub status: RequestStatus,
    pub reason: String,
    pub submitted_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision: Option<DecisionRecord>,
}

impl LeaveRequest {
    /// Days deducted from the balance when this request is approved.
    pub fn days(&self) -> u32 {
        self.period.days()
    }

    pub fn is_approved(&self) -> bool {
        self.status == RequestStatus::Approved
    }
}

/// Validated leave request awaiting an id from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLeaveRequest {
    pub employee_id: EmployeeId,
    pub kind: LeaveKind,
    pub period: DateRange,
    pub reason: String,
    pub submitted_at: DateTime<Utc>,
}

impl NewLeaveRequest {
    pub fn into_record(self, id: LeaveRequestId) -> LeaveRequest {
        LeaveRequest {
            id,
            employee_id: self.employee_id,
            kind: self.kind,
            period: self.period,
            status: RequestStatus::Pending,
            reason: self.reason,
            submitted_at: self.submitted_at,
            decision: None,
        }
    }
}
