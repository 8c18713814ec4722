use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use super::domain::{AttendanceSummary, EmployeeStats, ProjectAssignment, YearMonth};
use super::sources::{AttendanceLog, MemoryProjectDirectory, NoAttendanceLog, ProjectDirectory};
use crate::workflows::domain::{EmployeeId, EntityKind, RequestStatus};
use crate::workflows::error::WorkflowError;
use crate::workflows::store::{BookingFilter, EntityStore, LeaveFilter};

/// Read-only per-employee summaries built from the store and the external sources.
pub struct StatsAggregator<S> {
    store: Arc<S>,
    projects: Arc<dyn ProjectDirectory>,
    attendance: Arc<dyn AttendanceLog>,
}

impl<S> StatsAggregator<S>
where
    S: EntityStore + 'static,
{
    /// Aggregator with no project assignments and no recorded absences.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_sources(
            store,
            Arc::new(MemoryProjectDirectory::new()),
            Arc::new(NoAttendanceLog),
        )
    }

    pub fn with_sources(
        store: Arc<S>,
        projects: Arc<dyn ProjectDirectory>,
        attendance: Arc<dyn AttendanceLog>,
    ) -> Self {
        Self {
            store,
            projects,
            attendance,
        }
    }

    /// Split the days of `month` into present, absent, and on-leave.
    ///
    /// A day covered by approved leave counts as on-leave even when the attendance log also
    /// marks it absent.
    pub fn attendance_for(
        &self,
        employee_id: &EmployeeId,
        month: YearMonth,
    ) -> Result<AttendanceSummary, WorkflowError> {
        let approved = self.store.read(|view| {
            view.employee(employee_id).map(|_| {
                view.leave_requests(
                    &LeaveFilter::for_employee(employee_id).with_status(RequestStatus::Approved),
                )
            })
        })?;
        let approved =
            approved.ok_or_else(|| WorkflowError::not_found(EntityKind::Employee, employee_id))?;

        let days = month.range();
        let on_leave: BTreeSet<NaiveDate> = approved
            .iter()
            .filter_map(|request| request.period.intersection(&days))
            .flat_map(|overlap| overlap.iter_days())
            .collect();
        let absent: BTreeSet<NaiveDate> = self
            .attendance
            .absences(employee_id, &days)?
            .into_iter()
            .filter(|day| days.contains(*day) && !on_leave.contains(day))
            .collect();

        let calendar_days = days.days();
        let on_leave_days = count(on_leave.len());
        let absent_days = count(absent.len());
        let summary = AttendanceSummary {
            employee_id: employee_id.clone(),
            month,
            calendar_days,
            present_days: calendar_days.saturating_sub(on_leave_days + absent_days),
            absent_days,
            on_leave_days,
        };

        debug!(
            employee_id = %employee_id,
            month = %month,
            on_leave = summary.on_leave_days,
            absent = summary.absent_days,
            "attendance summarised"
        );
        Ok(summary)
    }

    /// Balance, pending counts, and totals for one employee, read from a single snapshot.
    pub fn stats_for(&self, employee_id: &EmployeeId) -> Result<EmployeeStats, WorkflowError> {
        let snapshot = self.store.read(|view| {
            let employee = view.employee(employee_id)?;
            let leaves = view.leave_requests(&LeaveFilter::for_employee(employee_id));
            let bookings = view.bookings(&BookingFilter::for_employee(employee_id));
            Some((employee, leaves, bookings))
        })?;
        let (employee, leaves, bookings) =
            snapshot.ok_or_else(|| WorkflowError::not_found(EntityKind::Employee, employee_id))?;

        let leave_days_taken = leaves
            .iter()
            .filter(|request| request.is_approved())
            .map(|request| request.days())
            .fold(0u32, u32::saturating_add);
        let pending_leave_requests = count(
            leaves
                .iter()
                .filter(|request| request.status == RequestStatus::Pending)
                .count(),
        );
        let pending_bookings = count(
            bookings
                .iter()
                .filter(|booking| booking.status == RequestStatus::Pending)
                .count(),
        );
        let active_projects = count(
            self.projects
                .assignments(employee_id)?
                .iter()
                .filter(|assignment| assignment.is_active())
                .count(),
        );

        Ok(EmployeeStats {
            employee_id: employee.id,
            leave_balance: employee.leave_balance,
            leave_days_taken,
            pending_leave_requests,
            pending_bookings,
            pending_requests: pending_leave_requests + pending_bookings,
            total_bookings: count(bookings.len()),
            active_projects,
        })
    }

    /// Project assignments, active work first and then by nearest end date.
    pub fn projects_for(
        &self,
        employee_id: &EmployeeId,
    ) -> Result<Vec<ProjectAssignment>, WorkflowError> {
        let known = self.store.read(|view| view.employee(employee_id).is_some())?;
        if !known {
            return Err(WorkflowError::not_found(EntityKind::Employee, employee_id));
        }

        let mut assignments = self.projects.assignments(employee_id)?;
        assignments.sort_by(|a, b| {
            a.status
                .rank()
                .cmp(&b.status.rank())
                .then_with(|| match (a.end_date, b.end_date) {
                    (Some(left), Some(right)) => left.cmp(&right),
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => std::cmp::Ordering::Equal,
                })
                .then_with(|| a.project_id.cmp(&b.project_id))
        });
        Ok(assignments)
    }
}

fn count(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}
