use std::sync::Arc;

use tracing::{info, warn};

use super::domain::{LeaveRequest, LeaveSubmission, NewLeaveRequest};
use crate::workflows::clock::{Clock, SystemClock};
use crate::workflows::domain::{
    DateRange, DecisionRecord, DecisionRequest, EmployeeId, EntityKind, LeaveRequestId,
    RequestStatus,
};
use crate::workflows::error::{ValidationError, WorkflowError};
use crate::workflows::store::{EntityStore, LeaveFilter, StoreView};

/// Submission, decision, and listing of leave requests.
pub struct LeaveWorkflow<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S> LeaveWorkflow<S>
where
    S: EntityStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Record a new pending request after checking the employee and the requested dates.
    pub fn submit(&self, submission: LeaveSubmission) -> Result<LeaveRequest, WorkflowError> {
        let LeaveSubmission {
            employee_id,
            kind,
            start_date,
            end_date,
            reason,
        } = submission;

        let period = DateRange::new(start_date, end_date).ok_or(
            ValidationError::InvalidDateRange {
                start: start_date,
                end: end_date,
            },
        )?;
        let submitted_at = self.clock.now();

        let request = self
            .store
            .write(|tx| -> Result<LeaveRequest, WorkflowError> {
                let employee = tx
                    .employee(&employee_id)
                    .ok_or_else(|| ValidationError::UnknownEmployee(employee_id.clone()))?;
                if !employee.is_active() {
                    return Err(ValidationError::ArchivedEmployee(employee_id.clone()).into());
                }

                if let Some(existing) = approved_overlap(&*tx, &employee_id, &period) {
                    return Err(ValidationError::OverlapsApprovedLeave(existing).into());
                }

                let stored = tx.insert_leave_request(NewLeaveRequest {
                    employee_id: employee_id.clone(),
                    kind,
                    period,
                    reason,
                    submitted_at,
                })?;
                Ok(stored)
            })?;

        info!(
            request_id = %request.id,
            employee_id = %request.employee_id,
            days = request.days(),
            "leave request submitted"
        );
        Ok(request)
    }

    /// Approve or reject a pending request.
    ///
    /// Approval re-runs the overlap check against leave approved since submission and
    /// deducts the day count from the employee's balance in the same write. When either
    /// check fails the request stays pending and the balance is untouched.
    pub fn decide(
        &self,
        request_id: LeaveRequestId,
        verdict: DecisionRequest,
    ) -> Result<LeaveRequest, WorkflowError> {
        let decided_at = self.clock.now();
        let DecisionRequest {
            decision,
            decider_id,
            comments,
        } = verdict;

        let outcome = self
            .store
            .write(|tx| -> Result<LeaveRequest, WorkflowError> {
                let mut request = tx
                    .leave_request(request_id)
                    .ok_or_else(|| WorkflowError::not_found(EntityKind::LeaveRequest, request_id))?;

                let next = request.status.transition(decision).map_err(|status| {
                    WorkflowError::invalid_state(EntityKind::LeaveRequest, request_id, status)
                })?;

                if next == RequestStatus::Approved {
                    if let Some(existing) =
                        approved_overlap(&*tx, &request.employee_id, &request.period)
                    {
                        return Err(WorkflowError::conflict(
                            EntityKind::LeaveRequest,
                            request_id,
                            existing,
                        ));
                    }

                    let mut employee = tx.employee(&request.employee_id).ok_or_else(|| {
                        WorkflowError::not_found(EntityKind::Employee, &request.employee_id)
                    })?;
                    let requested = request.days();
                    employee.leave_balance = employee
                        .leave_balance
                        .checked_sub(requested)
                        .ok_or_else(|| WorkflowError::InsufficientBalance {
                            employee_id: employee.id.clone(),
                            requested,
                            available: employee.leave_balance,
                        })?;
                    tx.update_employee(employee)?;
                }

                request.status = next;
                request.decision = Some(DecisionRecord {
                    decided_by: decider_id,
                    decided_at,
                    comments,
                });
                tx.update_leave_request(request.clone())?;
                Ok(request)
            });

        match &outcome {
            Ok(request) => info!(
                request_id = %request.id,
                employee_id = %request.employee_id,
                status = request.status.label(),
                "leave request decided"
            ),
            Err(err @ (WorkflowError::Conflict { .. } | WorkflowError::InsufficientBalance { .. })) => {
                warn!(request_id = %request_id, error = %err, "leave approval refused")
            }
            Err(_) => {}
        }

        outcome
    }

    pub fn get(&self, request_id: LeaveRequestId) -> Result<LeaveRequest, WorkflowError> {
        self.store
            .read(|view| view.leave_request(request_id))?
            .ok_or_else(|| WorkflowError::not_found(EntityKind::LeaveRequest, request_id))
    }

    /// Requests made by one employee, oldest submission first.
    pub fn list_for_employee(
        &self,
        employee_id: &EmployeeId,
    ) -> Result<Vec<LeaveRequest>, WorkflowError> {
        let requests = self.store.read(|view| {
            view.employee(employee_id)
                .map(|_| view.leave_requests(&LeaveFilter::for_employee(employee_id)))
        })?;

        let mut requests = requests
            .ok_or_else(|| WorkflowError::not_found(EntityKind::Employee, employee_id))?;
        sort_by_submission(&mut requests);
        Ok(requests)
    }

    /// Admin listing, optionally narrowed to one status, oldest submission first.
    pub fn list_all(
        &self,
        status: Option<RequestStatus>,
    ) -> Result<Vec<LeaveRequest>, WorkflowError> {
        let filter = LeaveFilter {
            employee_id: None,
            status,
        };
        let mut requests = self.store.read(|view| view.leave_requests(&filter))?;
        sort_by_submission(&mut requests);
        Ok(requests)
    }
}

/// First approved request of `employee_id` whose dates share a day with `period`.
fn approved_overlap<V>(
    view: &V,
    employee_id: &EmployeeId,
    period: &DateRange,
) -> Option<LeaveRequestId>
where
    V: StoreView + ?Sized,
{
    let filter = LeaveFilter::for_employee(employee_id).with_status(RequestStatus::Approved);
    view.leave_requests(&filter)
        .into_iter()
        .find(|existing| existing.period.overlaps(period))
        .map(|existing| existing.id)
}

fn sort_by_submission(requests: &mut [LeaveRequest]) {
    requests.sort_by(|a, b| {
        a.submitted_at
            .cmp(&b.submitted_at)
            .then_with(|| a.id.cmp(&b.id))
    });
}
