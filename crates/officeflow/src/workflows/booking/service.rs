use std::sync::Arc;

use tracing::{info, warn};

use super::domain::{Booking, BookingSubmission, NewBooking};
use crate::workflows::clock::{Clock, SystemClock};
use crate::workflows::domain::{
    BookingId, DecisionRecord, DecisionRequest, EmployeeId, EntityKind, MeetingRoom,
    RequestStatus, RoomId, TimeWindow,
};
use crate::workflows::error::{ValidationError, WorkflowError};
use crate::workflows::store::{BookingFilter, EntityStore, RoomFilter, StoreView};

/// Submission, decision, and listing of meeting-room bookings.
pub struct BookingWorkflow<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S> BookingWorkflow<S>
where
    S: EntityStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Rooms that still accept bookings, ordered by id.
    pub fn rooms(&self) -> Result<Vec<MeetingRoom>, WorkflowError> {
        Ok(self.store.read(|view| view.rooms(&RoomFilter::active()))?)
    }

    /// Record a new pending booking.
    ///
    /// Only approved bookings block a window; competing pending bookings are allowed to
    /// coexist until one of them is approved.
    pub fn submit(&self, submission: BookingSubmission) -> Result<Booking, WorkflowError> {
        let BookingSubmission {
            room_id,
            employee_id,
            start,
            end,
            purpose,
            attendees,
        } = submission;

        let window =
            TimeWindow::new(start, end).ok_or(ValidationError::InvalidTimeWindow { start, end })?;
        let submitted_at = self.clock.now();

        let booking = self
            .store
            .write(|tx| -> Result<Booking, WorkflowError> {
                let room = tx
                    .room(&room_id)
                    .ok_or_else(|| ValidationError::UnknownRoom(room_id.clone()))?;
                if !room.is_active() {
                    return Err(ValidationError::ArchivedRoom(room_id.clone()).into());
                }

                let employee = tx
                    .employee(&employee_id)
                    .ok_or_else(|| ValidationError::UnknownEmployee(employee_id.clone()))?;
                if !employee.is_active() {
                    return Err(ValidationError::ArchivedEmployee(employee_id.clone()).into());
                }

                if let Some(attendees) = attendees {
                    if attendees > room.capacity {
                        return Err(ValidationError::ExceedsCapacity {
                            attendees,
                            capacity: room.capacity,
                        }
                        .into());
                    }
                }

                if let Some(existing) = approved_overlap(&*tx, &room_id, &window) {
                    return Err(ValidationError::OverlapsApprovedBooking(existing).into());
                }

                let stored = tx.insert_booking(NewBooking {
                    room_id: room_id.clone(),
                    employee_id: employee_id.clone(),
                    window,
                    purpose,
                    attendees,
                    submitted_at,
                })?;
                Ok(stored)
            })?;

        info!(
            booking_id = %booking.id,
            room_id = %booking.room_id,
            employee_id = %booking.employee_id,
            "booking submitted"
        );
        Ok(booking)
    }

    /// Approve or reject a pending booking. Approval fails with a conflict when another
    /// booking for the same room was approved for an overlapping window in the meantime.
    pub fn decide(
        &self,
        booking_id: BookingId,
        verdict: DecisionRequest,
    ) -> Result<Booking, WorkflowError> {
        let decided_at = self.clock.now();
        let DecisionRequest {
            decision,
            decider_id,
            comments,
        } = verdict;

        let outcome = self
            .store
            .write(|tx| -> Result<Booking, WorkflowError> {
                let mut booking = tx
                    .booking(booking_id)
                    .ok_or_else(|| WorkflowError::not_found(EntityKind::Booking, booking_id))?;

                let next = booking.status.transition(decision).map_err(|status| {
                    WorkflowError::invalid_state(EntityKind::Booking, booking_id, status)
                })?;

                if next == RequestStatus::Approved {
                    if let Some(existing) = approved_overlap(&*tx, &booking.room_id, &booking.window)
                    {
                        return Err(WorkflowError::conflict(
                            EntityKind::Booking,
                            booking_id,
                            existing,
                        ));
                    }
                }

                booking.status = next;
                booking.decision = Some(DecisionRecord {
                    decided_by: decider_id,
                    decided_at,
                    comments,
                });
                tx.update_booking(booking.clone())?;
                Ok(booking)
            });

        match &outcome {
            Ok(booking) => info!(
                booking_id = %booking.id,
                room_id = %booking.room_id,
                status = booking.status.label(),
                "booking decided"
            ),
            Err(err @ WorkflowError::Conflict { .. }) => {
                warn!(booking_id = %booking_id, error = %err, "booking approval refused")
            }
            Err(_) => {}
        }

        outcome
    }

    pub fn get(&self, booking_id: BookingId) -> Result<Booking, WorkflowError> {
        self.store
            .read(|view| view.booking(booking_id))?
            .ok_or_else(|| WorkflowError::not_found(EntityKind::Booking, booking_id))
    }

    /// Bookings made by one employee, oldest submission first.
    pub fn list_for_employee(
        &self,
        employee_id: &EmployeeId,
    ) -> Result<Vec<Booking>, WorkflowError> {
        let bookings = self.store.read(|view| {
            view.employee(employee_id)
                .map(|_| view.bookings(&BookingFilter::for_employee(employee_id)))
        })?;

        let mut bookings =
            bookings.ok_or_else(|| WorkflowError::not_found(EntityKind::Employee, employee_id))?;
        sort_by_submission(&mut bookings);
        Ok(bookings)
    }

    /// Admin listing, optionally narrowed to one status, oldest submission first.
    pub fn list_all(&self, status: Option<RequestStatus>) -> Result<Vec<Booking>, WorkflowError> {
        let filter = BookingFilter {
            status,
            ..BookingFilter::all()
        };
        let mut bookings = self.store.read(|view| view.bookings(&filter))?;
        sort_by_submission(&mut bookings);
        Ok(bookings)
    }
}

fn approved_overlap<V>(view: &V, room_id: &RoomId, window: &TimeWindow) -> Option<BookingId>
where
    V: StoreView + ?Sized,
{
    let filter = BookingFilter::for_room(room_id).with_status(RequestStatus::Approved);
    view.bookings(&filter)
        .into_iter()
        .find(|existing| existing.window.overlaps(window))
        .map(|existing| existing.id)
}

fn sort_by_submission(bookings: &mut [Booking]) {
    bookings.sort_by(|a, b| {
        a.submitted_at
            .cmp(&b.submitted_at)
            .then_with(|| a.id.cmp(&b.id))
    });
}
