//! Meeting-room bookings: capacity and availability checks, half-open overlap detection,
//! and the approval lifecycle.

pub mod domain;
mod service;

pub use domain::{Booking, BookingSubmission, NewBooking};
pub use service::BookingWorkflow;
