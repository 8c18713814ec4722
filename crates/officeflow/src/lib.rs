//! Leave and meeting-room booking approval workflows.
//!
//! The crate owns the request/approval lifecycle and the invariants around it. Storage sits
//! behind [`workflows::store::EntityStore`] and transport is left to the caller; the
//! `officeflow-api` service in this workspace is one such caller.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
