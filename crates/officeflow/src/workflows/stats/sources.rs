use std::collections::{BTreeSet, HashMap};
use std::sync::RwLock;

use chrono::NaiveDate;

use super::domain::ProjectAssignment;
use crate::workflows::domain::{DateRange, EmployeeId};

/// Failure reported by an external read-only source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    #[error("{source_name} unavailable: {message}")]
    Unavailable {
        source_name: &'static str,
        message: String,
    },
}

impl SourceError {
    fn poisoned(source_name: &'static str) -> Self {
        Self::Unavailable {
            source_name,
            message: "lock poisoned".to_string(),
        }
    }
}

/// Project assignments owned by another system.
pub trait ProjectDirectory: Send + Sync {
    fn assignments(&self, employee_id: &EmployeeId) -> Result<Vec<ProjectAssignment>, SourceError>;
}

/// Daily presence records owned by another system.
pub trait AttendanceLog: Send + Sync {
    /// Days inside `range` on which the employee was recorded absent.
    fn absences(
        &self,
        employee_id: &EmployeeId,
        range: &DateRange,
    ) -> Result<Vec<NaiveDate>, SourceError>;
}

/// Attendance source for deployments without badge or check-in data.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAttendanceLog;

impl AttendanceLog for NoAttendanceLog {
    fn absences(
        &self,
        _employee_id: &EmployeeId,
        _range: &DateRange,
    ) -> Result<Vec<NaiveDate>, SourceError> {
        Ok(Vec::new())
    }
}

#[derive(Debug, Default)]
pub struct MemoryAttendanceLog {
    absences: RwLock<HashMap<EmployeeId, BTreeSet<NaiveDate>>>,
}

impl MemoryAttendanceLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_absence(&self, employee_id: &EmployeeId, day: NaiveDate) -> Result<(), SourceError> {
        let mut absences = self
            .absences
            .write()
            .map_err(|_| SourceError::poisoned("attendance log"))?;
        absences.entry(employee_id.clone()).or_default().insert(day);
        Ok(())
    }
}

impl AttendanceLog for MemoryAttendanceLog {
    fn absences(
        &self,
        employee_id: &EmployeeId,
        range: &DateRange,
    ) -> Result<Vec<NaiveDate>, SourceError> {
        let absences = self
            .absences
            .read()
            .map_err(|_| SourceError::poisoned("attendance log"))?;
        Ok(absences
            .get(employee_id)
            .map(|days| {
                days.range(range.start()..=range.end())
                    .copied()
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[derive(Debug, Default)]
pub struct MemoryProjectDirectory {
    assignments: RwLock<HashMap<EmployeeId, Vec<ProjectAssignment>>>,
}

impl MemoryProjectDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(
        &self,
        employee_id: &EmployeeId,
        assignment: ProjectAssignment,
    ) -> Result<(), SourceError> {
        let mut assignments = self
            .assignments
            .write()
            .map_err(|_| SourceError::poisoned("project directory"))?;
        assignments
            .entry(employee_id.clone())
            .or_default()
            .push(assignment);
        Ok(())
    }
}

impl ProjectDirectory for MemoryProjectDirectory {
    fn assignments(&self, employee_id: &EmployeeId) -> Result<Vec<ProjectAssignment>, SourceError> {
        let assignments = self
            .assignments
            .read()
            .map_err(|_| SourceError::poisoned("project directory"))?;
        Ok(assignments.get(employee_id).cloned().unwrap_or_default())
    }
}
