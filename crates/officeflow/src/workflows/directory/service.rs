use std::sync::Arc;

use tracing::info;

use crate::workflows::clock::{Clock, SystemClock};
use crate::workflows::domain::{
    Employee, EmployeeId, EmployeeUpdate, EntityKind, MeetingRoom, RoomId,
};
use crate::workflows::error::{ValidationError, WorkflowError};
use crate::workflows::store::{EmployeeFilter, EntityStore, RoomFilter};

/// Registration and soft-archival of employees and meeting rooms.
///
/// Records are never removed: archiving stamps `archived_at`, which hides the record from
/// active listings and blocks new submissions while keeping past requests readable.
pub struct DirectoryService<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S> DirectoryService<S>
where
    S: EntityStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn register_employee(&self, mut employee: Employee) -> Result<Employee, WorkflowError> {
        if employee.id.as_str().trim().is_empty() {
            return Err(ValidationError::BlankField("employee id").into());
        }
        if employee.name.trim().is_empty() {
            return Err(ValidationError::BlankField("name").into());
        }
        employee.archived_at = None;
        let stored = self
            .store
            .write(|tx| tx.insert_employee(employee).map_err(WorkflowError::from))?;
        info!(employee_id = %stored.id, department = %stored.department, "employee registered");
        Ok(stored)
    }

    /// Apply profile edits. Balance and archival state are left as they are.
    pub fn update_employee(
        &self,
        employee_id: &EmployeeId,
        update: EmployeeUpdate,
    ) -> Result<Employee, WorkflowError> {
        let EmployeeUpdate {
            name,
            department,
            email,
        } = update;
        if name.as_deref().is_some_and(|name| name.trim().is_empty()) {
            return Err(ValidationError::BlankField("name").into());
        }

        let employee = self.store.write(|tx| -> Result<Employee, WorkflowError> {
            let mut employee = tx
                .employee(employee_id)
                .ok_or_else(|| WorkflowError::not_found(EntityKind::Employee, employee_id))?;
            if let Some(name) = name {
                employee.name = name.trim().to_string();
            }
            if let Some(department) = department {
                employee.department = department.trim().to_string();
            }
            if let Some(email) = email {
                let email = email.trim();
                employee.email = (!email.is_empty()).then(|| email.to_string());
            }
            tx.update_employee(employee.clone())?;
            Ok(employee)
        })?;
        info!(employee_id = %employee.id, "employee updated");
        Ok(employee)
    }

    /// Archive an employee. Archiving twice keeps the first timestamp.
    pub fn archive_employee(&self, employee_id: &EmployeeId) -> Result<Employee, WorkflowError> {
        let archived_at = self.clock.now();
        let employee = self.store.write(|tx| -> Result<Employee, WorkflowError> {
            let mut employee = tx
                .employee(employee_id)
                .ok_or_else(|| WorkflowError::not_found(EntityKind::Employee, employee_id))?;
            if employee.archived_at.is_none() {
                employee.archived_at = Some(archived_at);
                tx.update_employee(employee.clone())?;
            }
            Ok(employee)
        })?;
        info!(employee_id = %employee.id, "employee archived");
        Ok(employee)
    }

    pub fn employee(&self, employee_id: &EmployeeId) -> Result<Employee, WorkflowError> {
        self.store
            .read(|view| view.employee(employee_id))?
            .ok_or_else(|| WorkflowError::not_found(EntityKind::Employee, employee_id))
    }

    /// Active employees ordered by id.
    pub fn employees(&self) -> Result<Vec<Employee>, WorkflowError> {
        Ok(self.store.read(|view| view.employees(&EmployeeFilter::active()))?)
    }

    pub fn register_room(&self, mut room: MeetingRoom) -> Result<MeetingRoom, WorkflowError> {
        if room.capacity == 0 {
            return Err(ValidationError::ZeroCapacity.into());
        }
        room.archived_at = None;
        let stored = self
            .store
            .write(|tx| tx.insert_room(room).map_err(WorkflowError::from))?;
        info!(room_id = %stored.id, capacity = stored.capacity, "meeting room registered");
        Ok(stored)
    }

    /// Archive a room. Existing bookings keep their status; new submissions are refused.
    pub fn archive_room(&self, room_id: &RoomId) -> Result<MeetingRoom, WorkflowError> {
        let archived_at = self.clock.now();
        let room = self.store.write(|tx| -> Result<MeetingRoom, WorkflowError> {
            let mut room = tx
                .room(room_id)
                .ok_or_else(|| WorkflowError::not_found(EntityKind::MeetingRoom, room_id))?;
            if room.archived_at.is_none() {
                room.archived_at = Some(archived_at);
                tx.update_room(room.clone())?;
            }
            Ok(room)
        })?;
        info!(room_id = %room.id, "meeting room archived");
        Ok(room)
    }

    /// Every room, archived ones included, ordered by id.
    pub fn all_rooms(&self) -> Result<Vec<MeetingRoom>, WorkflowError> {
        let filter = RoomFilter {
            include_archived: true,
        };
        Ok(self.store.read(|view| view.rooms(&filter))?)
    }
}
