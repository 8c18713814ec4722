use std::collections::BTreeMap;
use std::sync::RwLock;

use super::{
    BookingFilter, EmployeeFilter, EntityStore, LeaveFilter, RoomFilter, StoreError, StoreTx,
    StoreView,
};
use crate::workflows::booking::domain::{Booking, NewBooking};
use crate::workflows::domain::{
    BookingId, Employee, EmployeeId, EntityKind, LeaveRequestId, MeetingRoom, RoomId,
};
use crate::workflows::leave::domain::{LeaveRequest, NewLeaveRequest};

/// Process-local store. Readers share a snapshot; writers are serialized behind one lock and
/// undo their own changes when the unit of work fails.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with a directory of employees and rooms.
    pub fn with_directory(
        employees: impl IntoIterator<Item = Employee>,
        rooms: impl IntoIterator<Item = MeetingRoom>,
    ) -> Result<Self, StoreError> {
        let store = Self::new();
        store.write(|tx| {
            for employee in employees {
                tx.insert_employee(employee)?;
            }
            for room in rooms {
                tx.insert_room(room)?;
            }
            Ok::<_, StoreError>(())
        })?;
        Ok(store)
    }
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("memory store lock poisoned".to_string())
}

impl EntityStore for MemoryStore {
    fn read<R>(&self, op: impl FnOnce(&dyn StoreView) -> R) -> Result<R, StoreError> {
        let guard = self.tables.read().map_err(|_| poisoned())?;
        Ok(op(&*guard))
    }

    fn write<R, E>(&self, op: impl FnOnce(&mut dyn StoreTx) -> Result<R, E>) -> Result<R, E>
    where
        E: From<StoreError>,
    {
        let mut guard = self.tables.write().map_err(|_| E::from(poisoned()))?;
        let mut tx = MemoryTx {
            tables: &mut *guard,
            undo: Vec::new(),
        };

        match op(&mut tx) {
            Ok(value) => Ok(value),
            Err(err) => {
                tx.rollback();
                Err(err)
            }
        }
    }
}

#[derive(Debug, Default)]
struct Tables {
    employees: BTreeMap<EmployeeId, Employee>,
    rooms: BTreeMap<RoomId, MeetingRoom>,
    leave_requests: BTreeMap<LeaveRequestId, LeaveRequest>,
    bookings: BTreeMap<BookingId, Booking>,
    leave_sequence: u64,
    booking_sequence: u64,
}

impl StoreView for Tables {
    fn employee(&self, id: &EmployeeId) -> Option<Employee> {
        self.employees.get(id).cloned()
    }

    fn employees(&self, filter: &EmployeeFilter) -> Vec<Employee> {
        self.employees
            .values()
            .filter(|employee| filter.matches(employee))
            .cloned()
            .collect()
    }

    fn room(&self, id: &RoomId) -> Option<MeetingRoom> {
        self.rooms.get(id).cloned()
    }

    fn rooms(&self, filter: &RoomFilter) -> Vec<MeetingRoom> {
        self.rooms
            .values()
            .filter(|room| filter.matches(room))
            .cloned()
            .collect()
    }

    fn leave_request(&self, id: LeaveRequestId) -> Option<LeaveRequest> {
        self.leave_requests.get(&id).cloned()
    }

    fn leave_requests(&self, filter: &LeaveFilter) -> Vec<LeaveRequest> {
        self.leave_requests
            .values()
            .filter(|request| filter.matches(request))
            .cloned()
            .collect()
    }

    fn booking(&self, id: BookingId) -> Option<Booking> {
        self.bookings.get(&id).cloned()
    }

    fn bookings(&self, filter: &BookingFilter) -> Vec<Booking> {
        self.bookings
            .values()
            .filter(|booking| filter.matches(booking))
            .cloned()
            .collect()
    }
}

/// Prior value of a record touched inside a transaction; `None` means it did not exist.
#[derive(Debug)]
enum Undo {
    Employee(EmployeeId, Option<Employee>),
    Room(RoomId, Option<MeetingRoom>),
    LeaveRequest(LeaveRequestId, Option<LeaveRequest>),
    Booking(BookingId, Option<Booking>),
}

struct MemoryTx<'a> {
    tables: &'a mut Tables,
    undo: Vec<Undo>,
}

impl MemoryTx<'_> {
    // Sequences are not rewound, so a failed insert leaves a gap in the ids.
    fn rollback(self) {
        let MemoryTx { tables, undo } = self;
        for entry in undo.into_iter().rev() {
            match entry {
                Undo::Employee(id, previous) => restore(&mut tables.employees, id, previous),
                Undo::Room(id, previous) => restore(&mut tables.rooms, id, previous),
                Undo::LeaveRequest(id, previous) => {
                    restore(&mut tables.leave_requests, id, previous)
                }
                Undo::Booking(id, previous) => restore(&mut tables.bookings, id, previous),
            }
        }
    }
}

fn restore<K: Ord, V>(table: &mut BTreeMap<K, V>, id: K, previous: Option<V>) {
    match previous {
        Some(value) => {
            table.insert(id, value);
        }
        None => {
            table.remove(&id);
        }
    }
}

impl StoreView for MemoryTx<'_> {
    fn employee(&self, id: &EmployeeId) -> Option<Employee> {
        self.tables.employee(id)
    }

    fn employees(&self, filter: &EmployeeFilter) -> Vec<Employee> {
        self.tables.employees(filter)
    }

    fn room(&self, id: &RoomId) -> Option<MeetingRoom> {
        self.tables.room(id)
    }

    fn rooms(&self, filter: &RoomFilter) -> Vec<MeetingRoom> {
        self.tables.rooms(filter)
    }

    fn leave_request(&self, id: LeaveRequestId) -> Option<LeaveRequest> {
        self.tables.leave_request(id)
    }

    fn leave_requests(&self, filter: &LeaveFilter) -> Vec<LeaveRequest> {
        self.tables.leave_requests(filter)
    }

    fn booking(&self, id: BookingId) -> Option<Booking> {
        self.tables.booking(id)
    }

    fn bookings(&self, filter: &BookingFilter) -> Vec<Booking> {
        self.tables.bookings(filter)
    }
}

impl StoreTx for MemoryTx<'_> {
    fn insert_employee(&mut self, employee: Employee) -> Result<Employee, StoreError> {
        if self.tables.employees.contains_key(&employee.id) {
            return Err(StoreError::duplicate(EntityKind::Employee, &employee.id));
        }
        self.undo.push(Undo::Employee(employee.id.clone(), None));
        self.tables
            .employees
            .insert(employee.id.clone(), employee.clone());
        Ok(employee)
    }

    fn update_employee(&mut self, employee: Employee) -> Result<(), StoreError> {
        let Some(slot) = self.tables.employees.get_mut(&employee.id) else {
            return Err(StoreError::missing(EntityKind::Employee, &employee.id));
        };
        let previous = std::mem::replace(slot, employee);
        self.undo
            .push(Undo::Employee(previous.id.clone(), Some(previous)));
        Ok(())
    }

    fn insert_room(&mut self, room: MeetingRoom) -> Result<MeetingRoom, StoreError> {
        if self.tables.rooms.contains_key(&room.id) {
            return Err(StoreError::duplicate(EntityKind::MeetingRoom, &room.id));
        }
        self.undo.push(Undo::Room(room.id.clone(), None));
        self.tables.rooms.insert(room.id.clone(), room.clone());
        Ok(room)
    }

    fn update_room(&mut self, room: MeetingRoom) -> Result<(), StoreError> {
        let Some(slot) = self.tables.rooms.get_mut(&room.id) else {
            return Err(StoreError::missing(EntityKind::MeetingRoom, &room.id));
        };
        let previous = std::mem::replace(slot, room);
        self.undo.push(Undo::Room(previous.id.clone(), Some(previous)));
        Ok(())
    }

    fn insert_leave_request(
        &mut self,
        draft: NewLeaveRequest,
    ) -> Result<LeaveRequest, StoreError> {
        self.tables.leave_sequence += 1;
        let id = LeaveRequestId(self.tables.leave_sequence);
        if self.tables.leave_requests.contains_key(&id) {
            return Err(StoreError::duplicate(EntityKind::LeaveRequest, id));
        }
        let record = draft.into_record(id);
        self.undo.push(Undo::LeaveRequest(id, None));
        self.tables.leave_requests.insert(id, record.clone());
        Ok(record)
    }

    fn update_leave_request(&mut self, request: LeaveRequest) -> Result<(), StoreError> {
        let Some(slot) = self.tables.leave_requests.get_mut(&request.id) else {
            return Err(StoreError::missing(EntityKind::LeaveRequest, request.id));
        };
        let previous = std::mem::replace(slot, request);
        self.undo
            .push(Undo::LeaveRequest(previous.id, Some(previous)));
        Ok(())
    }

    fn insert_booking(&mut self, draft: NewBooking) -> Result<Booking, StoreError> {
        self.tables.booking_sequence += 1;
        let id = BookingId(self.tables.booking_sequence);
        if self.tables.bookings.contains_key(&id) {
            return Err(StoreError::duplicate(EntityKind::Booking, id));
        }
        let record = draft.into_record(id);
        self.undo.push(Undo::Booking(id, None));
        self.tables.bookings.insert(id, record.clone());
        Ok(record)
    }

    fn update_booking(&mut self, booking: Booking) -> Result<(), StoreError> {
        let Some(slot) = self.tables.bookings.get_mut(&booking.id) else {
            return Err(StoreError::missing(EntityKind::Booking, booking.id));
        };
        let previous = std::mem::replace(slot, booking);
        self.undo.push(Undo::Booking(previous.id, Some(previous)));
        Ok(())
    }
}
