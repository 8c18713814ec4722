//! Employee and meeting-room directory: registration, archival, and CSV seeding.

mod parser;
mod service;

pub use service::DirectoryService;

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::DEFAULT_LEAVE_BALANCE;
use crate::workflows::domain::{Employee, EmployeeId, MeetingRoom};
use crate::workflows::stats::{MemoryProjectDirectory, ProjectAssignment, SourceError};
use crate::workflows::store::{EntityStore, StoreError};
use parser::ParseFailure;

pub const EMPLOYEES_FILE: &str = "employees.csv";
pub const ROOMS_FILE: &str = "rooms.csv";
pub const PROJECTS_FILE: &str = "projects.csv";

#[derive(Debug)]
pub enum DirectoryImportError {
    Io { path: PathBuf, source: std::io::Error },
    Csv { file: &'static str, source: csv::Error },
    InvalidRow {
        file: &'static str,
        line: usize,
        message: String,
    },
    Store(StoreError),
    Projects(SourceError),
}

impl std::fmt::Display for DirectoryImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DirectoryImportError::Io { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            DirectoryImportError::Csv { file, source } => {
                write!(f, "invalid CSV data in {}: {}", file, source)
            }
            DirectoryImportError::InvalidRow {
                file,
                line,
                message,
            } => write!(f, "{} line {}: {}", file, line, message),
            DirectoryImportError::Store(err) => {
                write!(f, "could not load directory into the store: {}", err)
            }
            DirectoryImportError::Projects(err) => {
                write!(f, "could not load project assignments: {}", err)
            }
        }
    }
}

impl std::error::Error for DirectoryImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DirectoryImportError::Io { source, .. } => Some(source),
            DirectoryImportError::Csv { source, .. } => Some(source),
            DirectoryImportError::InvalidRow { .. } => None,
            DirectoryImportError::Store(err) => Some(err),
            DirectoryImportError::Projects(err) => Some(err),
        }
    }
}

impl From<StoreError> for DirectoryImportError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl From<SourceError> for DirectoryImportError {
    fn from(err: SourceError) -> Self {
        Self::Projects(err)
    }
}

fn attach(file: &'static str) -> impl Fn(ParseFailure) -> DirectoryImportError {
    move |failure| match failure {
        ParseFailure::Csv(source) => DirectoryImportError::Csv { file, source },
        ParseFailure::Row(issue) => DirectoryImportError::InvalidRow {
            file,
            line: issue.line,
            message: issue.message,
        },
    }
}

/// Parsed seed data, not yet written anywhere.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectorySeed {
    pub employees: Vec<Employee>,
    pub rooms: Vec<MeetingRoom>,
    pub assignments: Vec<(EmployeeId, ProjectAssignment)>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub employees: usize,
    pub rooms: usize,
    pub assignments: usize,
}

impl DirectorySeed {
    /// Insert employees and rooms in one unit of work, then hand the assignments to the
    /// project directory. A duplicate id aborts the store write as a whole.
    pub fn load_into<S: EntityStore>(
        self,
        store: &S,
        projects: &MemoryProjectDirectory,
    ) -> Result<ImportSummary, DirectoryImportError> {
        let summary = ImportSummary {
            employees: self.employees.len(),
            rooms: self.rooms.len(),
            assignments: self.assignments.len(),
        };

        let DirectorySeed {
            employees,
            rooms,
            assignments,
        } = self;

        store.write(|tx| -> Result<(), DirectoryImportError> {
            for employee in employees {
                tx.insert_employee(employee)?;
            }
            for room in rooms {
                tx.insert_room(room)?;
            }
            Ok(())
        })?;

        for (employee_id, assignment) in assignments {
            projects.assign(&employee_id, assignment)?;
        }

        info!(
            employees = summary.employees,
            rooms = summary.rooms,
            assignments = summary.assignments,
            "directory seeded"
        );
        Ok(summary)
    }
}

/// Reads `employees.csv`, `rooms.csv`, and the optional `projects.csv`.
#[derive(Debug, Clone, Copy)]
pub struct DirectoryImporter {
    default_leave_balance: u32,
}

impl Default for DirectoryImporter {
    fn default() -> Self {
        Self::new(DEFAULT_LEAVE_BALANCE)
    }
}

impl DirectoryImporter {
    /// `default_leave_balance` applies to employee rows with a blank balance column.
    pub fn new(default_leave_balance: u32) -> Self {
        Self {
            default_leave_balance,
        }
    }

    pub fn from_dir<P: AsRef<Path>>(&self, dir: P) -> Result<DirectorySeed, DirectoryImportError> {
        let dir = dir.as_ref();
        let employees = open(&dir.join(EMPLOYEES_FILE))?;
        let rooms = open(&dir.join(ROOMS_FILE))?;

        let projects_path = dir.join(PROJECTS_FILE);
        let projects = if projects_path.is_file() {
            Some(open(&projects_path)?)
        } else {
            None
        };

        self.from_readers(employees, rooms, projects)
    }

    pub fn from_readers<E, R, P>(
        &self,
        employees: E,
        rooms: R,
        projects: Option<P>,
    ) -> Result<DirectorySeed, DirectoryImportError>
    where
        E: Read,
        R: Read,
        P: Read,
    {
        let employees = parser::parse_employees(employees, self.default_leave_balance)
            .map_err(attach(EMPLOYEES_FILE))?;
        let rooms = parser::parse_rooms(rooms).map_err(attach(ROOMS_FILE))?;
        let assignments = match projects {
            Some(reader) => parser::parse_projects(reader).map_err(attach(PROJECTS_FILE))?,
            None => Vec::new(),
        };

        Ok(DirectorySeed {
            employees,
            rooms,
            assignments,
        })
    }
}

fn open(path: &Path) -> Result<File, DirectoryImportError> {
    File::open(path).map_err(|source| DirectoryImportError::Io {
        path: path.to_path_buf(),
        source,
    })
}
