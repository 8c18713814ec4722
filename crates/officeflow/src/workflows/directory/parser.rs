use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use std::io::Read;

use crate::workflows::domain::{Employee, EmployeeId, MeetingRoom, RoomId};
use crate::workflows::stats::{ProjectAssignment, ProjectStatus};

/// A row that parsed as CSV but failed a domain rule. `line` is 1-based and counts the
/// header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RowIssue {
    pub(crate) line: usize,
    pub(crate) message: String,
}

pub(crate) enum ParseFailure {
    Csv(csv::Error),
    Row(RowIssue),
}

impl From<csv::Error> for ParseFailure {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

fn reader<R: Read>(source: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source)
}

// Data starts on the line after the header.
fn line_of(index: usize) -> usize {
    index + 2
}

pub(crate) fn parse_employees<R: Read>(
    source: R,
    default_leave_balance: u32,
) -> Result<Vec<Employee>, ParseFailure> {
    let mut employees = Vec::new();
    for (index, record) in reader(source).deserialize::<EmployeeRow>().enumerate() {
        let row = record?;
        if row.id.is_empty() {
            return Err(ParseFailure::Row(RowIssue {
                line: line_of(index),
                message: "employee id is blank".to_string(),
            }));
        }

        employees.push(Employee {
            id: EmployeeId::new(row.id),
            name: row.name,
            department: row.department.unwrap_or_default(),
            email: row.email,
            leave_balance: row.leave_balance.unwrap_or(default_leave_balance),
            archived_at: None,
        });
    }
    Ok(employees)
}

pub(crate) fn parse_rooms<R: Read>(source: R) -> Result<Vec<MeetingRoom>, ParseFailure> {
    let mut rooms = Vec::new();
    for (index, record) in reader(source).deserialize::<RoomRow>().enumerate() {
        let row = record?;
        if row.id.is_empty() {
            return Err(ParseFailure::Row(RowIssue {
                line: line_of(index),
                message: "room id is blank".to_string(),
            }));
        }
        if row.capacity == 0 {
            return Err(ParseFailure::Row(RowIssue {
                line: line_of(index),
                message: format!("room {} has zero capacity", row.id),
            }));
        }

        rooms.push(MeetingRoom {
            id: RoomId::new(row.id),
            name: row.name,
            capacity: row.capacity,
            location: row.location,
            archived_at: None,
        });
    }
    Ok(rooms)
}

pub(crate) fn parse_projects<R: Read>(
    source: R,
) -> Result<Vec<(EmployeeId, ProjectAssignment)>, ParseFailure> {
    let mut assignments = Vec::new();
    for (index, record) in reader(source).deserialize::<ProjectRow>().enumerate() {
        let row = record?;
        let status = match row.status.as_deref() {
            None => ProjectStatus::Active,
            Some(raw) => ProjectStatus::parse(raw).ok_or_else(|| {
                ParseFailure::Row(RowIssue {
                    line: line_of(index),
                    message: format!("unknown project status '{raw}'"),
                })
            })?,
        };
        let end_date = match row.end_date.as_deref() {
            None => None,
            Some(raw) => Some(NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                ParseFailure::Row(RowIssue {
                    line: line_of(index),
                    message: format!("end date '{raw}' is not YYYY-MM-DD"),
                })
            })?),
        };

        assignments.push((
            EmployeeId::new(row.employee_id),
            ProjectAssignment {
                project_id: row.project_id,
                name: row.name,
                status,
                role: row.role,
                end_date,
            },
        ));
    }
    Ok(assignments)
}

#[derive(Debug, Deserialize)]
struct EmployeeRow {
    id: String,
    name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    department: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    email: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    leave_balance: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RoomRow {
    id: String,
    name: String,
    capacity: u32,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    location: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProjectRow {
    employee_id: String,
    project_id: String,
    name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    status: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    role: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    end_date: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    match empty_string_as_none(deserializer)? {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<u32>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("'{raw}' is not a day count"))),
    }
}
