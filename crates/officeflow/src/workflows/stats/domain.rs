use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::workflows::domain::{DateRange, EmployeeId};

/// Calendar month such as `2025-11`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    first: NaiveDate,
    last: NaiveDate,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let last = first.checked_add_months(Months::new(1))?.pred_opt()?;
        Some(Self { first, last })
    }

    pub fn containing(day: NaiveDate) -> Option<Self> {
        Self::new(day.year(), day.month())
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn range(&self) -> DateRange {
        DateRange::new(self.first, self.last).unwrap_or_else(|| DateRange::single(self.first))
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a YYYY-MM month")]
pub struct YearMonthParseError(String);

impl FromStr for YearMonth {
    type Err = YearMonthParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let invalid = || YearMonthParseError(raw.to_string());
        let (year, month) = trimmed.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        Self::new(year, month).ok_or_else(invalid)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Day counts for one employee over one calendar month.
///
/// `present_days + absent_days + on_leave_days == calendar_days`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceSummary {
    pub employee_id: EmployeeId,
    pub month: YearMonth,
    pub calendar_days: u32,
    pub present_days: u32,
    pub absent_days: u32,
    pub on_leave_days: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeStats {
    pub employee_id: EmployeeId,
    pub leave_balance: u32,
    /// Sum of approved leave durations, in days.
    pub leave_days_taken: u32,
    pub pending_leave_requests: u32,
    pub pending_bookings: u32,
    pub pending_requests: u32,
    pub total_bookings: u32,
    pub active_projects: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Planned,
    Active,
    OnHold,
    Completed,
}

impl ProjectStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Planned => "Planned",
            Self::Active => "Active",
            Self::OnHold => "On Hold",
            Self::Completed => "Completed",
        }
    }

    /// Listing order: active work first, finished work last.
    pub(crate) const fn rank(self) -> u8 {
        match self {
            Self::Active => 0,
            Self::OnHold => 1,
            Self::Planned => 2,
            Self::Completed => 3,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "planned" | "planning" => Some(Self::Planned),
            "active" | "in_progress" => Some(Self::Active),
            "on_hold" | "paused" => Some(Self::OnHold),
            "completed" | "done" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// An employee's place on a project, as reported by the project directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectAssignment {
    pub project_id: String,
    pub name: String,
    pub status: ProjectStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl ProjectAssignment {
    pub fn is_active(&self) -> bool {
        self.status == ProjectStatus::Active
    }
}
