use crate::infra::{bootstrap_services, OfficeServices};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use clap::Args;
use officeflow::config::{DirectoryConfig, DEFAULT_LEAVE_BALANCE};
use officeflow::error::AppError;
use officeflow::workflows::{
    ApprovalSubject, BookingSubmission, DecisionRequest, Employee, EmployeeId, EntityStore,
    LeaveSubmission, MeetingRoom, SteppingClock, WorkflowError, YearMonth,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Directory holding employees.csv, rooms.csv, and an optional projects.csv.
    /// Defaults to the bundled sample directory.
    #[arg(long)]
    pub(crate) seed_dir: Option<PathBuf>,
    /// First day of the demo week (YYYY-MM-DD). Defaults to 2025-11-03.
    #[arg(long)]
    pub(crate) week_of: Option<NaiveDate>,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { seed_dir, week_of } = args;
    let monday = week_of.unwrap_or_else(default_week);

    let config = DirectoryConfig {
        seed_dir,
        default_leave_balance: DEFAULT_LEAVE_BALANCE,
    };
    let clock = Arc::new(SteppingClock::new(
        at(monday - Duration::days(2), 8, 0),
        Duration::minutes(5),
    ));
    let services = bootstrap_services(&config, clock)?;

    println!("Officeflow approval demo (week of {monday})");

    let employees = services.directory.employees()?;
    let rooms = services.booking.rooms()?;
    let (requester, colleague, room) = match (employees.as_slice(), rooms.first()) {
        ([first, second, ..], Some(room)) => (first.clone(), second.clone(), room.clone()),
        _ => {
            println!("  Directory needs at least two employees and one room; nothing to show");
            return Ok(());
        }
    };
    let admin = DecisionRequest::approve(EmployeeId::new("ADMIN"));

    leave_walkthrough(&services, &requester, &colleague, monday, &admin)?;
    booking_walkthrough(&services, &requester, &colleague, &room, monday, &admin)?;

    println!("\nPending approvals");
    let queue = services.approvals.pending_approvals()?;
    if queue.is_empty() {
        println!("  none");
    }
    for item in queue {
        let who = item.employee_name.as_deref().unwrap_or(item.employee_id.as_str());
        match item.subject {
            ApprovalSubject::Leave { request_id, days } => println!(
                "  - leave #{request_id} for {who}: {days} day(s), submitted {}",
                item.submitted_at
            ),
            ApprovalSubject::Booking {
                booking_id,
                room_id,
            } => println!(
                "  - booking #{booking_id} of {room_id} for {who}, submitted {}",
                item.submitted_at
            ),
        }
    }

    println!("\nEmployee snapshot for {}", requester.name);
    let stats = services.stats.stats_for(&requester.id)?;
    println!(
        "  Balance {} | days taken {} | pending {} (leave {}, bookings {}) | bookings {} | active projects {}",
        stats.leave_balance,
        stats.leave_days_taken,
        stats.pending_requests,
        stats.pending_leave_requests,
        stats.pending_bookings,
        stats.total_bookings,
        stats.active_projects
    );

    if let Some(month) = YearMonth::containing(monday) {
        let attendance = services.stats.attendance_for(&requester.id, month)?;
        println!(
            "  Attendance {}: {} present, {} on leave, {} absent of {} days",
            attendance.month,
            attendance.present_days,
            attendance.on_leave_days,
            attendance.absent_days,
            attendance.calendar_days
        );
    }

    let projects = services.stats.projects_for(&requester.id)?;
    for project in projects {
        println!(
            "  Project {} {} [{}]",
            project.project_id,
            project.name,
            project.status.label()
        );
    }

    Ok(())
}

fn leave_walkthrough<S: EntityStore + 'static>(
    services: &OfficeServices<S>,
    requester: &Employee,
    colleague: &Employee,
    monday: NaiveDate,
    admin: &DecisionRequest,
) -> Result<(), AppError> {
    println!("\nLeave requests");
    println!("  {} starts with {} day(s)", requester.name, requester.leave_balance);

    let first = LeaveSubmission::new(
        requester.id.clone(),
        monday,
        monday + Duration::days(2),
        "family visit",
    );
    match services.leave.submit(first) {
        Ok(request) => {
            let decided = services.leave.decide(request.id, admin.clone())?;
            println!(
                "  #{} {} .. {} -> {}",
                decided.id,
                decided.period.start(),
                decided.period.end(),
                decided.status
            );
        }
        Err(err) => report_rejection("first request", &err),
    }

    let overlapping = LeaveSubmission::new(
        requester.id.clone(),
        monday + Duration::days(1),
        monday + Duration::days(3),
        "extended trip",
    );
    if let Err(err) = services.leave.submit(overlapping) {
        report_rejection("overlapping request", &err);
    }

    let pending = LeaveSubmission::new(
        colleague.id.clone(),
        monday + Duration::days(7),
        monday + Duration::days(7),
        "appointment",
    );
    match services.leave.submit(pending) {
        Ok(request) => println!("  #{} for {} left pending", request.id, colleague.name),
        Err(err) => report_rejection("colleague request", &err),
    }

    let balance = services.stats.stats_for(&requester.id)?.leave_balance;
    println!("  {} now has {} day(s)", requester.name, balance);
    Ok(())
}

fn booking_walkthrough<S: EntityStore + 'static>(
    services: &OfficeServices<S>,
    requester: &Employee,
    colleague: &Employee,
    room: &MeetingRoom,
    monday: NaiveDate,
    admin: &DecisionRequest,
) -> Result<(), AppError> {
    println!("\nBookings for {} ({} seats)", room.name, room.capacity);

    let slots = [
        ("A", requester, (9, 0), (10, 0)),
        ("B", colleague, (10, 0), (11, 0)),
        ("C", requester, (9, 30), (10, 30)),
    ];
    for (label, employee, start, end) in slots {
        let submission = BookingSubmission::new(
            room.id.clone(),
            employee.id.clone(),
            at(monday, start.0, start.1),
            at(monday, end.0, end.1),
        );
        match services.booking.submit(submission) {
            Ok(booking) => {
                let decided = services.booking.decide(booking.id, admin.clone())?;
                println!(
                    "  {label}: {} .. {} for {} -> {}",
                    decided.window.start().format("%H:%M"),
                    decided.window.end().format("%H:%M"),
                    employee.name,
                    decided.status
                );
            }
            Err(err) => report_rejection(label, &err),
        }
    }

    let pending = BookingSubmission::new(
        room.id.clone(),
        colleague.id.clone(),
        at(monday, 14, 0),
        at(monday, 15, 0),
    );
    if let Ok(booking) = services.booking.submit(pending) {
        println!("  #{} 14:00 .. 15:00 left pending", booking.id);
    }
    Ok(())
}

fn report_rejection(label: &str, err: &WorkflowError) {
    println!("  {label}: rejected ({err})");
}

fn default_week() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 11, 3).unwrap_or_default()
}

fn at(day: NaiveDate, hour: i64, minute: i64) -> DateTime<Utc> {
    (day.and_time(NaiveTime::MIN) + Duration::hours(hour) + Duration::minutes(minute)).and_utc()
}
