use crate::infra::{ApiError, AppState, OfficeServices};
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{delete, get, put};
use axum::{Extension, Json, Router};
use officeflow::workflows::{
    ApprovalQueueItem, AttendanceSummary, Booking, BookingId, BookingSubmission, Clock,
    DecisionRequest, Employee, EmployeeId, EmployeeStats, EmployeeUpdate, EntityStore,
    LeaveRequest, LeaveRequestId, LeaveSubmission, MeetingRoom, ProjectAssignment,
    RequestStatus, RoomId, YearMonth,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct StatusQuery {
    #[serde(default)]
    pub(crate) status: Option<String>,
}

impl StatusQuery {
    fn status(&self) -> Result<Option<RequestStatus>, ApiError> {
        match self.status.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => RequestStatus::parse(raw)
                .map(Some)
                .ok_or_else(|| ApiError::BadRequest(format!("unknown status '{raw}'"))),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct EmployeeQuery {
    pub(crate) id: String,
}

impl EmployeeQuery {
    fn employee_id(&self) -> EmployeeId {
        EmployeeId::new(self.id.trim())
    }
}

/// `month` is `YYYY-MM`; the current month is used when it is missing.
#[derive(Debug, Deserialize)]
pub(crate) struct AttendanceQuery {
    pub(crate) id: String,
    #[serde(default)]
    pub(crate) month: Option<String>,
}

impl AttendanceQuery {
    fn month(&self, today: chrono::NaiveDate) -> Result<YearMonth, ApiError> {
        match self.month.as_deref().map(str::trim) {
            None | Some("") => YearMonth::containing(today).ok_or_else(|| {
                ApiError::BadRequest(format!("no calendar month contains {today}"))
            }),
            Some(raw) => raw
                .parse()
                .map_err(|err| ApiError::BadRequest(format!("{err}"))),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct EmployeeRegistration {
    pub(crate) id: String,
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) department: String,
    #[serde(default)]
    pub(crate) email: Option<String>,
    #[serde(default)]
    pub(crate) leave_balance: Option<u32>,
}

type Services<S> = State<Arc<OfficeServices<S>>>;
type JsonBody<T> = Result<Json<T>, JsonRejection>;
type QueryParams<T> = Result<Query<T>, QueryRejection>;
type IdPath = Result<Path<u64>, PathRejection>;
type KeyPath = Result<Path<String>, PathRejection>;

/// Leave, booking, directory, employee, and admin endpoints.
pub(crate) fn office_router<S>(services: Arc<OfficeServices<S>>) -> Router
where
    S: EntityStore + 'static,
{
    Router::new()
        .route(
            "/api/leaves",
            get(list_leaves::<S>).post(submit_leave::<S>),
        )
        .route(
            "/api/leaves/:id",
            get(get_leave::<S>).put(decide_leave::<S>),
        )
        .route(
            "/api/meeting-rooms",
            get(list_rooms::<S>).post(register_room::<S>),
        )
        .route(
            "/api/meeting-rooms/:id",
            delete(archive_room::<S>),
        )
        .route(
            "/api/meetings",
            get(list_bookings::<S>).post(submit_booking::<S>),
        )
        .route(
            "/api/meetings/:id",
            get(get_booking::<S>).put(decide_booking::<S>),
        )
        .route(
            "/api/employees",
            get(list_employees::<S>).post(register_employee::<S>),
        )
        .route(
            "/api/employees/:id",
            put(update_employee::<S>)
                .get(get_employee::<S>)
                .delete(archive_employee::<S>),
        )
        .route("/api/employee/leaves", get(employee_leaves::<S>))
        .route("/api/employee/meetings", get(employee_bookings::<S>))
        .route("/api/employee/stats", get(employee_stats::<S>))
        .route("/api/employee/attendance", get(employee_attendance::<S>))
        .route("/api/employee/projects", get(employee_projects::<S>))
        .route("/api/admin/approvals", get(pending_approvals::<S>))
        .with_state(services)
}

/// Office endpoints plus health, readiness, and metrics probes.
pub(crate) fn with_office_routes<S>(services: Arc<OfficeServices<S>>) -> Router
where
    S: EntityStore + 'static,
{
    office_router(services)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

async fn submit_leave<S: EntityStore + 'static>(
    State(services): Services<S>,
    body: JsonBody<LeaveSubmission>,
) -> Result<(StatusCode, Json<LeaveRequest>), ApiError> {
    let Json(submission) = body?;
    let request = services.leave.submit(submission)?;
    Ok((StatusCode::CREATED, Json(request)))
}

async fn list_leaves<S: EntityStore + 'static>(
    State(services): Services<S>,
    query: QueryParams<StatusQuery>,
) -> Result<Json<Vec<LeaveRequest>>, ApiError> {
    let Query(query) = query?;
    Ok(Json(services.leave.list_all(query.status()?)?))
}

async fn get_leave<S: EntityStore + 'static>(
    State(services): Services<S>,
    path: IdPath,
) -> Result<Json<LeaveRequest>, ApiError> {
    let Path(id) = path?;
    Ok(Json(services.leave.get(LeaveRequestId(id))?))
}

async fn decide_leave<S: EntityStore + 'static>(
    State(services): Services<S>,
    path: IdPath,
    body: JsonBody<DecisionRequest>,
) -> Result<Json<LeaveRequest>, ApiError> {
    let Path(id) = path?;
    let Json(verdict) = body?;
    Ok(Json(services.leave.decide(LeaveRequestId(id), verdict)?))
}

async fn employee_leaves<S: EntityStore + 'static>(
    State(services): Services<S>,
    query: QueryParams<EmployeeQuery>,
) -> Result<Json<Vec<LeaveRequest>>, ApiError> {
    let Query(query) = query?;
    Ok(Json(services.leave.list_for_employee(&query.employee_id())?))
}

async fn list_rooms<S: EntityStore + 'static>(
    State(services): Services<S>,
) -> Result<Json<Vec<MeetingRoom>>, ApiError> {
    Ok(Json(services.booking.rooms()?))
}

async fn register_room<S: EntityStore + 'static>(
    State(services): Services<S>,
    body: JsonBody<MeetingRoom>,
) -> Result<(StatusCode, Json<MeetingRoom>), ApiError> {
    let Json(room) = body?;
    let room = services.directory.register_room(room)?;
    Ok((StatusCode::CREATED, Json(room)))
}

async fn archive_room<S: EntityStore + 'static>(
    State(services): Services<S>,
    path: KeyPath,
) -> Result<Json<MeetingRoom>, ApiError> {
    let Path(id) = path?;
    Ok(Json(services.directory.archive_room(&RoomId::new(id))?))
}

async fn submit_booking<S: EntityStore + 'static>(
    State(services): Services<S>,
    body: JsonBody<BookingSubmission>,
) -> Result<(StatusCode, Json<Booking>), ApiError> {
    let Json(submission) = body?;
    let booking = services.booking.submit(submission)?;
    Ok((StatusCode::CREATED, Json(booking)))
}

async fn list_bookings<S: EntityStore + 'static>(
    State(services): Services<S>,
    query: QueryParams<StatusQuery>,
) -> Result<Json<Vec<Booking>>, ApiError> {
    let Query(query) = query?;
    Ok(Json(services.booking.list_all(query.status()?)?))
}

async fn get_booking<S: EntityStore + 'static>(
    State(services): Services<S>,
    path: IdPath,
) -> Result<Json<Booking>, ApiError> {
    let Path(id) = path?;
    Ok(Json(services.booking.get(BookingId(id))?))
}

async fn decide_booking<S: EntityStore + 'static>(
    State(services): Services<S>,
    path: IdPath,
    body: JsonBody<DecisionRequest>,
) -> Result<Json<Booking>, ApiError> {
    let Path(id) = path?;
    let Json(verdict) = body?;
    Ok(Json(services.booking.decide(BookingId(id), verdict)?))
}

async fn employee_bookings<S: EntityStore + 'static>(
    State(services): Services<S>,
    query: QueryParams<EmployeeQuery>,
) -> Result<Json<Vec<Booking>>, ApiError> {
    let Query(query) = query?;
    Ok(Json(services.booking.list_for_employee(&query.employee_id())?))
}

async fn list_employees<S: EntityStore + 'static>(
    State(services): Services<S>,
) -> Result<Json<Vec<Employee>>, ApiError> {
    Ok(Json(services.directory.employees()?))
}

async fn register_employee<S: EntityStore + 'static>(
    State(services): Services<S>,
    body: JsonBody<EmployeeRegistration>,
) -> Result<(StatusCode, Json<Employee>), ApiError> {
    let Json(registration) = body?;
    let balance = registration
        .leave_balance
        .unwrap_or(services.default_leave_balance);
    let mut employee = Employee::new(
        registration.id.trim(),
        registration.name.trim(),
        registration.department.trim(),
        balance,
    );
    employee.email = registration
        .email
        .map(|email| email.trim().to_string())
        .filter(|email| !email.is_empty());

    let employee = services.directory.register_employee(employee)?;
    Ok((StatusCode::CREATED, Json(employee)))
}

async fn get_employee<S: EntityStore + 'static>(
    State(services): Services<S>,
    path: KeyPath,
) -> Result<Json<Employee>, ApiError> {
    let Path(id) = path?;
    Ok(Json(services.directory.employee(&EmployeeId::new(id))?))
}

async fn update_employee<S: EntityStore + 'static>(
    State(services): Services<S>,
    path: KeyPath,
    body: JsonBody<EmployeeUpdate>,
) -> Result<Json<Employee>, ApiError> {
    let Path(id) = path?;
    let Json(update) = body?;
    Ok(Json(
        services
            .directory
            .update_employee(&EmployeeId::new(id), update)?,
    ))
}

async fn archive_employee<S: EntityStore + 'static>(
    State(services): Services<S>,
    path: KeyPath,
) -> Result<Json<Employee>, ApiError> {
    let Path(id) = path?;
    Ok(Json(
        services.directory.archive_employee(&EmployeeId::new(id))?,
    ))
}

async fn employee_stats<S: EntityStore + 'static>(
    State(services): Services<S>,
    query: QueryParams<EmployeeQuery>,
) -> Result<Json<EmployeeStats>, ApiError> {
    let Query(query) = query?;
    Ok(Json(services.stats.stats_for(&query.employee_id())?))
}

async fn employee_attendance<S: EntityStore + 'static>(
    State(services): Services<S>,
    query: QueryParams<AttendanceQuery>,
) -> Result<Json<AttendanceSummary>, ApiError> {
    let Query(query) = query?;
    let month = query.month(services.clock.now().date_naive())?;
    let employee_id = EmployeeId::new(query.id.trim());
    Ok(Json(services.stats.attendance_for(&employee_id, month)?))
}

async fn employee_projects<S: EntityStore + 'static>(
    State(services): Services<S>,
    query: QueryParams<EmployeeQuery>,
) -> Result<Json<Vec<ProjectAssignment>>, ApiError> {
    let Query(query) = query?;
    Ok(Json(services.stats.projects_for(&query.employee_id())?))
}

async fn pending_approvals<S: EntityStore + 'static>(
    State(services): Services<S>,
) -> Result<Json<Vec<ApprovalQueueItem>>, ApiError> {
    Ok(Json(services.approvals.pending_approvals()?))
}
