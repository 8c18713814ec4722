use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use officeflow::config::{DirectoryConfig, DEFAULT_LEAVE_BALANCE};
use officeflow::error::AppError;
use officeflow::workflows::{
    ApprovalQueue, AttendanceLog, BookingWorkflow, Clock, DirectoryImporter, DirectorySeed,
    DirectoryService, Employee, EmployeeId, EntityStore, LeaveWorkflow, MeetingRoom,
    MemoryProjectDirectory, MemoryStore, NoAttendanceLog, ProjectAssignment, ProjectDirectory,
    ProjectStatus, StatsAggregator, StoreError, SystemClock, WorkflowError,
};
use serde_json::json;
use std::fmt;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Every workflow service, sharing one store.
pub(crate) struct OfficeServices<S> {
    pub(crate) leave: LeaveWorkflow<S>,
    pub(crate) booking: BookingWorkflow<S>,
    pub(crate) stats: StatsAggregator<S>,
    pub(crate) approvals: ApprovalQueue<S>,
    pub(crate) directory: DirectoryService<S>,
    pub(crate) clock: Arc<dyn Clock>,
    /// Balance granted to employees registered over HTTP without an explicit one.
    pub(crate) default_leave_balance: u32,
}

impl<S> OfficeServices<S>
where
    S: EntityStore + 'static,
{
    pub(crate) fn new(
        store: Arc<S>,
        clock: Arc<dyn Clock>,
        projects: Arc<dyn ProjectDirectory>,
        attendance: Arc<dyn AttendanceLog>,
    ) -> Self {
        Self {
            leave: LeaveWorkflow::with_clock(store.clone(), clock.clone()),
            booking: BookingWorkflow::with_clock(store.clone(), clock.clone()),
            stats: StatsAggregator::with_sources(store.clone(), projects, attendance),
            approvals: ApprovalQueue::new(store.clone()),
            directory: DirectoryService::with_clock(store, clock.clone()),
            clock,
            default_leave_balance: DEFAULT_LEAVE_BALANCE,
        }
    }

    pub(crate) fn with_default_leave_balance(mut self, days: u32) -> Self {
        self.default_leave_balance = days;
        self
    }
}

/// Build the in-memory service stack, seeded from `APP_SEED_DIR` when configured and from
/// the bundled sample directory otherwise.
pub(crate) fn bootstrap_services(
    config: &DirectoryConfig,
    clock: Arc<dyn Clock>,
) -> Result<OfficeServices<MemoryStore>, AppError> {
    let seed = match &config.seed_dir {
        Some(dir) => {
            info!(seed_dir = %dir.display(), "loading directory seed files");
            DirectoryImporter::new(config.default_leave_balance).from_dir(dir)?
        }
        None => sample_directory(config.default_leave_balance),
    };

    let store = Arc::new(MemoryStore::new());
    let projects = Arc::new(MemoryProjectDirectory::new());
    seed.load_into(store.as_ref(), &projects)?;

    Ok(
        OfficeServices::new(store, clock, projects, Arc::new(NoAttendanceLog))
            .with_default_leave_balance(config.default_leave_balance),
    )
}

pub(crate) fn system_clock() -> Arc<dyn Clock> {
    Arc::new(SystemClock)
}

/// Small directory used when no seed files are configured.
pub(crate) fn sample_directory(default_leave_balance: u32) -> DirectorySeed {
    let mut ada = Employee::new("E001", "Ada Lovelace", "Engineering", 10);
    ada.email = Some("ada.lovelace@example.com".to_string());
    let grace = Employee::new("E002", "Grace Hopper", "Operations", default_leave_balance);
    let alan = Employee::new("E003", "Alan Turing", "Research", default_leave_balance);

    let mut harbour = MeetingRoom::new("R1", "Harbour", 6);
    harbour.location = Some("Level 2".to_string());
    let summit = MeetingRoom::new("R2", "Summit", 12);

    let atlas = ProjectAssignment {
        project_id: "P100".to_string(),
        name: "Atlas payroll migration".to_string(),
        status: ProjectStatus::Active,
        role: Some("Tech lead".to_string()),
        end_date: NaiveDate::from_ymd_opt(2026, 3, 31),
    };
    let beacon = ProjectAssignment {
        project_id: "P200".to_string(),
        name: "Beacon onboarding portal".to_string(),
        status: ProjectStatus::Completed,
        role: None,
        end_date: NaiveDate::from_ymd_opt(2025, 6, 30),
    };

    DirectorySeed {
        employees: vec![ada, grace, alan],
        rooms: vec![harbour, summit],
        assignments: vec![
            (EmployeeId::new("E001"), atlas),
            (EmployeeId::new("E001"), beacon),
        ],
    }
}

/// Error returned by HTTP handlers, rendered as `{"error": "..."}`.
#[derive(Debug)]
pub(crate) enum ApiError {
    Workflow(WorkflowError),
    BadRequest(String),
}

impl ApiError {
    pub(crate) fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Workflow(err) => match err {
                WorkflowError::Validation(_) | WorkflowError::InsufficientBalance { .. } => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                WorkflowError::NotFound { .. } => StatusCode::NOT_FOUND,
                WorkflowError::InvalidState { .. } | WorkflowError::Conflict { .. } => {
                    StatusCode::CONFLICT
                }
                WorkflowError::Store(StoreError::DuplicateId { .. }) => StatusCode::CONFLICT,
                WorkflowError::Store(StoreError::Unavailable(_)) | WorkflowError::Source(_) => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
                WorkflowError::Store(StoreError::NotFound { .. }) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Workflow(err) => write!(f, "{}", err),
            ApiError::BadRequest(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Workflow(err) => Some(err),
            ApiError::BadRequest(_) => None,
        }
    }
}

impl From<WorkflowError> for ApiError {
    fn from(value: WorkflowError) -> Self {
        Self::Workflow(value)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        Self::BadRequest(value.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(value: QueryRejection) -> Self {
        Self::BadRequest(value.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(value: PathRejection) -> Self {
        Self::BadRequest(value.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
