use crate::cli::ServeArgs;
use crate::infra::{bootstrap_services, system_clock, AppState};
use crate::routes::with_office_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use officeflow::config::AppConfig;
use officeflow::error::AppError;
use officeflow::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let services = Arc::new(bootstrap_services(&config.directory, system_clock())?);

    let app = with_office_routes(services)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| AppError::Server { addr, source })?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "officeflow api ready");

    axum::serve(listener, app).await?;
    Ok(())
}
