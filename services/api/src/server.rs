use crate::cli::ServeArgs;
use crate::infra::{load_store, AppState};
use crate::routes::with_portal_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use oss_portal::config::AppConfig;
use oss_portal::error::AppError;
use oss_portal::portal::notifications::SeededCounts;
use oss_portal::portal::PortalState;
use oss_portal::telemetry;
use std::sync::atomic::Ordering;
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
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = load_store(&config.portal)?;
    info!(
        applications = store.applications.len(),
        bundles = store.bundles.len(),
        districts = store.districts.len(),
        "fixture store seeded"
    );
    let portal_state = PortalState::new(
        store.shared(),
        SeededCounts::new(config.portal.notification_seed),
        config.portal.reference_date,
    );

    let app = with_portal_routes(portal_state)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "one-stop-service portal ready");

    axum::serve(listener, app).await?;
    Ok(())
}
