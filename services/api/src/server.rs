use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryDataService};
use crate::routes::{with_site_routes, SiteServices};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use chrono::Local;
use domizil::booking::BookingService;
use domizil::config::AppConfig;
use domizil::contact::ContactService;
use domizil::error::AppError;
use domizil::reviews::ReviewBoard;
use domizil::telemetry;
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

    let language = config.site.language;
    let remote = Arc::new(InMemoryDataService::default());
    let services = SiteServices {
        booking: Arc::new(BookingService::new(
            remote.clone(),
            language,
            Local::now().date_naive(),
        )),
        reviews: Arc::new(ReviewBoard::new(remote.clone(), language)),
        contact: Arc::new(ContactService::new(remote, language)),
    };

    let app = with_site_routes(services)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, language = language.code(), "residence booking service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
