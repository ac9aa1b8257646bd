use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemorySessionStore};
use crate::routes::app_router;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use lifestyle_checker::config::{AppConfig, UpstreamConfig};
use lifestyle_checker::error::AppError;
use lifestyle_checker::proxy::{ReqwestTransport, UpstreamProxy};
use lifestyle_checker::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(url) = args.upstream_url.take() {
        config.upstream = UpstreamConfig::new(url, config.upstream.api_key.clone());
    }

    telemetry::init(&config.telemetry)?;

    if !config.upstream.is_configured() {
        warn!("API_BASE_URL is not set; every login will fail with a server error");
    }

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let proxy = Arc::new(UpstreamProxy::new(
        config.upstream.clone(),
        ReqwestTransport::default(),
    ));
    let sessions = InMemorySessionStore::default();

    let app = app_router(proxy, sessions)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, upstream = ?config.upstream, "lifestyle checker ready");

    axum::serve(listener, app).await?;
    Ok(())
}
