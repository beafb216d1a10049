use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_profile_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use profile_synth::config::AppConfig;
use profile_synth::error::AppError;
use profile_synth::generator_from_config;
use profile_synth::service::ProfileService;
use profile_synth::telemetry;
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

    let generator = generator_from_config(&config)?;
    let service = Arc::new(ProfileService::new(generator));

    let app = with_profile_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "profile generator ready");

    axum::serve(listener, app).await?;
    Ok(())
}
