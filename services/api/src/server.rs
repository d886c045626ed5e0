use crate::cli::ServeArgs;
use crate::demo::{demo_annotations, demo_records};
use crate::infra::{AppState, InMemoryInsightGateway};
use crate::routes::app_router;
use axum_prometheus::PrometheusMetricLayer;
use comps_ai::config::AppConfig;
use comps_ai::error::AppError;
use comps_ai::telemetry;
use comps_ai::workflows::comps::ComparablePipeline;
use comps_ai::workflows::media::InsightFetcher;
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

    let insights = seeded_demo_gateway();
    let fetcher = InsightFetcher::new(config.media.insight_delay());
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        media: config.media.clone(),
        insights: Arc::new(insights),
        fetcher,
    };

    let app = app_router(app_state).layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "comparable market engine ready");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Stand-in gateway wired at startup; a deployment swaps in the real
/// provider client behind the same trait.
fn seeded_demo_gateway() -> InMemoryInsightGateway {
    let gateway = InMemoryInsightGateway::default();
    let set = ComparablePipeline::from_values(demo_records());
    for comparable in &set.comparables {
        if comparable.photos.is_empty() {
            continue;
        }
        if let Some(mls_number) = &comparable.mls_number {
            gateway.seed(mls_number, demo_annotations(&comparable.photos));
        }
    }
    gateway
}
