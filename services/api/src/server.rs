use crate::cli::ServeArgs;
use crate::infra::{
    load_cases_file, sample_cases, AppState, InMemoryListingSource, InMemoryProfileStore,
};
use crate::routes::with_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use ijp_match::config::AppConfig;
use ijp_match::error::AppError;
use ijp_match::telemetry;
use ijp_match::workflows::listings::ListingState;
use ijp_match::workflows::onboarding::OnboardingRegistry;
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

    telemetry::init(&config.telemetry, config.environment)?;

    let cases = match &config.listings.cases_file {
        Some(path) => {
            info!(path = %path.display(), "loading cases file");
            load_cases_file(path)?
        }
        None => sample_cases()?,
    };
    let source = Arc::new(InMemoryListingSource::new(cases));
    info!(cases = source.len(), "case board seeded");

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let listings = Arc::new(ListingState::new(source, config.listings.page_size));
    let onboarding = Arc::new(OnboardingRegistry::new(Arc::new(
        InMemoryProfileStore::default(),
    )));

    let app = with_routes(listings, onboarding)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "volunteer matching service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
