use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use ijp_match::workflows::listings::{listing_router, ListingSource, ListingState};
use ijp_match::workflows::onboarding::{onboarding_router, OnboardingRegistry, ProfileStore};
use serde_json::json;
use std::sync::Arc;

/// Case board and onboarding routers plus the operational endpoints.
pub(crate) fn with_routes<L, P>(
    listings: Arc<ListingState<L>>,
    onboarding: Arc<OnboardingRegistry<P>>,
) -> axum::Router
where
    L: ListingSource + 'static,
    P: ProfileStore + 'static,
{
    listing_router(listings)
        .merge(onboarding_router(onboarding))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let (status, label) = if ready {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "initializing")
    };

    (status, Json(json!({ "status": label })))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
