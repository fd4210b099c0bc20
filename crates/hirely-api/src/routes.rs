//! API routes.

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, patch, post, put};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::{
    apply_to_job, check_access, create_company, create_job, delete_job, get_job, health,
    job_analytics, list_companies, list_jobs, list_saved, my_jobs, ready, set_saved,
    toggle_saved, update_application_status, update_hiring_status,
};
use crate::metrics::metrics_middleware;
use crate::middleware::{cors_layer, request_id, request_logging, security_headers};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let job_routes = Router::new()
        .route("/jobs", get(list_jobs).post(create_job))
        .route("/jobs/:job_id", get(get_job).delete(delete_job))
        .route("/jobs/:job_id/hiring-status", patch(update_hiring_status))
        .route("/jobs/:job_id/analytics", get(job_analytics))
        .route("/jobs/:job_id/applications", post(apply_to_job))
        .route("/my-jobs", get(my_jobs));

    let saved_routes = Router::new()
        .route("/jobs/:job_id/save", post(toggle_saved))
        .route("/jobs/:job_id/saved", put(set_saved))
        .route("/saved-jobs", get(list_saved));

    let application_routes = Router::new().route(
        "/applications/:application_id/status",
        patch(update_application_status),
    );

    let company_routes =
        Router::new().route("/companies", get(list_companies).post(create_company));

    let api_routes = Router::new()
        .merge(job_routes)
        .merge(saved_routes)
        .merge(application_routes)
        .merge(company_routes)
        .route("/access", get(check_access));

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready));

    // Metrics endpoint (if enabled)
    let metrics_routes = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        // Uploads are bounded by the body limit layer instead of axum's 2MB default
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
