pub mod dto;
pub mod errors;
pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;

use handlers::ApiDoc;

use crate::config::TimestampSource;
use crate::storage::Storage;

/// Shared handler state: the injected storage adapter and this deployment's
/// timestamp policy.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub timestamp_source: TimestampSource,
}

pub fn router(state: AppState) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .route("/data", post(handlers::ingest_reading))
        .route("/download/csv", get(handlers::export_csv))
        .with_state(state)
        .split_for_parts();

    router
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route(
            "/api-docs/openapi.json",
            get(move || async move { axum::Json(api) }),
        )
}
