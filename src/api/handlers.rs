use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use tracing::info;
use utoipa::OpenApi;

use super::{
    dto::{IngestResponse, NewReadingRequest},
    errors::ApiError,
    AppState,
};
use crate::csv;

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Accept one temperature/humidity reading and persist it.
#[utoipa::path(
    post,
    path = "/data",
    request_body = NewReadingRequest,
    responses(
        (status = 200, description = "Reading stored", body = IngestResponse),
        (status = 400, description = "Missing or malformed field"),
        (status = 500, description = "Storage fault"),
    ),
    tag = "telemetry"
)]
pub async fn ingest_reading(
    State(state): State<AppState>,
    payload: Result<Json<NewReadingRequest>, JsonRejection>,
) -> Result<Json<IngestResponse>, ApiError> {
    // A bad body is a client error here, not axum's default 422.
    let Json(payload) = payload.map_err(|e| ApiError::Validation(e.body_text()))?;
    let reading = payload.into_reading(state.timestamp_source)?;

    let device_id = reading.device_id.clone();
    let (temperature, humidity) = (reading.temperature, reading.humidity);

    let id = state
        .storage
        .insert(reading)
        .await
        .map_err(|e| ApiError::storage("Error storing sensor data", e))?;

    info!(device_id = %device_id, temperature, humidity, id = %id, "Stored sensor reading");

    Ok(Json(IngestResponse::stored(&device_id, id)))
}

/// Download every stored reading as a CSV attachment, newest first.
#[utoipa::path(
    get,
    path = "/download/csv",
    responses(
        (status = 200, description = "CSV document", content_type = "text/csv"),
        (status = 404, description = "No readings stored"),
        (status = 500, description = "Storage fault"),
    ),
    tag = "telemetry"
)]
pub async fn export_csv(State(state): State<AppState>) -> Result<Response, ApiError> {
    let readings = state
        .storage
        .list_all()
        .await
        .map_err(|e| ApiError::storage("Error creating CSV export", e))?;

    if readings.is_empty() {
        return Err(ApiError::NotFound("No data found"));
    }

    info!(readings = readings.len(), "Rendering CSV export");

    let disposition = format!("attachment; filename={}", csv::export_filename(Utc::now()));
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_owned()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv::render(&readings),
    )
        .into_response())
}

// ---------------------------------------------------------------------------
// Health check / root
// ---------------------------------------------------------------------------

/// Liveness probe for the deployment platform. Never touches storage.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up")),
    tag = "system"
)]
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy", "timestamp": Utc::now() }))
}

/// Static service banner.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service description")),
    tag = "system"
)]
pub async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Sensor Data API is running" }))
}

// ---------------------------------------------------------------------------
// OpenAPI spec
// ---------------------------------------------------------------------------

#[derive(OpenApi)]
#[openapi(
    paths(ingest_reading, export_csv, health, root),
    components(schemas(NewReadingRequest, IngestResponse)),
    tags(
        (name = "telemetry", description = "Reading ingestion and CSV export"),
        (name = "system", description = "System endpoints"),
    ),
    info(
        title = "Sensor Data API",
        version = "0.1.0",
        description = "HTTP ingestion endpoint for temperature/humidity telemetry"
    )
)]
pub struct ApiDoc;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
