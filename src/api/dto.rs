use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::errors::ApiError;
use crate::config::TimestampSource;
use crate::csv::TIMESTAMP_FORMAT;
use crate::storage::{NewReading, ReadingId};

/// Device id recorded when the payload does not name one.
pub const DEFAULT_DEVICE_ID: &str = "sensor_001";

/// Inbound payload of `POST /data`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct NewReadingRequest {
    /// Degrees Celsius.
    pub temperature: f64,
    /// Relative humidity percentage.
    pub humidity: f64,
    #[serde(default = "default_device_id")]
    pub device_id: String,
    /// Reading instant as `YYYY-MM-DD HH:MM:SS` (UTC). Required when the
    /// server is configured for client timestamps, ignored otherwise.
    pub timestamp: Option<String>,
}

fn default_device_id() -> String {
    DEFAULT_DEVICE_ID.to_owned()
}

impl NewReadingRequest {
    /// Validate and normalize the payload into a write request. Pure: no
    /// storage access, no clock reads.
    pub fn into_reading(self, source: TimestampSource) -> Result<NewReading, ApiError> {
        let recorded_at = match source {
            TimestampSource::Server => None,
            TimestampSource::Client => {
                let raw = self
                    .timestamp
                    .as_deref()
                    .ok_or_else(|| ApiError::Validation("timestamp is required".to_owned()))?;
                let parsed = NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).map_err(|_| {
                    ApiError::Validation(format!(
                        "timestamp must be formatted as YYYY-MM-DD HH:MM:SS, got {raw:?}"
                    ))
                })?;
                Some(parsed.and_utc())
            }
        };

        Ok(NewReading {
            device_id: self.device_id,
            temperature: self.temperature,
            humidity: self.humidity,
            recorded_at,
        })
    }
}

/// Success envelope of `POST /data`.
#[derive(Debug, Serialize, ToSchema)]
pub struct IngestResponse {
    pub status: &'static str,
    pub message: String,
    /// Backend-assigned id: a number on the relational backend, an ObjectId
    /// hex string on the document backend.
    pub id: ReadingId,
}

impl IngestResponse {
    pub fn stored(device_id: &str, id: ReadingId) -> Self {
        Self {
            status: "success",
            message: format!("Data received and stored from {device_id}"),
            id,
        }
    }
}
