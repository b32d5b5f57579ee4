use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Backend-assigned identifier of a stored reading.
///
/// The relational backend hands out auto-increment integers, the document
/// backend ObjectId hex strings. Serializes untagged, so the ingest response
/// carries a JSON number or a JSON string depending on the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum ReadingId {
    Serial(i64),
    Key(String),
}

impl fmt::Display for ReadingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadingId::Serial(n) => write!(f, "{n}"),
            ReadingId::Key(k) => f.write_str(k),
        }
    }
}

/// A validated reading ready to be written.
///
/// `recorded_at: None` means the backend stamps the reading with the current
/// instant at write time.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReading {
    pub device_id: String,
    pub temperature: f64,
    pub humidity: f64,
    pub recorded_at: Option<DateTime<Utc>>,
}

/// A reading as persisted by one of the backends.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredReading {
    pub id: ReadingId,
    pub device_id: String,
    pub temperature: f64,
    pub humidity: f64,
    pub recorded_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serial_id_serializes_as_number() {
        let json = serde_json::to_value(ReadingId::Serial(42)).unwrap();
        assert_eq!(json, serde_json::json!(42));
    }

    #[test]
    fn key_id_serializes_as_string() {
        let json = serde_json::to_value(ReadingId::Key("65f1c0ffee".into())).unwrap();
        assert_eq!(json, serde_json::json!("65f1c0ffee"));
    }

    #[test]
    fn display_matches_wire_form() {
        assert_eq!(ReadingId::Serial(7).to_string(), "7");
        assert_eq!(ReadingId::Key("abc123".into()).to_string(), "abc123");
    }
}
