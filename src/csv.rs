use chrono::{DateTime, Utc};

use crate::storage::StoredReading;

/// Fixed header line of every export.
pub const HEADER: &str = "Device ID,Temperature (°C),Humidity (%),Timestamp";

/// Render format for reading timestamps. Client-supplied timestamps are
/// accepted in the same shape.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render `readings` (already ordered by the caller) into the export
/// document: the fixed header plus one newline-terminated line per reading.
///
/// Field values are not escaped; device ids are assumed comma-free.
pub fn render(readings: &[StoredReading]) -> String {
    let mut out = String::with_capacity(HEADER.len() + 1 + readings.len() * 48);
    out.push_str(HEADER);
    out.push('\n');

    for reading in readings {
        out.push_str(&format!(
            "{},{},{},{}\n",
            reading.device_id,
            format_value(reading.temperature),
            format_value(reading.humidity),
            reading.recorded_at.format(TIMESTAMP_FORMAT),
        ));
    }

    out
}

/// Format a measurement for the export: integral values keep a trailing
/// `.0` (`55.0`, not `55`), fractional values render shortest-round-trip
/// (`22.5`).
pub fn format_value(value: f64) -> String {
    let s = value.to_string();
    if s.contains('.') {
        s
    } else {
        format!("{s}.0")
    }
}

/// Attachment filename for an export generated at `now`.
pub fn export_filename(now: DateTime<Utc>) -> String {
    format!("sensor_data_export_{}.csv", now.format("%Y%m%d_%H%M%S"))
}
