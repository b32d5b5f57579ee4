use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool};

use super::{NewReading, ReadingId, Storage, StorageError, StoredReading};

/// Relational adapter. Holds a connection pool built once at startup; the
/// schema lives in `./migrations` and is provisioned externally.
pub struct PgStorage {
    pool: PgPool,
}

#[derive(FromRow)]
struct ReadingRow {
    id: i64,
    device_id: String,
    temperature: f64,
    humidity: f64,
    recorded_at: DateTime<Utc>,
}

impl From<ReadingRow> for StoredReading {
    fn from(r: ReadingRow) -> Self {
        Self {
            id: ReadingId::Serial(r.id),
            device_id: r.device_id,
            temperature: r.temperature,
            humidity: r.humidity,
            recorded_at: r.recorded_at,
        }
    }
}

impl PgStorage {
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    /// Wrap an existing pool (used by `#[sqlx::test]`).
    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Storage for PgStorage {
    async fn insert(&self, reading: NewReading) -> Result<ReadingId, StorageError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO sensor_readings (device_id, temperature, humidity, recorded_at) \
             VALUES ($1, $2, $3, COALESCE($4, now())) \
             RETURNING id",
        )
        .bind(&reading.device_id)
        .bind(reading.temperature)
        .bind(reading.humidity)
        .bind(reading.recorded_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(ReadingId::Serial(id))
    }

    async fn list_all(&self) -> Result<Vec<StoredReading>, StorageError> {
        let rows: Vec<ReadingRow> = sqlx::query_as(
            "SELECT id, device_id, temperature, humidity, recorded_at \
             FROM sensor_readings \
             ORDER BY recorded_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
