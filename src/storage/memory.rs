use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{NewReading, ReadingId, Storage, StorageError, StoredReading};

/// In-memory stand-in for a real backend, used by handler tests.
///
/// Assigns serial ids like the relational backend and applies the same
/// newest-first ordering on reads.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<RwLock<Vec<StoredReading>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored readings, for "performs no write" assertions.
    pub async fn count(&self) -> usize {
        self.inner.read().await.len()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn insert(&self, reading: NewReading) -> Result<ReadingId, StorageError> {
        let mut readings = self.inner.write().await;
        let id = ReadingId::Serial(readings.len() as i64 + 1);
        readings.push(StoredReading {
            id: id.clone(),
            device_id: reading.device_id,
            temperature: reading.temperature,
            humidity: reading.humidity,
            recorded_at: reading.recorded_at.unwrap_or_else(Utc::now),
        });
        Ok(id)
    }

    async fn list_all(&self) -> Result<Vec<StoredReading>, StorageError> {
        let mut readings = self.inner.read().await.clone();
        readings.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        Ok(readings)
    }
}

/// Fails every operation; exercises the 500 paths without a database.
#[derive(Clone, Default)]
pub struct FailingStorage;

#[async_trait]
impl Storage for FailingStorage {
    async fn insert(&self, _reading: NewReading) -> Result<ReadingId, StorageError> {
        Err(StorageError::Postgres(sqlx::Error::PoolClosed))
    }

    async fn list_all(&self) -> Result<Vec<StoredReading>, StorageError> {
        Err(StorageError::Postgres(sqlx::Error::PoolClosed))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn reading(device_id: &str, temperature: f64, humidity: f64) -> NewReading {
        NewReading {
            device_id: device_id.to_owned(),
            temperature,
            humidity,
            recorded_at: None,
        }
    }

    #[tokio::test]
    async fn empty_storage_lists_nothing() {
        let storage = MemoryStorage::new();
        assert!(storage.list_all().await.unwrap().is_empty());
        assert_eq!(storage.count().await, 0);
    }

    #[tokio::test]
    async fn insert_assigns_serial_ids() {
        let storage = MemoryStorage::new();
        let first = storage.insert(reading("dev1", 21.0, 40.0)).await.unwrap();
        let second = storage.insert(reading("dev1", 22.0, 41.0)).await.unwrap();
        assert_eq!(first, ReadingId::Serial(1));
        assert_eq!(second, ReadingId::Serial(2));
    }

    #[tokio::test]
    async fn list_all_is_newest_first() {
        let storage = MemoryStorage::new();
        let t1 = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2024, 1, 15, 11, 0, 0).unwrap();

        storage
            .insert(NewReading { recorded_at: Some(t1), ..reading("dev1", 20.0, 50.0) })
            .await
            .unwrap();
        storage
            .insert(NewReading { recorded_at: Some(t2), ..reading("dev1", 21.0, 51.0) })
            .await
            .unwrap();

        let all = storage.list_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].recorded_at, t2);
        assert_eq!(all[1].recorded_at, t1);
    }

    #[tokio::test]
    async fn missing_timestamp_is_stamped_at_write_time() {
        let storage = MemoryStorage::new();
        storage.insert(reading("dev1", 19.5, 55.0)).await.unwrap();

        let all = storage.list_all().await.unwrap();
        assert!(all[0].recorded_at > Utc::now() - Duration::seconds(5));
    }

    #[tokio::test]
    async fn failing_storage_fails_both_operations() {
        let storage = FailingStorage;
        assert!(storage.insert(reading("dev1", 20.0, 50.0)).await.is_err());
        assert!(storage.list_all().await.is_err());
    }
}
