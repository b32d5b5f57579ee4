pub mod models;
pub mod mongo;
pub mod postgres;

#[cfg(test)]
pub mod memory;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

use crate::config::StorageConfig;

pub use models::{NewReading, ReadingId, StoredReading};

/// Fault raised by a backend on any connectivity, write or read problem.
/// Faults are never retried; the request that hit one fails.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("relational store error: {0}")]
    Postgres(#[from] sqlx::Error),

    #[error("document store error: {0}")]
    Mongo(#[from] mongodb::error::Error),
}

/// Persistence capability required by the HTTP layer: one insert, one
/// newest-first scan. The adapter is injected at startup, so tests can
/// substitute an in-memory implementation for a live database.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write one reading and return the backend-assigned id.
    ///
    /// A reading without `recorded_at` is stamped with the current instant
    /// at write time.
    async fn insert(&self, reading: NewReading) -> Result<ReadingId, StorageError>;

    /// Every stored reading, ordered by timestamp descending (most recent
    /// first). An empty store yields an empty vector.
    async fn list_all(&self) -> Result<Vec<StoredReading>, StorageError>;
}

/// Build the storage adapter selected by `config`.
pub async fn connect(config: &StorageConfig) -> Result<Arc<dyn Storage>> {
    match config {
        StorageConfig::Postgres { database_url } => {
            Ok(Arc::new(postgres::PgStorage::connect(database_url).await?))
        }
        StorageConfig::Mongo(cfg) => Ok(Arc::new(mongo::MongoStorage::connect(cfg).await?)),
    }
}
