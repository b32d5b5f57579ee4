use async_trait::async_trait;
use chrono::DateTime;
use futures::TryStreamExt;
use mongodb::bson::{self, doc, oid::ObjectId};
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};

use crate::config::MongoConfig;

use super::{NewReading, ReadingId, Storage, StorageError, StoredReading};

const COLLECTION: &str = "sensor_data";

/// Document adapter. The driver's `Client` pools connections internally;
/// no connection work happens per request.
pub struct MongoStorage {
    collection: Collection<SensorDocument>,
}

/// Stored document layout. Field names match the pre-existing collection
/// (`temp`, not `temperature`), so old and new writers coexist.
#[derive(Debug, Serialize, Deserialize)]
struct SensorDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    temp: f64,
    humidity: f64,
    device_id: String,
    timestamp: bson::DateTime,
}

impl From<SensorDocument> for StoredReading {
    fn from(d: SensorDocument) -> Self {
        Self {
            id: ReadingId::Key(d.id.map(|oid| oid.to_hex()).unwrap_or_default()),
            device_id: d.device_id,
            temperature: d.temp,
            humidity: d.humidity,
            recorded_at: DateTime::from_timestamp_millis(d.timestamp.timestamp_millis())
                .unwrap_or_default(),
        }
    }
}

impl MongoStorage {
    pub async fn connect(config: &MongoConfig) -> Result<Self, StorageError> {
        let client = Client::with_uri_str(config.uri()).await?;
        let collection = client.database(&config.database).collection(COLLECTION);
        Ok(Self { collection })
    }
}

#[async_trait]
impl Storage for MongoStorage {
    async fn insert(&self, reading: NewReading) -> Result<ReadingId, StorageError> {
        let timestamp = match reading.recorded_at {
            Some(at) => bson::DateTime::from_millis(at.timestamp_millis()),
            None => bson::DateTime::now(),
        };

        let document = SensorDocument {
            id: None,
            temp: reading.temperature,
            humidity: reading.humidity,
            device_id: reading.device_id,
            timestamp,
        };

        let result = self.collection.insert_one(document).await?;
        let id = match result.inserted_id.as_object_id() {
            Some(oid) => oid.to_hex(),
            None => result.inserted_id.to_string(),
        };

        Ok(ReadingId::Key(id))
    }

    async fn list_all(&self) -> Result<Vec<StoredReading>, StorageError> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "timestamp": -1 })
            .await?;

        let documents: Vec<SensorDocument> = cursor.try_collect().await?;
        Ok(documents.into_iter().map(Into::into).collect())
    }
}
