use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use tracing::{debug, instrument, trace};
use uuid::Uuid;

use super::{
    CREATED_FIELD, Collection, Filter, ID_FIELD, Record, RecordStore, StoreError, UPDATED_FIELD,
    now_rfc3339,
};

/// In-process record store
///
/// Keeps each collection as a vector in insertion order. Uniqueness checks
/// and the write they guard run under the same map shard lock, so two
/// concurrent inserts of one email cannot both succeed. Unique string values
/// are compared ignoring case, like the `lower(...)` index in PostgreSQL.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: DashMap<Collection, Vec<Record>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently held in `collection`.
    pub fn count(&self, collection: Collection) -> usize {
        self.collections
            .get(&collection)
            .map(|records| records.len())
            .unwrap_or(0)
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    #[instrument(skip(self, filter), fields(collection = %collection))]
    async fn query(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Vec<Record>, StoreError> {
        let matched: Vec<Record> = self
            .collections
            .get(&collection)
            .map(|records| {
                records
                    .iter()
                    .filter(|record| filter.matches(record))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        trace!(matched = matched.len(), "Query evaluated");
        Ok(matched)
    }

    #[instrument(skip(self, payload), fields(collection = %collection))]
    async fn insert(
        &self,
        collection: Collection,
        mut payload: Record,
    ) -> Result<Record, StoreError> {
        let now = now_rfc3339()?;
        payload.insert(ID_FIELD.to_string(), Value::String(Uuid::new_v4().to_string()));
        payload.insert(CREATED_FIELD.to_string(), Value::String(now.clone()));
        payload.insert(UPDATED_FIELD.to_string(), Value::String(now));

        let mut records = self.collections.entry(collection).or_default();

        if let Some(field) = collection.unique_field()
            && let Some(value) = payload.get(field)
            && records
                .iter()
                .any(|record| record.get(field).is_some_and(|stored| same_key(stored, value)))
        {
            debug!(field, "Rejected duplicate value");
            return Err(StoreError::Duplicate { collection, field });
        }

        records.push(payload.clone());
        trace!("Record inserted");
        Ok(payload)
    }

    #[instrument(skip(self, record), fields(collection = %collection))]
    async fn update(
        &self,
        collection: Collection,
        mut record: Record,
    ) -> Result<Record, StoreError> {
        let id = record
            .get(ID_FIELD)
            .and_then(Value::as_str)
            .and_then(|id| Uuid::try_parse(id).ok())
            .ok_or(StoreError::MissingId)?
            .to_string();

        let mut records = self
            .collections
            .get_mut(&collection)
            .ok_or(StoreError::RecordNotFound)?;
        let slot = records
            .iter_mut()
            .find(|stored| stored.get(ID_FIELD).and_then(Value::as_str) == Some(id.as_str()))
            .ok_or(StoreError::RecordNotFound)?;

        if let Some(created) = slot.get(CREATED_FIELD) {
            record.insert(CREATED_FIELD.to_string(), created.clone());
        }
        record.insert(UPDATED_FIELD.to_string(), Value::String(now_rfc3339()?));

        *slot = record.clone();
        trace!(record_id = %id, "Record replaced");
        Ok(record)
    }
}

fn same_key(stored: &Value, candidate: &Value) -> bool {
    match (stored.as_str(), candidate.as_str()) {
        (Some(stored), Some(candidate)) => stored.to_lowercase() == candidate.to_lowercase(),
        _ => stored == candidate,
    }
}
