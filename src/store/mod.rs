//! # Record Store
//!
//! The document store facade every handler talks to. Records are flat JSON
//! objects grouped in named [`Collection`]s; a store can query them with a
//! [`Filter`], insert new ones and replace existing ones by `_id`.
//!
//! ## Implementations
//!
//! - [`PgStore`] - PostgreSQL, one JSONB row per record
//! - [`MemoryStore`] - in-process maps, used by tests and local runs
//!
//! ## Store-managed fields
//!
//! Every stored record carries `_id`, `_createdDate` and `_updatedDate`.
//! They are assigned by the store and stripped from client payloads.

mod collection;
mod filter;
mod memory;
mod postgres;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing::debug;

pub use collection::Collection;
pub use filter::Filter;
pub use memory::MemoryStore;
pub use postgres::PgStore;

/// A stored document.
pub type Record = Map<String, Value>;

pub const ID_FIELD: &str = "_id";
pub const CREATED_FIELD: &str = "_createdDate";
pub const UPDATED_FIELD: &str = "_updatedDate";
pub const USER_ID_FIELD: &str = "userId";

/// Fields owned by the store.
pub const MANAGED_FIELDS: [&str; 3] = [ID_FIELD, CREATED_FIELD, UPDATED_FIELD];

/// Errors that can occur during store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),
    #[error("Duplicate value for unique field `{field}` in {collection}")]
    Duplicate {
        collection: Collection,
        field: &'static str,
    },
    #[error("Record has no valid `_id`")]
    MissingId,
    #[error("Record not found")]
    RecordNotFound,
    #[error("Failed to format timestamp: {0}")]
    Timestamp(#[from] time::error::Format),
}

/// Outcome of [`RecordStore::upsert`].
#[derive(Debug, Clone, PartialEq)]
pub enum Upserted {
    Created(Record),
    Updated(Record),
}

/// Trait for document store backends
///
/// Backends implement the three primitive operations; lookups of a single
/// record and the find-then-branch upsert are built on top of them.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Returns all records of `collection` matching `filter`, oldest first.
    async fn query(&self, collection: Collection, filter: &Filter)
    -> Result<Vec<Record>, StoreError>;

    /// Stores `payload` as a new record and returns it with managed fields set.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Duplicate`] if the collection's unique field
    /// already holds the payload's value.
    async fn insert(&self, collection: Collection, payload: Record) -> Result<Record, StoreError>;

    /// Replaces the stored record that has the same `_id`.
    ///
    /// # Errors
    ///
    /// - [`StoreError::MissingId`] - `_id` absent or malformed
    /// - [`StoreError::RecordNotFound`] - no record with that `_id`
    async fn update(&self, collection: Collection, record: Record) -> Result<Record, StoreError>;

    /// Returns the first record matching `filter`, if any.
    async fn find_first(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Option<Record>, StoreError> {
        Ok(self.query(collection, filter).await?.into_iter().next())
    }

    /// Inserts `payload` when nothing matches `filter`, otherwise merges it
    /// into the first match.
    ///
    /// During a merge the payload wins for ordinary fields, while managed
    /// fields and the filter's equality keys of the stored record are kept.
    async fn upsert(
        &self,
        collection: Collection,
        filter: Filter,
        payload: Record,
    ) -> Result<Upserted, StoreError> {
        match self.find_first(collection, &filter).await? {
            Some(existing) => {
                debug!(%collection, "Existing record found, merging payload");
                let merged = merge(existing, payload, &key_fields(&filter));
                Ok(Upserted::Updated(self.update(collection, merged).await?))
            }
            None => {
                debug!(%collection, "No record found, inserting payload");
                Ok(Upserted::Created(self.insert(collection, payload).await?))
            }
        }
    }
}

/// Field names pinned by equality in `filter`.
fn key_fields(filter: &Filter) -> Vec<&str> {
    match filter {
        Filter::Eq(field, _) => vec![field.as_str()],
        Filter::And(filters) => filters.iter().flat_map(key_fields).collect(),
        _ => Vec::new(),
    }
}

fn merge(mut existing: Record, payload: Record, keys: &[&str]) -> Record {
    for (field, value) in payload {
        if MANAGED_FIELDS.contains(&field.as_str()) || keys.contains(&field.as_str()) {
            continue;
        }
        existing.insert(field, value);
    }
    existing
}

/// Current time as an RFC 3339 string.
pub(crate) fn now_rfc3339() -> Result<String, StoreError> {
    Ok(OffsetDateTime::now_utc().format(&Rfc3339)?)
}
