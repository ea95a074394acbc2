use async_trait::async_trait;
use serde_json::Value;
use sqlx::{PgPool, Postgres, QueryBuilder, types::Json};
use tracing::{debug, error, instrument, trace};
use uuid::Uuid;

use super::{
    CREATED_FIELD, Collection, Filter, ID_FIELD, Record, RecordStore, StoreError, UPDATED_FIELD,
    now_rfc3339,
};

/// PostgreSQL record store
///
/// All collections share the `records` table created by the migrations in
/// `migrations/`; the document body lives in the `data` JSONB column and
/// mirrors the row id in its `_id` field.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the embedded migrations.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!().run(&self.pool).await
    }
}

#[async_trait]
impl RecordStore for PgStore {
    #[instrument(skip(self, filter), fields(collection = %collection))]
    async fn query(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Vec<Record>, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT data FROM records WHERE collection = ");
        qb.push_bind(collection.as_str());
        qb.push(" AND ");
        filter.push_sql(&mut qb);
        qb.push(" ORDER BY created_at, id");

        let rows: Vec<(Json<Record>,)> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .inspect_err(|e| error!(error = %e, "Record query failed"))?;

        trace!(matched = rows.len(), "Query evaluated");
        Ok(rows.into_iter().map(|(Json(record),)| record).collect())
    }

    #[instrument(skip(self, payload), fields(collection = %collection))]
    async fn insert(
        &self,
        collection: Collection,
        mut payload: Record,
    ) -> Result<Record, StoreError> {
        let id = Uuid::new_v4();
        let now = now_rfc3339()?;
        payload.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
        payload.insert(CREATED_FIELD.to_string(), Value::String(now.clone()));
        payload.insert(UPDATED_FIELD.to_string(), Value::String(now));

        let result = sqlx::query("INSERT INTO records (id, collection, data) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(collection.as_str())
            .bind(Json(&payload))
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => {
                trace!(record_id = %id, "Record inserted");
                Ok(payload)
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                let field = collection.unique_field().unwrap_or(ID_FIELD);
                debug!(field, "Rejected duplicate value");
                Err(StoreError::Duplicate { collection, field })
            }
            Err(e) => {
                error!(error = %e, "Record insert failed");
                Err(StoreError::Db(e))
            }
        }
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
            .ok_or(StoreError::MissingId)?;

        record.insert(UPDATED_FIELD.to_string(), Value::String(now_rfc3339()?));

        // Keep the creation stamp of the stored row even if the caller dropped it.
        let updated: Option<(Json<Record>,)> = sqlx::query_as(
            r#"
            UPDATE records
            SET data = $1 || jsonb_build_object('_createdDate', data -> '_createdDate'),
                updated_at = NOW()
            WHERE collection = $2 AND id = $3
            RETURNING data
            "#,
        )
        .bind(Json(&record))
        .bind(collection.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .inspect_err(|e| error!(error = %e, "Record update failed"))?;

        match updated {
            Some((Json(stored),)) => {
                trace!(record_id = %id, "Record replaced");
                Ok(stored)
            }
            None => {
                debug!(record_id = %id, "No record to update");
                Err(StoreError::RecordNotFound)
            }
        }
    }
}
