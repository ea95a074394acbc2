//! Helpers that turn client JSON into records the store will accept.

use serde_json::Value;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::store::{MANAGED_FIELDS, Record, USER_ID_FIELD};

/// Accepts a JSON object and drops every store-managed field from it.
pub fn into_record(value: Value) -> AppResult<Record> {
    let Value::Object(mut record) = value else {
        return Err(AppError::BadRequest("Payload must be a JSON object"));
    };
    for field in MANAGED_FIELDS {
        record.remove(field);
    }
    Ok(record)
}

/// Like [`into_record`], then stamps the record with the owner's id.
///
/// Any `userId` sent by the client is overwritten.
pub fn owned_record(value: Value, user_id: &Uuid) -> AppResult<Record> {
    let mut record = into_record(value)?;
    record.insert(USER_ID_FIELD.to_string(), Value::String(user_id.to_string()));
    Ok(record)
}
