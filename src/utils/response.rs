//! # Response Envelope
//!
//! Every endpoint answers with a JSON object carrying the numeric `status`
//! plus either a `message` or one or more named payload fields, e.g.
//!
//! ```json
//! { "status": 200, "healthMetrics": { "userId": "...", "sleep": 8 } }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::AppResult;

/// Builder for the `{ status, ... }` envelope.
#[derive(Debug)]
pub struct Reply {
    status: StatusCode,
    body: Map<String, Value>,
}

impl Reply {
    pub fn new(status: StatusCode) -> Self {
        let mut body = Map::new();
        body.insert("status".to_string(), Value::from(status.as_u16()));
        Self { status, body }
    }

    #[inline]
    pub fn ok() -> Self {
        Self::new(StatusCode::OK)
    }

    /// Adds the human readable `message` field.
    pub fn message(mut self, message: &str) -> Self {
        self.body
            .insert("message".to_string(), Value::String(message.to_string()));
        self
    }

    /// Adds a named payload field.
    ///
    /// # Errors
    ///
    /// Fails only if `value` cannot be represented as JSON.
    pub fn with(mut self, key: &str, value: impl Serialize) -> AppResult<Self> {
        self.body
            .insert(key.to_string(), serde_json::to_value(value)?);
        Ok(self)
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        (self.status, Json(Value::Object(self.body))).into_response()
    }
}
