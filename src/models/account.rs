//! # Account Types
//!
//! Accounts are stored as records in the `Users` collection. This module
//! gives them a typed shape and keeps the password hash away from anything
//! that is sent back to a client.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::store::Record;

pub const EMAIL_FIELD: &str = "email";
pub const PASSWORD_HASH_FIELD: &str = "passwordHash";
pub const ROLE_FIELD: &str = "role";

/// Who an account belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The young person whose health data is tracked
    Adolescent,
    /// A parent or carer who may request access to an adolescent's data
    Guardian,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let role_str = match self {
            Role::Adolescent => "adolescent",
            Role::Guardian => "guardian",
        };
        write!(f, "{role_str}")
    }
}

/// A stored account including its credentials.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    /// Any further settings stored on the account.
    #[serde(flatten)]
    pub settings: Map<String, Value>,
}

/// Account data that is safe to return to its owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountProfile {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    #[serde(flatten)]
    pub settings: Map<String, Value>,
}

impl Account {
    /// Parses a `Users` record.
    pub fn from_record(record: Record) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(record))
    }

    /// Builds the payload inserted for a newly registered account.
    pub fn new_record(email: &str, password_hash: String, role: Role) -> Record {
        let mut record = Map::new();
        record.insert(EMAIL_FIELD.to_string(), Value::String(email.to_string()));
        record.insert(
            PASSWORD_HASH_FIELD.to_string(),
            Value::String(password_hash),
        );
        record.insert(ROLE_FIELD.to_string(), Value::String(role.to_string()));
        record
    }

    #[inline]
    pub fn profile(&self) -> AccountProfile {
        AccountProfile {
            id: self.id,
            email: self.email.clone(),
            role: self.role,
            settings: self.settings.clone(),
        }
    }
}
