//! # Guardian Access Handler
//!
//! A guardian may only be granted access to an adolescent's data when the
//! adolescent's record already names that guardian. How the link gets onto
//! the adolescent record is outside this service.

use std::sync::Arc;

use axum::extract::{Extension, State};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info, instrument, warn};

use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::models::AppState;
use crate::store::{Collection, Filter, USER_ID_FIELD};
use crate::utils::extract::AppJson;
use crate::utils::response::Reply;
use crate::utils::validator::validate_identifier;

pub const GUARDIAN_ID_FIELD: &str = "guardianId";
pub const ADOLESCENT_ID_FIELD: &str = "adolescentId";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardianAccessRequest {
    pub adolescent_id: String,
}

/// Records a guardian access grant if the adolescent has consented.
///
/// POST /api/guardian-access { "adolescentId": "..." }
///
/// The requesting guardian is the authenticated user.
///
/// # Returns
///
/// - `200 OK` - Consent found, grant recorded
/// - `400 Bad Request` - Malformed adolescent id
/// - `403 Forbidden` - No adolescent record, or it names a different guardian
#[instrument(
    skip_all,
    fields(
        guardian_id = %user.user_id,
        adolescent_id = %payload.adolescent_id,
        request_id = %uuid::Uuid::new_v4()
    )
)]
pub async fn request_guardian_access(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    AppJson(payload): AppJson<GuardianAccessRequest>,
) -> AppResult<Reply> {
    debug!("Processing guardian access request");
    validate_identifier(&payload.adolescent_id)?;

    let guardian_id = user.user_id.to_string();
    let adolescent = state
        .store
        .find_first(
            Collection::Adolescents,
            &Filter::eq(USER_ID_FIELD, payload.adolescent_id.as_str()),
        )
        .await?;

    let has_consent = adolescent
        .as_ref()
        .and_then(|record| record.get(GUARDIAN_ID_FIELD))
        .and_then(Value::as_str)
        .is_some_and(|stored| stored == guardian_id);

    if !has_consent {
        warn!(
            adolescent_found = adolescent.is_some(),
            "Guardian access denied"
        );
        return Err(AppError::Forbidden(
            "Access denied: No consent from adolescent",
        ));
    }

    let mut grant = Map::new();
    grant.insert(
        ADOLESCENT_ID_FIELD.to_string(),
        Value::String(payload.adolescent_id),
    );
    grant.insert(GUARDIAN_ID_FIELD.to_string(), Value::String(guardian_id));
    state
        .store
        .insert(Collection::GuardianAccessRequests, grant)
        .await?;

    info!("Guardian access granted");
    Ok(Reply::ok().message("Access granted"))
}
