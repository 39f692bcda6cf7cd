use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::AppState;
use crate::domain::invite::{Invite, InviteStatus};

/// Invite details shown on the acceptance page
#[derive(Debug, Serialize)]
pub struct InviteResponse {
    pub token: String,
    pub email: String,
    pub team_name: String,
    pub event_id: Uuid,
    pub status: InviteStatus,
    pub expires_at: DateTime<Utc>,
}

impl From<&Invite> for InviteResponse {
    fn from(invite: &Invite) -> Self {
        Self {
            token: invite.token().to_string(),
            email: invite.email().as_str().to_string(),
            team_name: invite.team_name().to_string(),
            event_id: invite.event_id(),
            status: invite.status(),
            expires_at: invite.expires_at(),
        }
    }
}

/// Look up an invite by its single-use token
///
/// GET /api/invites/:token
pub async fn get_invite(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<InviteResponse>, ApiError> {
    let invite = state
        .invites
        .find_by_token(&token)
        .await
        .map_err(ApiError::internal_server_error)?
        .ok_or_else(|| ApiError::not_found("Invite not found"))?;

    Ok(Json(InviteResponse::from(&invite)))
}
