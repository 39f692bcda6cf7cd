use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::AppState;
use crate::domain::repositories::TeamSummary;

/// Team as shown in the captain's party picker
#[derive(Debug, Serialize)]
pub struct TeamResponse {
    pub id: Uuid,
    pub name: String,
    pub owner_id: Uuid,
}

impl From<TeamSummary> for TeamResponse {
    fn from(team: TeamSummary) -> Self {
        Self {
            id: team.id,
            name: team.name,
            owner_id: team.owner_id,
        }
    }
}

/// List the teams a user captains or belongs to
///
/// GET /api/users/:user_id/teams
pub async fn list_teams(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<TeamResponse>>, ApiError> {
    let teams = state
        .teams
        .list_teams(user_id)
        .await
        .map_err(ApiError::internal_server_error)?;

    Ok(Json(teams.into_iter().map(TeamResponse::from).collect()))
}

#[derive(Debug, Deserialize)]
pub struct UsernameSearchParams {
    pub prefix: String,
}

/// Username candidates matching a prefix, for roster building
///
/// GET /api/users/search?prefix=...
pub async fn search_usernames(
    State(state): State<AppState>,
    Query(params): Query<UsernameSearchParams>,
) -> Result<Json<Vec<String>>, ApiError> {
    let names = state
        .teams
        .search_usernames(&params.prefix)
        .await
        .map_err(ApiError::internal_server_error)?;

    Ok(Json(names))
}
