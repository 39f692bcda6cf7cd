use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::AppState;
use crate::domain::event::{Event, GameMode};

/// Event snapshot as exposed to the registration surface
#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub id: Uuid,
    pub title: String,
    pub game_mode: GameMode,
    pub required_players: usize,
    pub entry_fee: Decimal,
    pub registration_opens_at: DateTime<Utc>,
    pub registration_closes_at: DateTime<Utc>,
    pub max_participants: i32,
    pub current_participants: i32,
}

impl From<&Event> for EventResponse {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id,
            title: event.title.clone(),
            game_mode: event.game_mode,
            required_players: event.required_players(),
            entry_fee: event.entry_fee,
            registration_opens_at: event.registration_opens_at,
            registration_closes_at: event.registration_closes_at,
            max_participants: event.max_participants,
            current_participants: event.current_participants,
        }
    }
}

/// Get an event by ID
///
/// GET /api/events/:id
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EventResponse>, ApiError> {
    let event = state
        .events
        .find_by_id(id)
        .await
        .map_err(ApiError::internal_server_error)?
        .ok_or_else(|| ApiError::not_found(format!("Event not found: {}", id)))?;

    Ok(Json(EventResponse::from(&event)))
}

/// Health check
///
/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}
