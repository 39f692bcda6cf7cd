use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::value_objects::GameMode;

/// Read-only snapshot of a competitive event (tournament or scrim)
///
/// Events are owned by the event-management side of the platform; the
/// registration core only reads them, except for the atomic seat claim
/// which goes through the event repository.
#[derive(Debug, Clone)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub game_mode: GameMode,
    pub entry_fee: Decimal,
    pub registration_opens_at: DateTime<Utc>,
    pub registration_closes_at: DateTime<Utc>,
    pub max_participants: i32,
    pub current_participants: i32,
}

impl Event {
    /// Number of players a roster for this event must carry
    pub fn required_players(&self) -> usize {
        self.game_mode.required_players()
    }

    /// Whether the event charges an entry fee
    pub fn is_free(&self) -> bool {
        self.entry_fee <= Decimal::ZERO
    }

    /// Whether the registration window is open at `now`
    pub fn is_open_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.registration_opens_at && now < self.registration_closes_at
    }

    /// Non-authoritative capacity check, for early rejection only
    ///
    /// The authoritative check is the serialized seat claim in the
    /// event repository.
    pub fn has_remaining_capacity(&self) -> bool {
        self.current_participants < self.max_participants
    }
}
