use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::event::{Event, GameMode};
use crate::domain::repositories::EventRepository;

/// PostgreSQL implementation of EventRepository
///
/// The seat claim is a single guarded UPDATE: the row lock Postgres
/// takes for the update serializes concurrent claims per event, and the
/// WHERE clause makes check-and-increment one atomic statement. Claims
/// on different events touch different rows and never block each other.
pub struct PostgresEventRepository {
    pool: PgPool,
}

impl PostgresEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct EventRow {
    id: Uuid,
    title: String,
    game_mode: GameMode,
    entry_fee: Decimal,
    registration_opens_at: DateTime<Utc>,
    registration_closes_at: DateTime<Utc>,
    max_participants: i32,
    current_participants: i32,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Event {
            id: row.id,
            title: row.title,
            game_mode: row.game_mode,
            entry_fee: row.entry_fee,
            registration_opens_at: row.registration_opens_at,
            registration_closes_at: row.registration_closes_at,
            max_participants: row.max_participants,
            current_participants: row.current_participants,
        }
    }
}

#[async_trait]
impl EventRepository for PostgresEventRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>, String> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, title, game_mode, entry_fee,
                   registration_opens_at, registration_closes_at,
                   max_participants, current_participants
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| format!("Failed to find event by id: {}", e))?;

        Ok(row.map(Event::from))
    }

    async fn try_claim_seat(&self, event_id: Uuid) -> Result<bool, String> {
        let result = sqlx::query(
            r#"
            UPDATE events
            SET current_participants = current_participants + 1
            WHERE id = $1 AND current_participants < max_participants
            "#,
        )
        .bind(event_id)
        .execute(&self.pool)
        .await
        .map_err(|e| format!("Failed to claim seat: {}", e))?;

        Ok(result.rows_affected() == 1)
    }

    async fn release_seat(&self, event_id: Uuid) -> Result<(), String> {
        sqlx::query(
            r#"
            UPDATE events
            SET current_participants = GREATEST(current_participants - 1, 0)
            WHERE id = $1
            "#,
        )
        .bind(event_id)
        .execute(&self.pool)
        .await
        .map_err(|e| format!("Failed to release seat: {}", e))?;

        Ok(())
    }
}
