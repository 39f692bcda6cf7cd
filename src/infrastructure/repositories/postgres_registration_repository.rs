use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::registration::{
    FailureReason, Registration, RegistrationParty, RegistrationStatus,
};
use crate::domain::repositories::RegistrationRepository;

/// PostgreSQL implementation of RegistrationRepository
///
/// Queries are runtime-bound so the crate builds without a database
/// connection; the schema mirrors the aggregate one-to-one.
///
/// `try_insert_active` relies on two partial unique indexes over rows
/// in a blocking status:
/// ```text
/// CREATE UNIQUE INDEX registrations_active_team ON registrations (event_id, party_team_id)
///     WHERE party_team_id IS NOT NULL AND status IN ('initiated', 'pending_payment', 'confirmed');
/// CREATE UNIQUE INDEX registrations_active_captain ON registrations (event_id, captain_id)
///     WHERE party_team_id IS NULL AND status IN ('initiated', 'pending_payment', 'confirmed');
/// ```
/// so check-and-insert is a single statement and two concurrent
/// identical submissions can never both land.
pub struct PostgresRegistrationRepository {
    pool: PgPool,
}

impl PostgresRegistrationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct RegistrationRow {
    id: Uuid,
    event_id: Uuid,
    captain_id: Uuid,
    party_team_id: Option<Uuid>,
    party_team_name: Option<String>,
    status: RegistrationStatus,
    failure_reason: Option<FailureReason>,
    payment_intent_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    concluded_at: Option<DateTime<Utc>>,
}

impl RegistrationRow {
    fn into_registration(self) -> Registration {
        let party = match self.party_team_id {
            Some(team_id) => RegistrationParty::ExistingTeam { team_id },
            None => RegistrationParty::NewTeam {
                name: self.party_team_name.unwrap_or_default(),
            },
        };

        Registration::from_persistence(
            self.id,
            self.event_id,
            self.captain_id,
            party,
            self.status,
            self.failure_reason,
            self.payment_intent_id,
            self.created_at,
            self.concluded_at,
        )
    }
}

const SELECT_COLUMNS: &str = r#"
    SELECT id, event_id, captain_id, party_team_id, party_team_name,
           status, failure_reason, payment_intent_id, created_at, concluded_at
    FROM registrations
"#;

fn party_columns(registration: &Registration) -> (Option<Uuid>, Option<String>) {
    match registration.party() {
        RegistrationParty::ExistingTeam { team_id } => (Some(*team_id), None),
        RegistrationParty::NewTeam { name } => (None, Some(name.clone())),
    }
}

#[async_trait]
impl RegistrationRepository for PostgresRegistrationRepository {
    async fn try_insert_active(&self, registration: &Registration) -> Result<bool, String> {
        let (party_team_id, party_team_name) = party_columns(registration);

        let result = sqlx::query(
            r#"
            INSERT INTO registrations (
                id, event_id, captain_id, party_team_id, party_team_name,
                status, failure_reason, payment_intent_id, created_at, concluded_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(registration.id())
        .bind(registration.event_id())
        .bind(registration.captain_id())
        .bind(party_team_id)
        .bind(party_team_name)
        .bind(registration.status())
        .bind(registration.failure_reason())
        .bind(registration.payment_intent_id())
        .bind(registration.created_at())
        .bind(registration.concluded_at())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(true),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Ok(false),
            Err(e) => Err(format!("Failed to insert registration: {}", e)),
        }
    }

    async fn save(&self, registration: &Registration) -> Result<(), String> {
        let (party_team_id, party_team_name) = party_columns(registration);

        sqlx::query(
            r#"
            INSERT INTO registrations (
                id, event_id, captain_id, party_team_id, party_team_name,
                status, failure_reason, payment_intent_id, created_at, concluded_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO UPDATE SET
                status = EXCLUDED.status,
                failure_reason = EXCLUDED.failure_reason,
                payment_intent_id = EXCLUDED.payment_intent_id,
                concluded_at = EXCLUDED.concluded_at
            "#,
        )
        .bind(registration.id())
        .bind(registration.event_id())
        .bind(registration.captain_id())
        .bind(party_team_id)
        .bind(party_team_name)
        .bind(registration.status())
        .bind(registration.failure_reason())
        .bind(registration.payment_intent_id())
        .bind(registration.created_at())
        .bind(registration.concluded_at())
        .execute(&self.pool)
        .await
        .map_err(|e| format!("Failed to save registration: {}", e))?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Registration>, String> {
        let row = sqlx::query_as::<_, RegistrationRow>(&format!("{} WHERE id = $1", SELECT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| format!("Failed to find registration by id: {}", e))?;

        Ok(row.map(RegistrationRow::into_registration))
    }
}
