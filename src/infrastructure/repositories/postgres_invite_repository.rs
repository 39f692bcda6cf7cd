use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::invite::{Invite, InviteStatus};
use crate::domain::repositories::InviteRepository;
use crate::domain::roster::Email;

/// PostgreSQL implementation of InviteRepository
pub struct PostgresInviteRepository {
    pool: PgPool,
}

impl PostgresInviteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct InviteRow {
    id: Uuid,
    token: String,
    email: String,
    registration_id: Uuid,
    event_id: Uuid,
    team_name: String,
    status: InviteStatus,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl InviteRow {
    fn into_invite(self) -> Result<Invite, String> {
        let email = Email::new(self.email)?;
        Ok(Invite::from_persistence(
            self.id,
            self.token,
            email,
            self.registration_id,
            self.event_id,
            self.team_name,
            self.status,
            self.created_at,
            self.expires_at,
        ))
    }
}

const SELECT_COLUMNS: &str = r#"
    SELECT id, token, email, registration_id, event_id,
           team_name, status, created_at, expires_at
    FROM invites
"#;

#[async_trait]
impl InviteRepository for PostgresInviteRepository {
    async fn save(&self, invite: &Invite) -> Result<(), String> {
        sqlx::query(
            r#"
            INSERT INTO invites (
                id, token, email, registration_id, event_id,
                team_name, status, created_at, expires_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id) DO UPDATE SET
                status = EXCLUDED.status
            "#,
        )
        .bind(invite.id())
        .bind(invite.token())
        .bind(invite.email().as_str())
        .bind(invite.registration_id())
        .bind(invite.event_id())
        .bind(invite.team_name())
        .bind(invite.status())
        .bind(invite.created_at())
        .bind(invite.expires_at())
        .execute(&self.pool)
        .await
        .map_err(|e| format!("Failed to save invite: {}", e))?;

        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Invite>, String> {
        let row = sqlx::query_as::<_, InviteRow>(&format!("{} WHERE token = $1", SELECT_COLUMNS))
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| format!("Failed to find invite by token: {}", e))?;

        row.map(InviteRow::into_invite).transpose()
    }

    async fn find_by_registration(&self, registration_id: Uuid) -> Result<Vec<Invite>, String> {
        let rows = sqlx::query_as::<_, InviteRow>(&format!(
            "{} WHERE registration_id = $1 ORDER BY created_at",
            SELECT_COLUMNS
        ))
        .bind(registration_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| format!("Failed to find invites by registration: {}", e))?;

        rows.into_iter().map(InviteRow::into_invite).collect()
    }
}
