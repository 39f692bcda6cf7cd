use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::repositories::{TeamDirectory, TeamMember, TeamSummary};
use crate::domain::roster::Email;

/// PostgreSQL implementation of the external team directory
///
/// Team management lives outside this core; this adapter reads the
/// membership tables it maintains.
pub struct PostgresTeamDirectory {
    pool: PgPool,
}

impl PostgresTeamDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct TeamRow {
    id: Uuid,
    name: String,
    owner_id: Uuid,
}

#[derive(sqlx::FromRow)]
struct MemberRow {
    user_id: Uuid,
    username: String,
    email: String,
}

#[async_trait]
impl TeamDirectory for PostgresTeamDirectory {
    async fn list_teams(&self, user_id: Uuid) -> Result<Vec<TeamSummary>, String> {
        let rows = sqlx::query_as::<_, TeamRow>(
            r#"
            SELECT DISTINCT t.id, t.name, t.owner_id
            FROM teams t
            LEFT JOIN team_members m ON m.team_id = t.id
            WHERE t.owner_id = $1 OR m.user_id = $1
            ORDER BY t.name
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| format!("Failed to list teams: {}", e))?;

        Ok(rows
            .into_iter()
            .map(|r| TeamSummary {
                id: r.id,
                name: r.name,
                owner_id: r.owner_id,
            })
            .collect())
    }

    async fn get_team_members(&self, team_id: Uuid) -> Result<Option<Vec<TeamMember>>, String> {
        let team_exists = sqlx::query_as::<_, TeamRow>(
            "SELECT id, name, owner_id FROM teams WHERE id = $1",
        )
        .bind(team_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| format!("Failed to find team: {}", e))?;

        if team_exists.is_none() {
            return Ok(None);
        }

        let rows = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT u.id AS user_id, u.username, u.email
            FROM team_members m
            JOIN users u ON u.id = m.user_id
            WHERE m.team_id = $1
            ORDER BY u.username
            "#,
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| format!("Failed to load team members: {}", e))?;

        let members = rows
            .into_iter()
            .map(|r| {
                Ok(TeamMember {
                    user_id: r.user_id,
                    username: r.username,
                    email: Email::new(r.email)?,
                })
            })
            .collect::<Result<Vec<_>, String>>()?;

        Ok(Some(members))
    }

    async fn search_usernames(&self, prefix: &str) -> Result<Vec<String>, String> {
        #[derive(sqlx::FromRow)]
        struct UsernameRow {
            username: String,
        }

        let rows = sqlx::query_as::<_, UsernameRow>(
            "SELECT username FROM users WHERE username ILIKE $1 ORDER BY username LIMIT 10",
        )
        .bind(format!("{}%", prefix))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| format!("Failed to search usernames: {}", e))?;

        Ok(rows.into_iter().map(|r| r.username).collect())
    }
}
