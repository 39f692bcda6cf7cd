use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::roster::Email;

/// Summary of a team as listed by the membership service
#[derive(Debug, Clone)]
pub struct TeamSummary {
    pub id: Uuid,
    pub name: String,
    pub owner_id: Uuid,
}

/// A member as known to the membership service
#[derive(Debug, Clone)]
pub struct TeamMember {
    pub user_id: Uuid,
    pub username: String,
    pub email: Email,
}

/// External team/roster membership service
///
/// Team creation and management live outside this core; registration
/// only reads membership to validate existing-team rosters. Username
/// search assists the UI and is not correctness-critical.
#[async_trait]
pub trait TeamDirectory: Send + Sync {
    /// List teams a user captains or belongs to
    async fn list_teams(&self, user_id: Uuid) -> Result<Vec<TeamSummary>, String>;

    /// Current members of a team, or None when the team does not exist
    async fn get_team_members(&self, team_id: Uuid) -> Result<Option<Vec<TeamMember>>, String>;

    /// Username candidates matching a prefix
    async fn search_usernames(&self, prefix: &str) -> Result<Vec<String>, String>;
}
