use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::invite::Invite;

/// Repository trait for the Invite aggregate
#[async_trait]
pub trait InviteRepository: Send + Sync {
    /// Save an invite (insert or update)
    async fn save(&self, invite: &Invite) -> Result<(), String>;

    /// Find an invite by its single-use token
    async fn find_by_token(&self, token: &str) -> Result<Option<Invite>, String>;

    /// Find all invites issued for a registration
    async fn find_by_registration(&self, registration_id: Uuid) -> Result<Vec<Invite>, String>;
}
