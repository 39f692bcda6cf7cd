use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use super::value_objects::InviteStatus;
use crate::domain::roster::Email;

/// How long an invite remains acceptable after issuance
pub const INVITE_TTL_HOURS: i64 = 24;

/// Invite aggregate
///
/// A single-use token binding a teammate email to a candidate team and
/// event. Acceptance materializes team membership on the external side;
/// this core issues, expires, and revokes.
#[derive(Debug, Clone)]
pub struct Invite {
    id: Uuid,
    token: String,
    email: Email,
    registration_id: Uuid,
    event_id: Uuid,
    team_name: String,
    status: InviteStatus,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl Invite {
    /// Issues a new pending invite with a fresh single-use token
    pub fn new(
        email: Email,
        registration_id: Uuid,
        event_id: Uuid,
        team_name: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            token: Uuid::new_v4().simple().to_string(),
            email,
            registration_id,
            event_id,
            team_name,
            status: InviteStatus::Pending,
            created_at: now,
            expires_at: now + Duration::hours(INVITE_TTL_HOURS),
        }
    }

    /// Whether this invite is past its acceptance window at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Whether the given address may use this invite
    pub fn can_be_used_by(&self, email: &str) -> bool {
        self.status == InviteStatus::Pending && self.email.matches_ignore_case(email)
    }

    pub fn accept(&mut self) -> Result<(), String> {
        self.transition(InviteStatus::Accepted)
    }

    pub fn decline(&mut self) -> Result<(), String> {
        self.transition(InviteStatus::Declined)
    }

    pub fn expire(&mut self) -> Result<(), String> {
        self.transition(InviteStatus::Expired)
    }

    /// Withdraws the invite because its registration failed or was
    /// cancelled, so no team materializes without a valid registration
    pub fn revoke(&mut self) -> Result<(), String> {
        self.transition(InviteStatus::Revoked)
    }

    fn transition(&mut self, next: InviteStatus) -> Result<(), String> {
        if !self.status.can_transition_to(next) {
            return Err(format!(
                "Cannot move invite from {} to {}",
                self.status, next
            ));
        }
        self.status = next;
        Ok(())
    }

    // ===== Getters =====

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn registration_id(&self) -> Uuid {
        self.registration_id
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn team_name(&self) -> &str {
        &self.team_name
    }

    pub fn status(&self) -> InviteStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Reconstructs an Invite from persistence layer data
    #[allow(clippy::too_many_arguments)]
    pub fn from_persistence(
        id: Uuid,
        token: String,
        email: Email,
        registration_id: Uuid,
        event_id: Uuid,
        team_name: String,
        status: InviteStatus,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            token,
            email,
            registration_id,
            event_id,
            team_name,
            status,
            created_at,
            expires_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_invite() -> Invite {
        Invite::new(
            Email::new("teammate@example.com").unwrap(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            "Night Owls".to_string(),
            Utc::now(),
        )
    }

    #[test]
    fn new_invite_is_pending_with_24h_window() {
        let now = Utc::now();
        let invite = Invite::new(
            Email::new("teammate@example.com").unwrap(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            "Night Owls".to_string(),
            now,
        );

        assert_eq!(invite.status(), InviteStatus::Pending);
        assert_eq!(invite.expires_at(), now + Duration::hours(24));
        assert!(!invite.is_expired_at(now + Duration::hours(23)));
        assert!(invite.is_expired_at(now + Duration::hours(24)));
    }

    #[test]
    fn tokens_are_unique_per_invite() {
        let a = sample_invite();
        let b = sample_invite();
        assert_ne!(a.token(), b.token());
    }

    #[test]
    fn usable_only_by_matching_email_while_pending() {
        let mut invite = sample_invite();
        assert!(invite.can_be_used_by("Teammate@Example.COM"));
        assert!(!invite.can_be_used_by("other@example.com"));

        invite.revoke().unwrap();
        assert!(!invite.can_be_used_by("teammate@example.com"));
    }

    #[test]
    fn accepted_invite_cannot_be_revoked() {
        let mut invite = sample_invite();
        invite.accept().unwrap();
        assert!(invite.revoke().is_err());
    }
}
