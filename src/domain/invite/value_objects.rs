use serde::{Deserialize, Serialize};

/// Lifecycle status of a teammate invite
///
/// Acceptance and decline are driven by the external team-membership
/// endpoint; revocation happens when the registration an invite belongs
/// to reaches a terminal failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "invite_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InviteStatus {
    Pending,
    Accepted,
    Declined,
    Expired,
    Revoked,
}

impl InviteStatus {
    /// Checks if a transition from current status to next status is valid
    ///
    /// Only `Pending` invites move; everything else is terminal.
    pub fn can_transition_to(&self, next: InviteStatus) -> bool {
        use InviteStatus::*;
        matches!(
            (self, next),
            (Pending, Accepted) | (Pending, Declined) | (Pending, Expired) | (Pending, Revoked)
        )
    }
}

impl std::fmt::Display for InviteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InviteStatus::Pending => write!(f, "pending"),
            InviteStatus::Accepted => write!(f, "accepted"),
            InviteStatus::Declined => write!(f, "declined"),
            InviteStatus::Expired => write!(f, "expired"),
            InviteStatus::Revoked => write!(f, "revoked"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_can_reach_every_terminal() {
        assert!(InviteStatus::Pending.can_transition_to(InviteStatus::Accepted));
        assert!(InviteStatus::Pending.can_transition_to(InviteStatus::Declined));
        assert!(InviteStatus::Pending.can_transition_to(InviteStatus::Expired));
        assert!(InviteStatus::Pending.can_transition_to(InviteStatus::Revoked));
    }

    #[test]
    fn accepted_invite_is_terminal() {
        assert!(!InviteStatus::Accepted.can_transition_to(InviteStatus::Revoked));
        assert!(!InviteStatus::Accepted.can_transition_to(InviteStatus::Pending));
    }

    #[test]
    fn revoked_invite_is_terminal() {
        assert!(!InviteStatus::Revoked.can_transition_to(InviteStatus::Accepted));
    }
}
