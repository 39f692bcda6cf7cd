use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a registration
///
/// # Status Transitions
/// ```text
/// Initiated -> Confirmed                      (free events)
/// Initiated -> PendingPayment -> Confirmed    (paid events)
///                           └--> Failed
/// ```
/// `Confirmed`, `Failed` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "registration_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    /// Roster validated, registration recorded, outcome not yet decided
    Initiated,
    /// Payment intent created, awaiting a terminal payment outcome
    PendingPayment,
    /// Seat secured; the party participates in the event
    Confirmed,
    /// Registration failed; a retry creates a new registration
    Failed,
    /// Withdrawn before reaching a payment outcome
    Cancelled,
}

impl RegistrationStatus {
    /// Checks if a transition from current status to next status is valid
    pub fn can_transition_to(&self, next: RegistrationStatus) -> bool {
        use RegistrationStatus::*;
        matches!(
            (self, next),
            (Initiated, Confirmed)
                | (Initiated, PendingPayment)
                | (Initiated, Failed)
                | (Initiated, Cancelled)
                | (PendingPayment, Confirmed)
                | (PendingPayment, Failed)
                | (PendingPayment, Cancelled)
        )
    }

    /// Terminal statuses permit no further transition
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RegistrationStatus::Confirmed
                | RegistrationStatus::Failed
                | RegistrationStatus::Cancelled
        )
    }

    /// Whether a registration in this status blocks another registration
    /// for the same party on the same event
    ///
    /// `Failed` and `Cancelled` rows never block a retry.
    pub fn blocks_resubmission(&self) -> bool {
        matches!(
            self,
            RegistrationStatus::Initiated
                | RegistrationStatus::PendingPayment
                | RegistrationStatus::Confirmed
        )
    }
}

impl std::fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistrationStatus::Initiated => write!(f, "initiated"),
            RegistrationStatus::PendingPayment => write!(f, "pending_payment"),
            RegistrationStatus::Confirmed => write!(f, "confirmed"),
            RegistrationStatus::Failed => write!(f, "failed"),
            RegistrationStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Why a registration reached `Failed`
///
/// Distinguishable reasons let the surface tell the user what to do next
/// (retry, or contact support for a stuck payment).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "failure_reason", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// The user aborted checkout
    UserCancelled,
    /// The gateway reported a failed or cancelled payment
    PaymentFailed,
    /// Reconciliation exhausted its budget without a terminal status
    Timeout,
    /// The event filled up before the seat could be claimed
    EventFull,
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::UserCancelled => write!(f, "user_cancelled"),
            FailureReason::PaymentFailed => write!(f, "payment_failed"),
            FailureReason::Timeout => write!(f, "timeout"),
            FailureReason::EventFull => write!(f, "event_full"),
        }
    }
}

/// The party a registration commits to an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationParty {
    /// An existing team registers under its team id
    ExistingTeam { team_id: Uuid },
    /// An ad-hoc team assembled through invites, keyed by its captain
    NewTeam { name: String },
}

/// Uniqueness key for the at-most-one-active-registration invariant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartyKey {
    Team(Uuid),
    Captain(Uuid),
}

impl RegistrationParty {
    /// Collision key for this party: the team id for existing teams, the
    /// captain's user id for ad-hoc teams
    pub fn key(&self, captain_id: Uuid) -> PartyKey {
        match self {
            RegistrationParty::ExistingTeam { team_id } => PartyKey::Team(*team_id),
            RegistrationParty::NewTeam { .. } => PartyKey::Captain(captain_id),
        }
    }
}
