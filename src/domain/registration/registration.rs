use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::events::RegistrationEvent;
use super::value_objects::{FailureReason, PartyKey, RegistrationParty, RegistrationStatus};

/// Registration aggregate root
///
/// Records one party's commitment to one event and owns the lifecycle
/// from `Initiated` to a terminal state. Registrations are never deleted;
/// a failed registration is retried by creating a new one.
///
/// # Invariants
/// - Status transitions follow the defined state machine
/// - A failure reason is present exactly when status is `Failed`
/// - At most one registration per (event, party) key may be in a
///   blocking status (enforced by the ledger through the repository)
#[derive(Debug, Clone)]
pub struct Registration {
    id: Uuid,
    event_id: Uuid,
    captain_id: Uuid,
    party: RegistrationParty,
    status: RegistrationStatus,
    failure_reason: Option<FailureReason>,
    payment_intent_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    concluded_at: Option<DateTime<Utc>>,
}

impl Registration {
    /// Creates a new registration in `Initiated` status
    ///
    /// Called only after roster validation and the uniqueness check have
    /// passed; the aggregate itself has no view of other registrations.
    pub fn new(
        event_id: Uuid,
        captain_id: Uuid,
        party: RegistrationParty,
    ) -> (Self, Vec<RegistrationEvent>) {
        let registration = Self {
            id: Uuid::new_v4(),
            event_id,
            captain_id,
            party,
            status: RegistrationStatus::Initiated,
            failure_reason: None,
            payment_intent_id: None,
            created_at: Utc::now(),
            concluded_at: None,
        };

        let events = vec![RegistrationEvent::Created {
            registration_id: registration.id,
            event_id,
            captain_id,
        }];

        (registration, events)
    }

    /// Attaches a payment intent and moves to `PendingPayment`
    pub fn require_payment(&mut self, payment_intent_id: Uuid) -> Result<RegistrationEvent, String> {
        let next = RegistrationStatus::PendingPayment;
        if !self.status.can_transition_to(next) {
            return Err(format!(
                "Cannot require payment for registration in {} status",
                self.status
            ));
        }

        self.status = next;
        self.payment_intent_id = Some(payment_intent_id);

        Ok(RegistrationEvent::PaymentRequired {
            registration_id: self.id,
            payment_intent_id,
        })
    }

    /// Secures the seat
    ///
    /// The caller must have claimed a seat atomically before this
    /// transition; the aggregate records the outcome only.
    pub fn confirm(&mut self) -> Result<RegistrationEvent, String> {
        let next = RegistrationStatus::Confirmed;
        if !self.status.can_transition_to(next) {
            return Err(format!(
                "Cannot confirm registration in {} status",
                self.status
            ));
        }

        self.status = next;
        self.concluded_at = Some(Utc::now());

        Ok(RegistrationEvent::Confirmed {
            registration_id: self.id,
        })
    }

    /// Marks the registration as failed with a distinguishable reason
    pub fn fail(&mut self, reason: FailureReason) -> Result<RegistrationEvent, String> {
        let next = RegistrationStatus::Failed;
        if !self.status.can_transition_to(next) {
            return Err(format!("Cannot fail registration in {} status", self.status));
        }

        self.status = next;
        self.failure_reason = Some(reason);
        self.concluded_at = Some(Utc::now());

        Ok(RegistrationEvent::Failed {
            registration_id: self.id,
            reason,
        })
    }

    /// Withdraws the registration
    pub fn cancel(&mut self) -> Result<RegistrationEvent, String> {
        let next = RegistrationStatus::Cancelled;
        if !self.status.can_transition_to(next) {
            return Err(format!(
                "Cannot cancel registration in {} status",
                self.status
            ));
        }

        self.status = next;
        self.concluded_at = Some(Utc::now());

        Ok(RegistrationEvent::Cancelled {
            registration_id: self.id,
        })
    }

    // ===== Getters =====

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn captain_id(&self) -> Uuid {
        self.captain_id
    }

    pub fn party(&self) -> &RegistrationParty {
        &self.party
    }

    /// Collision key for the uniqueness invariant
    pub fn party_key(&self) -> PartyKey {
        self.party.key(self.captain_id)
    }

    pub fn status(&self) -> RegistrationStatus {
        self.status
    }

    pub fn failure_reason(&self) -> Option<FailureReason> {
        self.failure_reason
    }

    pub fn payment_intent_id(&self) -> Option<Uuid> {
        self.payment_intent_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn concluded_at(&self) -> Option<DateTime<Utc>> {
        self.concluded_at
    }

    /// Reconstructs a Registration from persistence layer data
    ///
    /// Bypasses business rules validation; only to be used by repository
    /// implementations for data reconstruction.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persistence(
        id: Uuid,
        event_id: Uuid,
        captain_id: Uuid,
        party: RegistrationParty,
        status: RegistrationStatus,
        failure_reason: Option<FailureReason>,
        payment_intent_id: Option<Uuid>,
        created_at: DateTime<Utc>,
        concluded_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            event_id,
            captain_id,
            party,
            status,
            failure_reason,
            payment_intent_id,
            created_at,
            concluded_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_registration() -> Registration {
        let (registration, _) = Registration::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            RegistrationParty::NewTeam {
                name: "Night Owls".to_string(),
            },
        );
        registration
    }

    #[test]
    fn new_registration_starts_initiated() {
        let (registration, events) = Registration::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            RegistrationParty::ExistingTeam {
                team_id: Uuid::new_v4(),
            },
        );

        assert_eq!(registration.status(), RegistrationStatus::Initiated);
        assert!(registration.payment_intent_id().is_none());
        assert!(registration.failure_reason().is_none());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].registration_id(), registration.id());
    }

    #[test]
    fn free_path_confirms_from_initiated() {
        let mut registration = new_registration();

        let event = registration.confirm().unwrap();
        assert_eq!(registration.status(), RegistrationStatus::Confirmed);
        assert!(registration.concluded_at().is_some());
        assert_eq!(event.registration_id(), registration.id());
    }

    #[test]
    fn paid_path_moves_through_pending_payment() {
        let mut registration = new_registration();
        let intent_id = Uuid::new_v4();

        registration.require_payment(intent_id).unwrap();
        assert_eq!(registration.status(), RegistrationStatus::PendingPayment);
        assert_eq!(registration.payment_intent_id(), Some(intent_id));

        registration.confirm().unwrap();
        assert_eq!(registration.status(), RegistrationStatus::Confirmed);
    }

    #[test]
    fn failing_records_the_reason() {
        let mut registration = new_registration();
        registration.require_payment(Uuid::new_v4()).unwrap();

        registration.fail(FailureReason::Timeout).unwrap();
        assert_eq!(registration.status(), RegistrationStatus::Failed);
        assert_eq!(registration.failure_reason(), Some(FailureReason::Timeout));
    }

    #[test]
    fn confirmed_registration_cannot_fail() {
        let mut registration = new_registration();
        registration.confirm().unwrap();

        assert!(registration.fail(FailureReason::PaymentFailed).is_err());
        assert!(registration.cancel().is_err());
    }

    #[test]
    fn failed_registration_cannot_be_resurrected() {
        let mut registration = new_registration();
        registration.fail(FailureReason::EventFull).unwrap();

        assert!(registration.confirm().is_err());
        assert!(registration.require_payment(Uuid::new_v4()).is_err());
    }

    #[test]
    fn cannot_attach_second_payment_while_pending() {
        let mut registration = new_registration();
        registration.require_payment(Uuid::new_v4()).unwrap();

        assert!(registration.require_payment(Uuid::new_v4()).is_err());
    }

    #[test]
    fn party_key_distinguishes_team_and_captain() {
        let team_id = Uuid::new_v4();
        let (registration, _) = Registration::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            RegistrationParty::ExistingTeam { team_id },
        );
        assert_eq!(registration.party_key(), PartyKey::Team(team_id));

        let captain_id = Uuid::new_v4();
        let (registration, _) = Registration::new(
            Uuid::new_v4(),
            captain_id,
            RegistrationParty::NewTeam {
                name: "Night Owls".to_string(),
            },
        );
        assert_eq!(registration.party_key(), PartyKey::Captain(captain_id));
    }
}
