use uuid::Uuid;

use super::value_objects::FailureReason;

/// Domain events that occur within the Registration aggregate
///
/// These events represent the business moments of a registration's
/// lifecycle. They are used for:
/// - Publishing to external systems (notifications, brackets)
/// - Auditing the path a registration took to its terminal state
#[derive(Debug, Clone)]
pub enum RegistrationEvent {
    /// Fired when a captain's roster passes validation and the
    /// registration is recorded
    Created {
        registration_id: Uuid,
        event_id: Uuid,
        captain_id: Uuid,
    },
    /// Fired when a payment intent is attached and the registration
    /// starts waiting for a payment outcome
    PaymentRequired {
        registration_id: Uuid,
        payment_intent_id: Uuid,
    },
    /// Fired when the seat is secured
    Confirmed { registration_id: Uuid },
    /// Fired when the registration fails
    Failed {
        registration_id: Uuid,
        reason: FailureReason,
    },
    /// Fired when the registration is withdrawn
    Cancelled { registration_id: Uuid },
}

impl RegistrationEvent {
    /// Returns the registration id for this event
    pub fn registration_id(&self) -> Uuid {
        match self {
            RegistrationEvent::Created {
                registration_id, ..
            } => *registration_id,
            RegistrationEvent::PaymentRequired {
                registration_id, ..
            } => *registration_id,
            RegistrationEvent::Confirmed { registration_id } => *registration_id,
            RegistrationEvent::Failed {
                registration_id, ..
            } => *registration_id,
            RegistrationEvent::Cancelled { registration_id } => *registration_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_event_carries_its_id() {
        let registration_id = Uuid::new_v4();
        let event = RegistrationEvent::Created {
            registration_id,
            event_id: Uuid::new_v4(),
            captain_id: Uuid::new_v4(),
        };

        assert_eq!(event.registration_id(), registration_id);
    }

    #[test]
    fn failed_event_carries_its_id() {
        let registration_id = Uuid::new_v4();
        let event = RegistrationEvent::Failed {
            registration_id,
            reason: FailureReason::Timeout,
        };

        assert_eq!(event.registration_id(), registration_id);
    }
}
