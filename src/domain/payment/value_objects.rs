use serde::{Deserialize, Serialize};

/// Lifecycle status of a payment intent
///
/// # Status Transitions
/// ```text
/// Created -> Pending -> Completed
///       └--------┴----> Failed | Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Intent created with the gateway, checkout not yet underway
    Created,
    /// Checkout underway or concluded, backend status not yet authoritative
    Pending,
    /// Gateway reports the payment captured
    Completed,
    /// Gateway reports the payment failed
    Failed,
    /// Intent abandoned before a payment outcome
    Cancelled,
}

impl PaymentStatus {
    /// Checks if a transition from current status to next status is valid
    pub fn can_transition_to(&self, next: PaymentStatus) -> bool {
        use PaymentStatus::*;
        matches!(
            (self, next),
            (Created, Pending)
                | (Created, Completed)
                | (Created, Failed)
                | (Created, Cancelled)
                | (Pending, Completed)
                | (Pending, Failed)
                | (Pending, Cancelled)
        )
    }

    /// Terminal statuses permit no further transition
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PaymentStatus::Completed | PaymentStatus::Failed | PaymentStatus::Cancelled
        )
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Created => write!(f, "created"),
            PaymentStatus::Pending => write!(f, "pending"),
            PaymentStatus::Completed => write!(f, "completed"),
            PaymentStatus::Failed => write!(f, "failed"),
            PaymentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_can_reach_every_status() {
        assert!(PaymentStatus::Created.can_transition_to(PaymentStatus::Pending));
        assert!(PaymentStatus::Created.can_transition_to(PaymentStatus::Completed));
        assert!(PaymentStatus::Created.can_transition_to(PaymentStatus::Failed));
        assert!(PaymentStatus::Created.can_transition_to(PaymentStatus::Cancelled));
    }

    #[test]
    fn completed_is_terminal() {
        assert!(PaymentStatus::Completed.is_terminal());
        assert!(!PaymentStatus::Completed.can_transition_to(PaymentStatus::Failed));
        assert!(!PaymentStatus::Completed.can_transition_to(PaymentStatus::Pending));
    }

    #[test]
    fn failed_cannot_complete_later() {
        assert!(!PaymentStatus::Failed.can_transition_to(PaymentStatus::Completed));
    }

    #[test]
    fn non_terminal_statuses() {
        assert!(!PaymentStatus::Created.is_terminal());
        assert!(!PaymentStatus::Pending.is_terminal());
    }
}
