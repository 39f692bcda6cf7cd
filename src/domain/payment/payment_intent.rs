use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::value_objects::PaymentStatus;

/// PaymentIntent aggregate
///
/// A gateway-tracked record of a pending entry-fee payment tied to one
/// registration. The amount is fixed at creation and must equal the
/// event's entry fee at that moment; the orchestrator enforces this
/// before construction.
///
/// # Invariants
/// - Amount is positive
/// - Merchant order id is non-empty
/// - Status transitions follow the defined state machine
#[derive(Debug, Clone)]
pub struct PaymentIntent {
    id: Uuid,
    registration_id: Uuid,
    amount: Decimal,
    merchant_order_id: String,
    status: PaymentStatus,
    created_at: DateTime<Utc>,
    concluded_at: Option<DateTime<Utc>>,
}

impl PaymentIntent {
    /// Creates a new intent in `Created` status
    pub fn new(
        registration_id: Uuid,
        amount: Decimal,
        merchant_order_id: String,
    ) -> Result<Self, String> {
        if amount <= Decimal::ZERO {
            return Err("Payment amount must be positive".to_string());
        }
        if merchant_order_id.is_empty() {
            return Err("Merchant order id cannot be empty".to_string());
        }

        Ok(Self {
            id: Uuid::new_v4(),
            registration_id,
            amount,
            merchant_order_id,
            status: PaymentStatus::Created,
            created_at: Utc::now(),
            concluded_at: None,
        })
    }

    /// Marks checkout as underway; the backend status is now the only
    /// authority on the outcome
    pub fn mark_pending(&mut self) -> Result<(), String> {
        self.transition(PaymentStatus::Pending)
    }

    pub fn complete(&mut self) -> Result<(), String> {
        self.transition(PaymentStatus::Completed)?;
        self.concluded_at = Some(Utc::now());
        Ok(())
    }

    pub fn fail(&mut self) -> Result<(), String> {
        self.transition(PaymentStatus::Failed)?;
        self.concluded_at = Some(Utc::now());
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<(), String> {
        self.transition(PaymentStatus::Cancelled)?;
        self.concluded_at = Some(Utc::now());
        Ok(())
    }

    fn transition(&mut self, next: PaymentStatus) -> Result<(), String> {
        if !self.status.can_transition_to(next) {
            return Err(format!(
                "Cannot move payment intent from {} to {}",
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

    pub fn registration_id(&self) -> Uuid {
        self.registration_id
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn merchant_order_id(&self) -> &str {
        &self.merchant_order_id
    }

    pub fn status(&self) -> PaymentStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn concluded_at(&self) -> Option<DateTime<Utc>> {
        self.concluded_at
    }

    /// Reconstructs a PaymentIntent from persistence layer data
    pub fn from_persistence(
        id: Uuid,
        registration_id: Uuid,
        amount: Decimal,
        merchant_order_id: String,
        status: PaymentStatus,
        created_at: DateTime<Utc>,
        concluded_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            registration_id,
            amount,
            merchant_order_id,
            status,
            created_at,
            concluded_at,
        }
    }
}
