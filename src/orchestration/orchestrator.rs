use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{info, warn};

use super::errors::PaymentError;
use super::gateway::{CheckoutAccess, GatewayError, PaymentGateway};
use crate::domain::event::Event;
use crate::domain::payment::PaymentIntent;
use crate::domain::registration::Registration;
use crate::domain::repositories::PaymentIntentRepository;

/// Creates payment intents for registrations that carry an entry fee
///
/// Owns the amount invariant (the intent amount must equal the event's
/// entry fee at creation time) and the one-outstanding-intent rule.
pub struct PaymentOrchestrator {
    gateway: Arc<dyn PaymentGateway>,
    payments: Arc<dyn PaymentIntentRepository>,
}

impl PaymentOrchestrator {
    pub fn new(gateway: Arc<dyn PaymentGateway>, payments: Arc<dyn PaymentIntentRepository>) -> Self {
        Self { gateway, payments }
    }

    /// Creates and persists a payment intent for a registration
    ///
    /// # Business Rules
    /// - `amount` must equal `event.entry_fee` exactly; a mismatch is
    ///   fatal and never silently coerced
    /// - A registration with an outstanding intent gets no second one
    /// - Gateway transport failures surface as `GatewayUnavailable`
    pub async fn initiate_payment(
        &self,
        registration: &Registration,
        amount: Decimal,
        event: &Event,
    ) -> Result<(PaymentIntent, CheckoutAccess), PaymentError> {
        if amount != event.entry_fee {
            warn!(
                registration_id = %registration.id(),
                %amount,
                entry_fee = %event.entry_fee,
                "rejecting payment with stale amount"
            );
            return Err(PaymentError::AmountMismatch {
                expected: event.entry_fee,
                submitted: amount,
            });
        }

        if let Some(outstanding) = self
            .payments
            .find_outstanding_for_registration(registration.id())
            .await
            .map_err(PaymentError::Storage)?
        {
            return Err(PaymentError::IntentOutstanding(outstanding.registration_id()));
        }

        let session = self
            .gateway
            .create_payment_intent(amount, registration.id(), registration.event_id())
            .await
            .map_err(|e| match e {
                GatewayError::Transport(msg) | GatewayError::Rejected(msg) => {
                    PaymentError::GatewayUnavailable(msg)
                }
                GatewayError::Schema(msg) => PaymentError::GatewayUnavailable(msg),
            })?;

        let intent = PaymentIntent::new(registration.id(), amount, session.merchant_order_id)
            .map_err(PaymentError::Storage)?;
        self.payments
            .save(&intent)
            .await
            .map_err(PaymentError::Storage)?;

        info!(
            registration_id = %registration.id(),
            merchant_order_id = %intent.merchant_order_id(),
            %amount,
            "payment intent created"
        );

        Ok((intent, session.access))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::GameMode;
    use crate::domain::registration::RegistrationParty;
    use crate::infrastructure::gateway::MockPaymentGateway;
    use crate::infrastructure::repositories::InMemoryPaymentIntentRepository;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn paid_event(fee: Decimal) -> Event {
        let now = Utc::now();
        Event {
            id: Uuid::new_v4(),
            title: "Clash Cup".to_string(),
            game_mode: GameMode::Duo,
            entry_fee: fee,
            registration_opens_at: now - Duration::hours(1),
            registration_closes_at: now + Duration::hours(1),
            max_participants: 8,
            current_participants: 0,
        }
    }

    fn registration(event_id: Uuid) -> Registration {
        Registration::new(
            event_id,
            Uuid::new_v4(),
            RegistrationParty::NewTeam {
                name: "Night Owls".to_string(),
            },
        )
        .0
    }

    #[tokio::test]
    async fn creates_intent_when_amount_matches_fee() {
        let event = paid_event(Decimal::from(100));
        let registration = registration(event.id);
        let payments = Arc::new(InMemoryPaymentIntentRepository::new());
        let orchestrator =
            PaymentOrchestrator::new(Arc::new(MockPaymentGateway::embedded()), payments.clone());

        let (intent, access) = orchestrator
            .initiate_payment(&registration, Decimal::from(100), &event)
            .await
            .unwrap();

        assert_eq!(intent.amount(), Decimal::from(100));
        assert_eq!(intent.registration_id(), registration.id());
        assert!(matches!(access, CheckoutAccess::Embedded { .. }));
        assert!(payments
            .find_by_merchant_order_id(intent.merchant_order_id())
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn amount_mismatch_is_fatal_and_never_coerced() {
        let event = paid_event(Decimal::from(100));
        let registration = registration(event.id);
        let payments = Arc::new(InMemoryPaymentIntentRepository::new());
        let orchestrator =
            PaymentOrchestrator::new(Arc::new(MockPaymentGateway::embedded()), payments.clone());

        let result = orchestrator
            .initiate_payment(&registration, Decimal::from(90), &event)
            .await;

        assert!(matches!(result, Err(PaymentError::AmountMismatch { .. })));
        assert!(payments
            .find_outstanding_for_registration(registration.id())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn second_intent_rejected_while_first_outstanding() {
        let event = paid_event(Decimal::from(100));
        let registration = registration(event.id);
        let payments = Arc::new(InMemoryPaymentIntentRepository::new());
        let orchestrator =
            PaymentOrchestrator::new(Arc::new(MockPaymentGateway::embedded()), payments);

        orchestrator
            .initiate_payment(&registration, Decimal::from(100), &event)
            .await
            .unwrap();
        let result = orchestrator
            .initiate_payment(&registration, Decimal::from(100), &event)
            .await;

        assert!(matches!(result, Err(PaymentError::IntentOutstanding(_))));
    }

    #[tokio::test]
    async fn gateway_transport_error_is_retryable_unavailable() {
        let event = paid_event(Decimal::from(100));
        let registration = registration(event.id);
        let orchestrator = PaymentOrchestrator::new(
            Arc::new(MockPaymentGateway::unreachable()),
            Arc::new(InMemoryPaymentIntentRepository::new()),
        );

        let result = orchestrator
            .initiate_payment(&registration, Decimal::from(100), &event)
            .await;

        assert!(matches!(result, Err(PaymentError::GatewayUnavailable(_))));
    }
}
