use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::payment::PaymentStatus;
use crate::orchestration::gateway::{
    CheckoutAccess, CheckoutSession, GatewayError, PaymentGateway, PaymentStatusResponse,
};

enum SessionKind {
    Embedded,
    Redirect,
    Unreachable,
}

/// Scripted payment gateway for tests and local development
///
/// Status probes consume a queued script; once drained, the gateway
/// reports `pending` forever, which is exactly what a stuck payment
/// looks like to the poller.
pub struct MockPaymentGateway {
    kind: SessionKind,
    statuses: Mutex<VecDeque<Result<PaymentStatusResponse, GatewayError>>>,
}

impl MockPaymentGateway {
    /// Gateway granting an embedded checkout token
    pub fn embedded() -> Self {
        Self {
            kind: SessionKind::Embedded,
            statuses: Mutex::new(VecDeque::new()),
        }
    }

    /// Gateway granting only a redirect URL
    pub fn redirect() -> Self {
        Self {
            kind: SessionKind::Redirect,
            statuses: Mutex::new(VecDeque::new()),
        }
    }

    /// Gateway that fails every request at the transport level
    pub fn unreachable() -> Self {
        Self {
            kind: SessionKind::Unreachable,
            statuses: Mutex::new(VecDeque::new()),
        }
    }

    /// Queues the next status probe response
    pub fn queue_status(&self, response: PaymentStatusResponse) {
        self.statuses
            .lock()
            .expect("status script poisoned")
            .push_back(Ok(response));
    }

    /// Queues a failing status probe
    pub fn queue_error(&self, error: GatewayError) {
        self.statuses
            .lock()
            .expect("status script poisoned")
            .push_back(Err(error));
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn create_payment_intent(
        &self,
        _amount: Decimal,
        _registration_id: Uuid,
        _event_id: Uuid,
    ) -> Result<CheckoutSession, GatewayError> {
        let merchant_order_id = format!("ord_{}", Uuid::new_v4().simple());
        match self.kind {
            SessionKind::Embedded => Ok(CheckoutSession {
                merchant_order_id,
                access: CheckoutAccess::Embedded {
                    checkout_token: Uuid::new_v4().simple().to_string(),
                },
            }),
            SessionKind::Redirect => Ok(CheckoutSession {
                access: CheckoutAccess::Redirect {
                    redirect_url: format!("https://pay.example.com/checkout/{}", merchant_order_id),
                },
                merchant_order_id,
            }),
            SessionKind::Unreachable => {
                Err(GatewayError::Transport("connection refused".to_string()))
            }
        }
    }

    async fn get_payment_status(
        &self,
        _merchant_order_id: &str,
    ) -> Result<PaymentStatusResponse, GatewayError> {
        if matches!(self.kind, SessionKind::Unreachable) {
            return Err(GatewayError::Transport("connection refused".to_string()));
        }

        self.statuses
            .lock()
            .expect("status script poisoned")
            .pop_front()
            .unwrap_or(Ok(PaymentStatusResponse {
                status: PaymentStatus::Pending,
                registration_id: None,
            }))
    }
}
