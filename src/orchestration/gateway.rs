use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::payment::PaymentStatus;

/// How the user reaches the external checkout surface
///
/// Embedded checkout is preferred when the gateway grants a widget
/// token; the full redirect is the fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckoutAccess {
    Embedded { checkout_token: String },
    Redirect { redirect_url: String },
}

/// Validated response of the gateway's intent-creation endpoint
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    pub merchant_order_id: String,
    pub access: CheckoutAccess,
}

/// Validated response of the gateway's status endpoint
///
/// One schema per endpoint: a completed payment must carry the
/// registration id it confirmed, and divergent key names are a schema
/// violation on the adapter side, never a fallback chain here.
#[derive(Debug, Clone)]
pub struct PaymentStatusResponse {
    pub status: PaymentStatus,
    pub registration_id: Option<Uuid>,
}

/// Terminal signals the checkout surface can yield
///
/// A redirect flow yields no signal at all; reconciliation then happens
/// lazily when the user next checks the registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutSignal {
    /// The user aborted checkout
    UserCancel,
    /// Checkout finished from the user's perspective; the backend status
    /// must still be reconciled and is never trusted directly
    Concluded,
}

/// Failures talking to the payment gateway
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// Network-level failure; poll attempts retry on this
    #[error("gateway transport error: {0}")]
    Transport(String),

    /// The gateway answered but refused the request
    #[error("gateway rejected the request: {0}")]
    Rejected(String),

    /// The gateway answered with a payload that does not match the
    /// endpoint's schema
    #[error("gateway response violates schema: {0}")]
    Schema(String),
}

/// Payment gateway adapter
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a payment intent for the given amount, tied to a
    /// registration and event, and return the checkout session
    async fn create_payment_intent(
        &self,
        amount: Decimal,
        registration_id: Uuid,
        event_id: Uuid,
    ) -> Result<CheckoutSession, GatewayError>;

    /// Query the authoritative payment status by external reference id
    async fn get_payment_status(
        &self,
        merchant_order_id: &str,
    ) -> Result<PaymentStatusResponse, GatewayError>;
}
