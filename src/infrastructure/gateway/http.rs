use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::payment::PaymentStatus;
use crate::orchestration::gateway::{
    CheckoutAccess, CheckoutSession, GatewayError, PaymentGateway, PaymentStatusResponse,
};

#[derive(Debug, Serialize)]
struct CreateOrderRequest {
    amount: Decimal,
    registration_id: Uuid,
    event_id: Uuid,
}

/// Wire shape of the gateway's order-creation endpoint
///
/// Exactly one schema: `merchant_order_id` plus a checkout token and/or
/// redirect URL. Anything else is a schema violation, not a fallback.
#[derive(Debug, Deserialize)]
struct CreateOrderResponse {
    merchant_order_id: String,
    checkout_token: Option<String>,
    redirect_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OrderStatusResponse {
    status: String,
    registration_id: Option<Uuid>,
}

fn parse_status(raw: &str) -> Result<PaymentStatus, GatewayError> {
    match raw {
        "created" => Ok(PaymentStatus::Created),
        "pending" => Ok(PaymentStatus::Pending),
        "completed" => Ok(PaymentStatus::Completed),
        "failed" => Ok(PaymentStatus::Failed),
        "cancelled" => Ok(PaymentStatus::Cancelled),
        other => Err(GatewayError::Schema(format!(
            "unknown payment status: {}",
            other
        ))),
    }
}

/// HTTP adapter for the external payment gateway
pub struct HttpPaymentGateway {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpPaymentGateway {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn create_payment_intent(
        &self,
        amount: Decimal,
        registration_id: Uuid,
        event_id: Uuid,
    ) -> Result<CheckoutSession, GatewayError> {
        let response = self
            .client
            .post(format!("{}/orders", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&CreateOrderRequest {
                amount,
                registration_id,
                event_id,
            })
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GatewayError::Rejected(format!(
                "order creation returned {}",
                response.status()
            )));
        }

        let body: CreateOrderResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Schema(e.to_string()))?;

        // Embedded checkout is preferred; redirect is the fallback
        let access = match (body.checkout_token, body.redirect_url) {
            (Some(checkout_token), _) => CheckoutAccess::Embedded { checkout_token },
            (None, Some(redirect_url)) => CheckoutAccess::Redirect { redirect_url },
            (None, None) => {
                return Err(GatewayError::Schema(
                    "order response carries neither checkout token nor redirect url".to_string(),
                ))
            }
        };

        Ok(CheckoutSession {
            merchant_order_id: body.merchant_order_id,
            access,
        })
    }

    async fn get_payment_status(
        &self,
        merchant_order_id: &str,
    ) -> Result<PaymentStatusResponse, GatewayError> {
        let response = self
            .client
            .get(format!(
                "{}/orders/{}/status",
                self.base_url, merchant_order_id
            ))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GatewayError::Rejected(format!(
                "status probe returned {}",
                response.status()
            )));
        }

        let body: OrderStatusResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Schema(e.to_string()))?;

        Ok(PaymentStatusResponse {
            status: parse_status(&body.status)?,
            registration_id: body.registration_id,
        })
    }
}
