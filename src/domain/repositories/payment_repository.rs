use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::payment::PaymentIntent;

/// Repository trait for the PaymentIntent aggregate
#[async_trait]
pub trait PaymentIntentRepository: Send + Sync {
    /// Save a payment intent (insert or update)
    async fn save(&self, intent: &PaymentIntent) -> Result<(), String>;

    /// Find an intent by its ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<PaymentIntent>, String>;

    /// Find an intent by the gateway's external reference id
    async fn find_by_merchant_order_id(
        &self,
        merchant_order_id: &str,
    ) -> Result<Option<PaymentIntent>, String>;

    /// Find the outstanding (non-terminal) intent for a registration, if any
    ///
    /// A registration must never acquire a second active intent while one
    /// is outstanding; the orchestrator checks through this method.
    async fn find_outstanding_for_registration(
        &self,
        registration_id: Uuid,
    ) -> Result<Option<PaymentIntent>, String>;
}
