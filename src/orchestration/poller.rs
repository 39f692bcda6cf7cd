use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, warn};
use uuid::Uuid;

use super::gateway::PaymentGateway;
use crate::domain::payment::PaymentStatus;

/// Timing budget for a reconciliation loop
///
/// Observed gateway behavior: first status check after ~1s, then every
/// ~2s. The wall-clock budget bounds the loop; without it a perpetually
/// pending payment would poll forever.
#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    pub initial_delay: Duration,
    pub interval: Duration,
    pub budget: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            interval: Duration::from_secs(2),
            budget: Duration::from_secs(300),
        }
    }
}

/// Terminal outcome of a reconciliation loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconciliationOutcome {
    /// The gateway reported the payment captured, with the registration
    /// it confirmed
    Completed { registration_id: Uuid },
    /// The gateway reported the payment failed or cancelled
    Failed,
    /// The budget ran out without a terminal status; the user must be
    /// pointed at support rather than silently losing the fee
    TimedOut,
    /// The caller cancelled the loop; the payment may still complete
    /// server-side, so nothing is decided
    Cancelled,
}

/// Polls the gateway's status endpoint until a terminal outcome
pub struct ReconciliationPoller {
    gateway: Arc<dyn PaymentGateway>,
    config: PollConfig,
}

impl ReconciliationPoller {
    pub fn new(gateway: Arc<dyn PaymentGateway>, config: PollConfig) -> Self {
        Self { gateway, config }
    }

    /// Runs the bounded polling loop for one payment intent
    ///
    /// A `completed` status without a registration id is not terminal:
    /// the confirmation is not authoritative yet, so the loop keeps
    /// polling within its budget. Transport errors retry but count
    /// toward the budget. Flipping `cancel` suspends nothing mid-probe;
    /// it takes effect at the next suspension point.
    pub async fn reconcile(
        &self,
        merchant_order_id: &str,
        cancel: &mut watch::Receiver<bool>,
    ) -> ReconciliationOutcome {
        if *cancel.borrow() {
            return ReconciliationOutcome::Cancelled;
        }

        let deadline = Instant::now() + self.config.budget;
        let mut delay = self.config.initial_delay;
        let mut attempt: u32 = 0;

        loop {
            let wake = Instant::now() + delay;
            if wake > deadline {
                warn!(%merchant_order_id, attempt, "reconciliation budget exhausted");
                return ReconciliationOutcome::TimedOut;
            }

            tokio::select! {
                _ = cancel.changed() => {
                    debug!(%merchant_order_id, "reconciliation cancelled");
                    return ReconciliationOutcome::Cancelled;
                }
                _ = sleep_until(wake) => {}
            }

            delay = self.config.interval;
            attempt += 1;

            match self.gateway.get_payment_status(merchant_order_id).await {
                Ok(response) => match response.status {
                    PaymentStatus::Completed => match response.registration_id {
                        Some(registration_id) => {
                            debug!(%merchant_order_id, attempt, "payment completed");
                            return ReconciliationOutcome::Completed { registration_id };
                        }
                        None => {
                            // Completed without a confirmed registration id
                            // is not authoritative yet
                            warn!(
                                %merchant_order_id,
                                attempt,
                                "completed status without registration id, retrying"
                            );
                        }
                    },
                    PaymentStatus::Failed | PaymentStatus::Cancelled => {
                        debug!(%merchant_order_id, attempt, status = %response.status, "payment failed");
                        return ReconciliationOutcome::Failed;
                    }
                    PaymentStatus::Created | PaymentStatus::Pending => {
                        debug!(%merchant_order_id, attempt, status = %response.status, "payment not terminal yet");
                    }
                },
                Err(e) => {
                    warn!(%merchant_order_id, attempt, error = %e, "status probe failed, retrying");
                }
            }
        }
    }
}
