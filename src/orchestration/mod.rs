// Registration and payment orchestration
//
// This module contains the service layer that turns a validated roster
// into a confirmed seat: the registration ledger, payment orchestrator,
// and the bounded status reconciliation poller.

pub mod errors;
pub mod gateway;
pub mod ledger;
pub mod orchestrator;
pub mod poller;

// Re-export main types
pub use errors::{PaymentError, RegistrationError, RegistrationResult};
pub use gateway::{CheckoutAccess, CheckoutSession, CheckoutSignal, PaymentGateway};
pub use ledger::{RegistrationLedger, SubmissionReceipt};
pub use orchestrator::PaymentOrchestrator;
pub use poller::{PollConfig, ReconciliationOutcome, ReconciliationPoller};
