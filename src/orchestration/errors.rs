use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::roster::RosterError;

/// Errors raised while creating a payment intent
#[derive(Debug, Error)]
pub enum PaymentError {
    /// The submitted amount diverged from the event's entry fee.
    /// Fatal: indicates a stale event snapshot; the caller must refetch
    /// the event, never coerce the amount.
    #[error("payment amount {submitted} does not match the entry fee {expected}")]
    AmountMismatch {
        expected: Decimal,
        submitted: Decimal,
    },

    /// The gateway could not be reached or rejected the request at the
    /// transport level. Retryable.
    #[error("payment gateway unavailable: {0}")]
    GatewayUnavailable(String),

    /// The registration already holds a non-terminal payment intent
    #[error("registration {0} already has an outstanding payment intent")]
    IntentOutstanding(Uuid),

    #[error("payment storage error: {0}")]
    Storage(String),
}

/// Errors raised while driving a registration through its lifecycle
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error(transparent)]
    Roster(#[from] RosterError),

    /// The party already has an active registration for this event
    #[error("already registered for this event")]
    AlreadyRegistered,

    /// The event has no remaining capacity
    #[error("event is full")]
    EventFull,

    /// The registration window is closed
    #[error("registration for this event is not open")]
    EventNotOpen,

    #[error("event not found: {0}")]
    EventNotFound(Uuid),

    #[error("registration not found: {0}")]
    NotFound(Uuid),

    #[error("team not found: {0}")]
    TeamNotFound(Uuid),

    /// A reconciliation task is already polling for this registration
    #[error("reconciliation already in progress for registration {0}")]
    ReconciliationInProgress(Uuid),

    /// The requested operation does not apply to the registration's
    /// current status
    #[error("invalid registration state: {0}")]
    InvalidState(String),

    #[error(transparent)]
    Payment(#[from] PaymentError),

    #[error("storage error: {0}")]
    Storage(String),
}

pub type RegistrationResult<T> = Result<T, RegistrationError>;
