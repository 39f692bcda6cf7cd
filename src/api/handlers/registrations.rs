use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::AppState;
use crate::domain::registration::{FailureReason, RegistrationStatus};
use crate::domain::roster::{Captain, Email, RosterSubmission};
use crate::orchestration::gateway::{CheckoutAccess, CheckoutSignal};
use crate::orchestration::poller::ReconciliationOutcome;

/// Request body for submitting a registration
#[derive(Debug, Deserialize)]
pub struct SubmitRegistrationRequest {
    pub captain_user_id: Uuid,
    pub captain_email: String,
    pub roster: RosterSubmission,
}

/// Response from a registration submission
#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub registration_id: Uuid,
    pub status: RegistrationStatus,
    pub requires_payment: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkout: Option<CheckoutAccess>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub invite_failures: Vec<String>,
}

/// Response from a status lookup
#[derive(Debug, Serialize)]
pub struct RegistrationStatusResponse {
    pub registration_id: Uuid,
    pub status: RegistrationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<FailureReason>,
}

/// Request body carrying a checkout surface signal
#[derive(Debug, Deserialize)]
pub struct CheckoutSignalRequest {
    pub signal: CheckoutSignal,
}

/// Response from an on-demand reconciliation
#[derive(Debug, Serialize)]
pub struct ReconcileResponse {
    pub registration_id: Uuid,
    pub outcome: String,
    pub status: RegistrationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<FailureReason>,
}

#[derive(Debug, Serialize)]
pub struct CancelReconciliationResponse {
    pub cancelled: bool,
}

/// Submit a registration for an event
///
/// POST /api/events/:event_id/registrations
pub async fn submit_registration(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(req): Json<SubmitRegistrationRequest>,
) -> Result<(StatusCode, Json<SubmissionResponse>), ApiError> {
    let email = Email::new(&req.captain_email).map_err(ApiError::bad_request)?;
    let captain = Captain {
        user_id: req.captain_user_id,
        email,
    };

    let receipt = state
        .ledger
        .submit_registration(event_id, captain, req.roster)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmissionResponse {
            registration_id: receipt.registration_id,
            status: receipt.status,
            requires_payment: receipt.requires_payment,
            checkout: receipt.checkout,
            invite_failures: receipt.invite_failures,
        }),
    ))
}

/// Get a registration's status
///
/// GET /api/registrations/:id
pub async fn get_registration_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RegistrationStatusResponse>, ApiError> {
    let (status, reason) = state.ledger.registration_status(id).await?;

    Ok(Json(RegistrationStatusResponse {
        registration_id: id,
        status,
        reason,
    }))
}

/// Receive a terminal signal from the checkout surface
///
/// POST /api/registrations/:id/checkout-signal
///
/// `user_cancel` fails the registration immediately. `concluded` starts
/// background reconciliation; the checkout result is never trusted
/// directly, so the response only acknowledges the signal.
pub async fn checkout_signal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CheckoutSignalRequest>,
) -> Result<(StatusCode, Json<RegistrationStatusResponse>), ApiError> {
    match req.signal {
        CheckoutSignal::UserCancel => {
            state.ledger.abort_checkout(id).await?;
            let (status, reason) = state.ledger.registration_status(id).await?;
            Ok((
                StatusCode::OK,
                Json(RegistrationStatusResponse {
                    registration_id: id,
                    status,
                    reason,
                }),
            ))
        }
        CheckoutSignal::Concluded => {
            let (status, reason) = state.ledger.registration_status(id).await?;
            if status != RegistrationStatus::PendingPayment {
                return Err(ApiError::conflict(format!(
                    "nothing to reconcile in {} status",
                    status
                )));
            }

            let ledger = state.ledger.clone();
            tokio::spawn(async move {
                if let Err(e) = ledger.reconcile_registration(id).await {
                    error!(registration_id = %id, error = %e, "background reconciliation failed");
                }
            });

            Ok((
                StatusCode::ACCEPTED,
                Json(RegistrationStatusResponse {
                    registration_id: id,
                    status,
                    reason,
                }),
            ))
        }
    }
}

/// Reconcile a pending registration on demand
///
/// POST /api/registrations/:id/reconcile
///
/// Used by the redirect flow, where the checkout surface yields no
/// signal and the browser returns later.
pub async fn reconcile_registration(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReconcileResponse>, ApiError> {
    let outcome = state.ledger.reconcile_registration(id).await?;
    let (status, reason) = state.ledger.registration_status(id).await?;

    let outcome = match outcome {
        ReconciliationOutcome::Completed { .. } => "completed",
        ReconciliationOutcome::Failed => "failed",
        ReconciliationOutcome::TimedOut => "timed_out",
        ReconciliationOutcome::Cancelled => "cancelled",
    };

    Ok(Json(ReconcileResponse {
        registration_id: id,
        outcome: outcome.to_string(),
        status,
        reason,
    }))
}

/// Cancel a live reconciliation loop
///
/// DELETE /api/registrations/:id/reconciliation
///
/// The registration stays pending; the payment may still complete
/// server-side and reconciliation resumes on the next visit.
pub async fn cancel_reconciliation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CancelReconciliationResponse>, ApiError> {
    let cancelled = state.ledger.cancel_pending_reconciliation(id);
    Ok(Json(CancelReconciliationResponse { cancelled }))
}
