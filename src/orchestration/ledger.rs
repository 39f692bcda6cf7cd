use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tokio::sync::watch;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::errors::{RegistrationError, RegistrationResult};
use super::gateway::{CheckoutAccess, PaymentGateway};
use super::orchestrator::PaymentOrchestrator;
use super::poller::{PollConfig, ReconciliationOutcome, ReconciliationPoller};
use crate::domain::event::Event;
use crate::domain::invite::{issue_invites, Invite};
use crate::domain::registration::{
    FailureReason, Registration, RegistrationParty, RegistrationStatus,
};
use crate::domain::repositories::{
    EventRepository, InviteRepository, PaymentIntentRepository, RegistrationRepository,
    TeamDirectory,
};
use crate::domain::roster::{resolve_roster, Captain, Roster, RosterSubmission};

/// Outcome handed back to the caller after a submission
#[derive(Debug, Clone)]
pub struct SubmissionReceipt {
    pub registration_id: Uuid,
    pub status: RegistrationStatus,
    pub requires_payment: bool,
    /// Present when payment is required: how to reach checkout
    pub checkout: Option<CheckoutAccess>,
    /// Per-email invite failures; successes were issued regardless
    pub invite_failures: Vec<String>,
}

/// Registration Ledger
///
/// Owns the authoritative state of every registration: creates them once
/// a roster validates, enforces the at-most-one-active invariant, drives
/// payment orchestration and reconciliation, and is the only place a
/// registration transitions.
pub struct RegistrationLedger {
    events: Arc<dyn EventRepository>,
    registrations: Arc<dyn RegistrationRepository>,
    payments: Arc<dyn PaymentIntentRepository>,
    invites: Arc<dyn InviteRepository>,
    teams: Arc<dyn TeamDirectory>,
    orchestrator: PaymentOrchestrator,
    poller: ReconciliationPoller,
    /// One cancellation handle per registration with a live poll loop
    active_polls: Mutex<HashMap<Uuid, watch::Sender<bool>>>,
}

impl RegistrationLedger {
    pub fn new(
        events: Arc<dyn EventRepository>,
        registrations: Arc<dyn RegistrationRepository>,
        payments: Arc<dyn PaymentIntentRepository>,
        invites: Arc<dyn InviteRepository>,
        teams: Arc<dyn TeamDirectory>,
        gateway: Arc<dyn PaymentGateway>,
        poll_config: PollConfig,
    ) -> Self {
        Self {
            events,
            registrations,
            payments: payments.clone(),
            invites,
            teams,
            orchestrator: PaymentOrchestrator::new(gateway.clone(), payments),
            poller: ReconciliationPoller::new(gateway, poll_config),
            active_polls: Mutex::new(HashMap::new()),
        }
    }

    /// Submits a registration for an event
    ///
    /// Validates the roster, enforces uniqueness, creates the
    /// registration in `Initiated`, issues invites for ad-hoc teams, and
    /// either confirms synchronously (free events, under the atomic seat
    /// claim) or creates a payment intent and moves to `PendingPayment`.
    pub async fn submit_registration(
        &self,
        event_id: Uuid,
        captain: Captain,
        submission: RosterSubmission,
    ) -> RegistrationResult<SubmissionReceipt> {
        let event = self
            .events
            .find_by_id(event_id)
            .await
            .map_err(RegistrationError::Storage)?
            .ok_or(RegistrationError::EventNotFound(event_id))?;

        if !event.is_open_at(Utc::now()) {
            return Err(RegistrationError::EventNotOpen);
        }

        let roster = self.resolve(&event, &captain, &submission).await?;

        let party = match &submission {
            RosterSubmission::ExistingTeam { team_id, .. } => RegistrationParty::ExistingTeam {
                team_id: *team_id,
            },
            RosterSubmission::NewTeam { team_name, .. } => RegistrationParty::NewTeam {
                name: team_name.clone(),
            },
        };

        // Uniqueness check and insert are one atomic repository call:
        // two concurrent identical submissions can never both land.
        let (mut registration, _events) =
            Registration::new(event_id, captain.user_id, party.clone());
        let inserted = self
            .registrations
            .try_insert_active(&registration)
            .await
            .map_err(RegistrationError::Storage)?;
        if !inserted {
            return Err(RegistrationError::AlreadyRegistered);
        }

        info!(
            registration_id = %registration.id(),
            %event_id,
            captain_id = %captain.user_id,
            "registration initiated"
        );

        let invite_failures = self
            .issue_roster_invites(&registration, &party, &roster)
            .await?;

        if event.is_free() {
            self.confirm_with_seat_claim(&mut registration, &event).await?;
            return Ok(SubmissionReceipt {
                registration_id: registration.id(),
                status: registration.status(),
                requires_payment: false,
                checkout: None,
                invite_failures,
            });
        }

        match self
            .orchestrator
            .initiate_payment(&registration, event.entry_fee, &event)
            .await
        {
            Ok((intent, access)) => {
                registration
                    .require_payment(intent.id())
                    .map_err(RegistrationError::Storage)?;
                self.registrations
                    .save(&registration)
                    .await
                    .map_err(RegistrationError::Storage)?;

                Ok(SubmissionReceipt {
                    registration_id: registration.id(),
                    status: registration.status(),
                    requires_payment: true,
                    checkout: Some(access),
                    invite_failures,
                })
            }
            Err(e) => {
                // The registration must not linger in a non-terminal
                // state the user cannot act on; cancel so a resubmission
                // is not blocked by the uniqueness check.
                warn!(
                    registration_id = %registration.id(),
                    error = %e,
                    "payment initiation failed, cancelling registration"
                );
                registration.cancel().map_err(RegistrationError::Storage)?;
                self.registrations
                    .save(&registration)
                    .await
                    .map_err(RegistrationError::Storage)?;
                self.revoke_invites(registration.id()).await;
                Err(e.into())
            }
        }
    }

    /// Current status of a registration, with the failure reason when
    /// one exists
    pub async fn registration_status(
        &self,
        registration_id: Uuid,
    ) -> RegistrationResult<(RegistrationStatus, Option<FailureReason>)> {
        let registration = self.load(registration_id).await?;
        Ok((registration.status(), registration.failure_reason()))
    }

    /// Handles the user aborting checkout
    ///
    /// The same intent is never retried: the registration fails with a
    /// distinguishable reason and its invites are revoked.
    pub async fn abort_checkout(&self, registration_id: Uuid) -> RegistrationResult<()> {
        let mut registration = self.load(registration_id).await?;
        if registration.status() != RegistrationStatus::PendingPayment {
            return Err(RegistrationError::InvalidState(format!(
                "checkout cannot be aborted in {} status",
                registration.status()
            )));
        }

        if let Some(intent_id) = registration.payment_intent_id() {
            if let Some(mut intent) = self
                .payments
                .find_by_id(intent_id)
                .await
                .map_err(RegistrationError::Storage)?
            {
                if intent.cancel().is_ok() {
                    self.payments
                        .save(&intent)
                        .await
                        .map_err(RegistrationError::Storage)?;
                }
            }
        }

        registration
            .fail(FailureReason::UserCancelled)
            .map_err(RegistrationError::Storage)?;
        self.registrations
            .save(&registration)
            .await
            .map_err(RegistrationError::Storage)?;
        self.revoke_invites(registration_id).await;

        info!(%registration_id, "checkout aborted by user");
        Ok(())
    }

    /// Reconciles a registration's payment against the gateway
    ///
    /// Invoked after a `concluded` checkout signal, or on demand when the
    /// user returns to a pending registration. Runs the bounded poll loop
    /// and applies the terminal outcome to the registration.
    pub async fn reconcile_registration(
        &self,
        registration_id: Uuid,
    ) -> RegistrationResult<ReconciliationOutcome> {
        let mut registration = self.load(registration_id).await?;

        match registration.status() {
            RegistrationStatus::PendingPayment => {}
            RegistrationStatus::Confirmed => {
                return Ok(ReconciliationOutcome::Completed { registration_id });
            }
            other => {
                return Err(RegistrationError::InvalidState(format!(
                    "nothing to reconcile in {} status",
                    other
                )));
            }
        }

        let intent_id = registration
            .payment_intent_id()
            .ok_or_else(|| RegistrationError::InvalidState("no payment intent".to_string()))?;
        let mut intent = self
            .payments
            .find_by_id(intent_id)
            .await
            .map_err(RegistrationError::Storage)?
            .ok_or_else(|| {
                RegistrationError::Storage(format!("payment intent not found: {}", intent_id))
            })?;

        // Checkout is underway; only the backend status decides from here
        if intent.mark_pending().is_ok() {
            self.payments
                .save(&intent)
                .await
                .map_err(RegistrationError::Storage)?;
        }

        let mut cancel_rx = self.register_poll(registration_id)?;
        let outcome = self
            .poller
            .reconcile(intent.merchant_order_id(), &mut cancel_rx)
            .await;
        self.unregister_poll(registration_id);

        match outcome {
            ReconciliationOutcome::Completed {
                registration_id: confirmed_id,
            } => {
                if confirmed_id != registration_id {
                    warn!(
                        %registration_id,
                        %confirmed_id,
                        "gateway confirmed a different registration id"
                    );
                }
                if intent.complete().is_ok() {
                    self.payments
                        .save(&intent)
                        .await
                        .map_err(RegistrationError::Storage)?;
                }

                let event = self
                    .events
                    .find_by_id(registration.event_id())
                    .await
                    .map_err(RegistrationError::Storage)?
                    .ok_or(RegistrationError::EventNotFound(registration.event_id()))?;
                self.confirm_with_seat_claim(&mut registration, &event).await?;
                Ok(ReconciliationOutcome::Completed { registration_id })
            }
            ReconciliationOutcome::Failed => {
                if intent.fail().is_ok() {
                    self.payments
                        .save(&intent)
                        .await
                        .map_err(RegistrationError::Storage)?;
                }
                self.fail_registration(&mut registration, FailureReason::PaymentFailed)
                    .await?;
                Ok(ReconciliationOutcome::Failed)
            }
            ReconciliationOutcome::TimedOut => {
                // The intent stays pending: the payment may yet complete
                // server-side and support can resolve it manually.
                self.fail_registration(&mut registration, FailureReason::Timeout)
                    .await?;
                Ok(ReconciliationOutcome::TimedOut)
            }
            ReconciliationOutcome::Cancelled => {
                // Recoverable: the registration stays pending_payment and
                // reconciliation restarts on the next visit.
                info!(%registration_id, "reconciliation cancelled, registration stays pending");
                Ok(ReconciliationOutcome::Cancelled)
            }
        }
    }

    /// Cancels a live reconciliation loop, if one is polling
    ///
    /// Returns whether a loop was actually cancelled. The registration
    /// remains `pending_payment`; a forced failure would be wrong since
    /// the payment may still complete server-side.
    pub fn cancel_pending_reconciliation(&self, registration_id: Uuid) -> bool {
        let polls = self.active_polls.lock().expect("poll registry poisoned");
        match polls.get(&registration_id) {
            Some(tx) => tx.send(true).is_ok(),
            None => false,
        }
    }

    // ===== internals =====

    async fn resolve(
        &self,
        event: &Event,
        captain: &Captain,
        submission: &RosterSubmission,
    ) -> RegistrationResult<Roster> {
        let members = match submission {
            RosterSubmission::ExistingTeam { team_id, .. } => {
                let members = self
                    .teams
                    .get_team_members(*team_id)
                    .await
                    .map_err(RegistrationError::Storage)?
                    .ok_or(RegistrationError::TeamNotFound(*team_id))?;
                Some(members.into_iter().map(|m| m.user_id).collect::<Vec<_>>())
            }
            RosterSubmission::NewTeam { .. } => None,
        };

        Ok(resolve_roster(
            event.game_mode,
            captain,
            submission,
            members.as_deref(),
        )?)
    }

    async fn issue_roster_invites(
        &self,
        registration: &Registration,
        party: &RegistrationParty,
        roster: &Roster,
    ) -> RegistrationResult<Vec<String>> {
        let (team_name, emails) = match (party, roster) {
            (RegistrationParty::NewTeam { name }, Roster::PendingInvites(emails)) => {
                (name.clone(), emails)
            }
            _ => return Ok(Vec::new()),
        };

        let mut failures = Vec::new();
        for result in issue_invites(
            registration.id(),
            registration.event_id(),
            &team_name,
            emails,
            &[],
            Utc::now(),
        ) {
            match result {
                Ok(invite) => {
                    self.invites
                        .save(&invite)
                        .await
                        .map_err(RegistrationError::Storage)?;
                }
                Err(e) => failures.push(e.to_string()),
            }
        }

        Ok(failures)
    }

    /// Confirms a registration under the atomic per-event seat claim
    ///
    /// Claiming and confirming are the only operations touching the
    /// shared participant count; the claim itself is serialized inside
    /// the event repository.
    async fn confirm_with_seat_claim(
        &self,
        registration: &mut Registration,
        event: &Event,
    ) -> RegistrationResult<()> {
        let claimed = self
            .events
            .try_claim_seat(event.id)
            .await
            .map_err(RegistrationError::Storage)?;

        if !claimed {
            self.fail_registration(registration, FailureReason::EventFull)
                .await?;
            return Err(RegistrationError::EventFull);
        }

        registration.confirm().map_err(RegistrationError::Storage)?;
        if let Err(e) = self.registrations.save(registration).await {
            // Do not leak the seat if the confirmation cannot be recorded
            if let Err(release_err) = self.events.release_seat(event.id).await {
                error!(
                    registration_id = %registration.id(),
                    error = %release_err,
                    "failed to release seat after save failure"
                );
            }
            return Err(RegistrationError::Storage(e));
        }

        info!(
            registration_id = %registration.id(),
            event_id = %event.id,
            "registration confirmed"
        );
        Ok(())
    }

    async fn fail_registration(
        &self,
        registration: &mut Registration,
        reason: FailureReason,
    ) -> RegistrationResult<()> {
        registration.fail(reason).map_err(RegistrationError::Storage)?;
        self.registrations
            .save(registration)
            .await
            .map_err(RegistrationError::Storage)?;
        self.revoke_invites(registration.id()).await;

        info!(
            registration_id = %registration.id(),
            %reason,
            "registration failed"
        );
        Ok(())
    }

    /// Revokes pending invites so an ad-hoc team can never materialize
    /// without a valid registration
    async fn revoke_invites(&self, registration_id: Uuid) {
        let invites: Vec<Invite> = match self.invites.find_by_registration(registration_id).await {
            Ok(invites) => invites,
            Err(e) => {
                error!(%registration_id, error = %e, "failed to load invites for revocation");
                return;
            }
        };

        for mut invite in invites {
            if invite.revoke().is_ok() {
                if let Err(e) = self.invites.save(&invite).await {
                    error!(
                        invite_id = %invite.id(),
                        error = %e,
                        "failed to persist invite revocation"
                    );
                }
            }
        }
    }

    fn register_poll(&self, registration_id: Uuid) -> RegistrationResult<watch::Receiver<bool>> {
        let mut polls = self.active_polls.lock().expect("poll registry poisoned");
        if polls.contains_key(&registration_id) {
            return Err(RegistrationError::ReconciliationInProgress(registration_id));
        }
        let (tx, rx) = watch::channel(false);
        polls.insert(registration_id, tx);
        Ok(rx)
    }

    fn unregister_poll(&self, registration_id: Uuid) {
        self.active_polls
            .lock()
            .expect("poll registry poisoned")
            .remove(&registration_id);
    }

    async fn load(&self, registration_id: Uuid) -> RegistrationResult<Registration> {
        self.registrations
            .find_by_id(registration_id)
            .await
            .map_err(RegistrationError::Storage)?
            .ok_or(RegistrationError::NotFound(registration_id))
    }
}
