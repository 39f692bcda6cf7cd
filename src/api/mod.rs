// API layer module (adapters for controllers)
// Follows Hexagonal Architecture - API is an adapter

use std::sync::Arc;

use crate::domain::repositories::{EventRepository, InviteRepository, TeamDirectory};
use crate::orchestration::RegistrationLedger;

pub mod errors;
pub mod handlers;

/// Shared state handed to every handler
///
/// The ledger owns the gateway client and the poll-cancellation
/// registry, so it lives once behind an Arc rather than per request.
/// The directory and invite repositories back the read-only lookup
/// surface (team picker, username search, invite acceptance page).
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<RegistrationLedger>,
    pub events: Arc<dyn EventRepository>,
    pub teams: Arc<dyn TeamDirectory>,
    pub invites: Arc<dyn InviteRepository>,
}
