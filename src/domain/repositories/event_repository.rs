use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::event::Event;

/// Repository trait for event snapshots and the atomic seat claim
///
/// Events are owned elsewhere; this core reads them and claims seats.
/// `try_claim_seat` is the single serialization point for capacity:
/// implementations must make the check-and-increment atomic per event
/// (row lock in Postgres, per-store mutex in memory) so that concurrent
/// registrations for the same event can never oversell a slot, while
/// registrations for different events never block each other.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Find an event by its ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>, String>;

    /// Atomically claim one participant seat
    ///
    /// Returns `Ok(true)` and increments the participant count when a
    /// seat was available, `Ok(false)` when the event is full.
    async fn try_claim_seat(&self, event_id: Uuid) -> Result<bool, String>;

    /// Release a previously claimed seat
    ///
    /// Used when a confirmation cannot be persisted after the claim.
    async fn release_seat(&self, event_id: Uuid) -> Result<(), String>;
}
