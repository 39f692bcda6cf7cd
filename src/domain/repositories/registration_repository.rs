use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::registration::Registration;

/// Repository trait for the Registration aggregate
///
/// Defines the contract for persisting and retrieving registrations.
/// Implementations should handle database-specific details.
#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    /// Insert a new registration unless its party already holds an
    /// active one for the same event
    ///
    /// Returns `Ok(true)` and persists the registration when no
    /// registration with a blocking status (initiated, pending_payment,
    /// confirmed) exists for the party key, `Ok(false)` otherwise.
    /// The check and the insert must be one atomic operation:
    /// implementations serialize them (partial unique indexes in
    /// Postgres, a single mutex hold in memory) so that two concurrent
    /// identical submissions can never both pass. Failed and cancelled
    /// rows never collide.
    async fn try_insert_active(&self, registration: &Registration) -> Result<bool, String>;

    /// Save a registration (insert or update)
    async fn save(&self, registration: &Registration) -> Result<(), String>;

    /// Find a registration by its ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Registration>, String>;
}
