// Repository implementations (data access layer)
// Adapters that implement domain repository interfaces

pub mod in_memory;
pub mod postgres_event_repository;
pub mod postgres_invite_repository;
pub mod postgres_payment_repository;
pub mod postgres_registration_repository;
pub mod postgres_team_directory;

pub use in_memory::{
    InMemoryEventRepository, InMemoryInviteRepository, InMemoryPaymentIntentRepository,
    InMemoryRegistrationRepository, InMemoryTeamDirectory,
};
pub use postgres_event_repository::PostgresEventRepository;
pub use postgres_invite_repository::PostgresInviteRepository;
pub use postgres_payment_repository::PostgresPaymentIntentRepository;
pub use postgres_registration_repository::PostgresRegistrationRepository;
pub use postgres_team_directory::PostgresTeamDirectory;
