// Domain repository interfaces (ports)
// Implemented by the infrastructure layer

pub mod event_repository;
pub mod invite_repository;
pub mod payment_repository;
pub mod registration_repository;
pub mod team_directory;

pub use event_repository::EventRepository;
pub use invite_repository::InviteRepository;
pub use payment_repository::PaymentIntentRepository;
pub use registration_repository::RegistrationRepository;
pub use team_directory::{TeamDirectory, TeamMember, TeamSummary};
