// Registration domain module
// Contains the registration aggregate root, value objects, and domain events

#![allow(clippy::module_inception)]

pub mod events;
pub mod registration;
pub mod value_objects;

// Re-export main types for convenience
pub use registration::Registration;
pub use value_objects::{FailureReason, PartyKey, RegistrationParty, RegistrationStatus};
