pub mod events;
pub mod invites;
pub mod registrations;
pub mod teams;
