// Invite domain module
// Invite aggregate and the issuer for ad-hoc team assembly

#![allow(clippy::module_inception)]

pub mod invite;
pub mod issuer;
pub mod value_objects;

pub use invite::{Invite, INVITE_TTL_HOURS};
pub use issuer::{issue_invites, InviteError};
pub use value_objects::InviteStatus;
