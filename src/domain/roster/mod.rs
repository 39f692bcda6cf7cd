// Roster domain module
// Pure validation of party composition against an event's game mode

pub mod resolver;
pub mod value_objects;

pub use resolver::{resolve_roster, Roster, RosterError, RosterSubmission};
pub use value_objects::{Captain, Email};
