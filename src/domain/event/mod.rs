// Event domain module
// Read-only event snapshot and its game-mode value object

#![allow(clippy::module_inception)]

pub mod event;
pub mod value_objects;

pub use event::Event;
pub use value_objects::GameMode;
