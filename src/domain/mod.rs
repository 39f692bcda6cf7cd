// Domain layer module exports
// Following Hexagonal Architecture and DDD principles
// Domain is independent of infrastructure concerns

pub mod event;
pub mod invite;
pub mod payment;
pub mod registration;
pub mod repositories;
pub mod roster;
