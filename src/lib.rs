//! Arena API Library
//!
//! This library provides the core functionality for the Arena tournament
//! platform's registration and payment engine: domain logic,
//! orchestration services, repositories, and infrastructure components.

pub mod api;
pub mod domain;
pub mod infrastructure;
pub mod orchestration;
