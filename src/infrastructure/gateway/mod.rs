// Payment gateway adapters
// HTTP adapter for production, scripted mock for tests and local runs

pub mod http;
pub mod mock;

pub use http::HttpPaymentGateway;
pub use mock::MockPaymentGateway;
