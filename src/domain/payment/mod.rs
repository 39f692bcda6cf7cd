// Payment domain module
// PaymentIntent aggregate and its status machine

pub mod payment_intent;
pub mod value_objects;

pub use payment_intent::PaymentIntent;
pub use value_objects::PaymentStatus;
