//! Port traits (interfaces for adapters).
//!
//! Callers depend on these traits; the HTTP client and test doubles implement them.

mod gateway;
mod ids;

pub use gateway::PaymentGateway;
pub use ids::IdGenerator;
