//! # Paygate Types
//!
//! Domain types and port traits for initiating a hosted checkout with the
//! payment gateway. This crate has ZERO external IO dependencies - only data
//! structures, business rules, and trait definitions.
//!
//! ## Layout
//!
//! - `domain/` - Amounts, the pay-page request, identifier generation
//! - `ports/` - Traits the gateway client and test doubles implement
//! - `dto/` - Wire shapes of gateway requests, responses and callbacks
//! - `error/` - The payment error taxonomy

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    DEFAULT_MOBILE_NUMBER, MinorUnits, MonotonicIdGenerator, PAY_PAGE_INSTRUMENT,
    PaymentInstrument, PaymentRequest, PaymentState, RedirectMode,
};
pub use dto::*;
pub use error::PaymentError;
pub use ports::{IdGenerator, PaymentGateway};
