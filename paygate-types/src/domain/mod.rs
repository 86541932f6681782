//! Domain models for the checkout gateway.

pub mod ids;
pub mod money;
pub mod payment;

pub use ids::MonotonicIdGenerator;
pub use money::MinorUnits;
pub use payment::{
    DEFAULT_MOBILE_NUMBER, PAY_PAGE_INSTRUMENT, PaymentInstrument, PaymentRequest, PaymentState,
    RedirectMode, mobile_or_default,
};
