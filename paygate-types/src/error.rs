//! Error types for the checkout gateway.

/// Generic message shown when the gateway could not be reached.
pub const RETRY_MESSAGE: &str = "Failed to initiate payment. Please try again.";

/// Fallback reason when the gateway rejects a request without saying why.
pub const DEFAULT_REJECTION_MESSAGE: &str = "Payment initiation failed";

/// Everything that can go wrong initiating, checking or verifying a payment.
///
/// Callers branch on the variant; the display text is meant for end users.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("Invalid payment request: {0}")]
    Validation(String),

    #[error("Failed to initiate payment. Please try again. ({0})")]
    GatewayUnreachable(String),

    #[error("Payment failed: {0}")]
    GatewayRejected(String),

    #[error("Malformed gateway response: {0}")]
    MalformedResponse(String),

    #[error("Checksum verification failed")]
    InvalidChecksum,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl PaymentError {
    /// Returns true if the same request may succeed when tried again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PaymentError::GatewayUnreachable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_carries_gateway_message() {
        let err = PaymentError::GatewayRejected("insufficient limit".into());
        assert_eq!(err.to_string(), "Payment failed: insufficient limit");
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_unreachable_suggests_retry() {
        let err = PaymentError::GatewayUnreachable("connection refused".into());
        assert!(err.to_string().starts_with(RETRY_MESSAGE));
        assert!(err.is_retryable());
    }
}
