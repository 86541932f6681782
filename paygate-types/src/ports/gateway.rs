//! Hosted checkout gateway port.
//!
//! Collaborators (the CLI, a web front-end) talk to the gateway through this
//! trait so they can be exercised against a test double.

use crate::dto::{CheckoutSession, PaymentStatus};
use crate::error::PaymentError;

#[async_trait::async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Signs and submits a pay-page request, returning the session the
    /// shopper should be redirected into.
    ///
    /// `amount` is in whole currency units.
    async fn create_checkout(
        &self,
        amount: f64,
        mobile_number: &str,
        email: &str,
        name: &str,
    ) -> Result<CheckoutSession, PaymentError>;

    /// Same as [`create_checkout`](Self::create_checkout) but returns only
    /// the hosted checkout URL.
    async fn initiate_payment(
        &self,
        amount: f64,
        mobile_number: &str,
        email: &str,
        name: &str,
    ) -> Result<String, PaymentError> {
        let session = self
            .create_checkout(amount, mobile_number, email, name)
            .await?;
        Ok(session.redirect_url)
    }

    /// Looks up the current state of a previously initiated payment.
    async fn check_status(
        &self,
        merchant_transaction_id: &str,
    ) -> Result<PaymentStatus, PaymentError>;
}
