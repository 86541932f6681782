//! The pay-page request sent to the gateway, and the states a payment moves through.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::MinorUnits;

/// Placeholder mobile number substituted when the caller supplies none.
pub const DEFAULT_MOBILE_NUMBER: &str = "9999999999";

/// Instrument type for the gateway's hosted pay page.
pub const PAY_PAGE_INSTRUMENT: &str = "PAY_PAGE";

/// How the gateway returns the shopper to `redirectUrl`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum RedirectMode {
    #[default]
    Post,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentInstrument {
    #[serde(rename = "type")]
    pub instrument_type: String,
}

impl PaymentInstrument {
    pub fn pay_page() -> Self {
        Self {
            instrument_type: PAY_PAGE_INSTRUMENT.to_string(),
        }
    }
}

/// Payload signed and base64-encoded into the `request` field of a pay call.
///
/// Field order matters: it is the order the JSON is serialized in, and the
/// checksum is computed over that exact encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub merchant_id: String,
    pub merchant_transaction_id: String,
    pub merchant_user_id: String,
    pub amount: MinorUnits,
    pub redirect_url: String,
    pub redirect_mode: RedirectMode,
    pub callback_url: String,
    pub mobile_number: String,
    pub payment_instrument: PaymentInstrument,
}

/// Returns the mobile number to send, substituting the placeholder for blank input.
pub fn mobile_or_default(mobile_number: &str) -> String {
    let trimmed = mobile_number.trim();
    if trimmed.is_empty() {
        DEFAULT_MOBILE_NUMBER.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Payment state as reported by the status API and server callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentState {
    Completed,
    Pending,
    Failed,
}

impl PaymentState {
    /// Returns true once the gateway will not change the state again.
    pub fn is_final(&self) -> bool {
        !matches!(self, PaymentState::Pending)
    }
}

impl AsRef<str> for PaymentState {
    fn as_ref(&self) -> &str {
        match self {
            Self::Completed => "COMPLETED",
            Self::Pending => "PENDING",
            Self::Failed => "FAILED",
        }
    }
}

impl fmt::Display for PaymentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}
