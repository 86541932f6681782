//! Data Transfer Objects exchanged with the gateway and handed to callers.

use serde::{Deserialize, Serialize};

use crate::domain::{MinorUnits, PaymentState};

// ─────────────────────────────────────────────────────────────────────────────
// Pay API
// ─────────────────────────────────────────────────────────────────────────────

/// JSON body of a pay call: the base64-encoded [`PaymentRequest`](crate::PaymentRequest).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayRequestBody {
    pub request: String,
}

/// Response to a pay call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayResponse {
    pub success: bool,
    pub code: Option<String>,
    pub message: Option<String>,
    pub data: Option<PayResponseData>,
}

impl GatewayResponse {
    /// Returns `data.instrumentResponse.redirectInfo.url` if present and non-empty.
    pub fn redirect_url(&self) -> Option<&str> {
        self.data
            .as_ref()?
            .instrument_response
            .as_ref()?
            .redirect_info
            .as_ref()?
            .url
            .as_deref()
            .filter(|url| !url.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayResponseData {
    pub merchant_id: Option<String>,
    pub merchant_transaction_id: Option<String>,
    pub instrument_response: Option<InstrumentResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentResponse {
    #[serde(rename = "type")]
    pub instrument_type: Option<String>,
    pub redirect_info: Option<RedirectInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedirectInfo {
    pub url: Option<String>,
    pub method: Option<String>,
}

/// Error body the gateway sends with non-2xx statuses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayErrorBody {
    pub code: Option<String>,
    pub message: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Status API and server callbacks
// ─────────────────────────────────────────────────────────────────────────────

/// Response to a status call; also the decoded shape of a server callback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub success: bool,
    pub code: Option<String>,
    pub message: Option<String>,
    pub data: Option<PaymentStatus>,
}

/// Gateway-side view of a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatus {
    pub merchant_id: String,
    pub merchant_transaction_id: String,
    /// Gateway's own transaction reference, assigned once the shopper pays.
    pub transaction_id: Option<String>,
    /// Amount in minor units.
    pub amount: i64,
    pub state: PaymentState,
    pub response_code: Option<String>,
}

/// JSON body POSTed by the gateway to the callback URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackEnvelope {
    pub response: String,
}

/// A decoded, checksum-verified server callback; same shape as a status response.
pub type CallbackPayload = StatusResponse;

// ─────────────────────────────────────────────────────────────────────────────
// Caller-facing results
// ─────────────────────────────────────────────────────────────────────────────

/// A successfully initiated hosted checkout.
///
/// The identifiers are what the gateway knows the payment by; keep
/// `merchant_transaction_id` to reconcile via the status API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub merchant_transaction_id: String,
    pub merchant_user_id: String,
    pub amount: MinorUnits,
    pub redirect_url: String,
}

impl CheckoutSession {
    /// Amount formatted for display, e.g. `₹499.00`.
    pub fn formatted_amount(&self) -> String {
        self.amount.to_string()
    }
}
